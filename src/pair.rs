//! Template pairing.
//!
//! Every description file (`*.json`) under the template tree must have
//! a markup companion (`*.html`) with the same base name in the same
//! directory. An unpaired description file is broken build input: the
//! walk stops there, names the file and the companion it expected, and
//! no page is generated for the package — validate-then-act, never
//! interleaved.
//!
//! The reserved `support/` subtree belongs to the page generator and is
//! pruned from the walk entirely; description files inside it are never
//! paired and never required to be.

use crate::paths::SUPPORT_DIR;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PairError {
    #[error("error walking {0}: {1}")]
    Walk(PathBuf, walkdir::Error),
    #[error("unable to find markup file for description {description}, expected it at {expected}")]
    MissingMarkup {
        description: PathBuf,
        expected: PathBuf,
    },
    #[error("internal error: template path {path} is not under its root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// Suffix of data-description files.
pub const DESCRIPTION_SUFFIX: &str = ".json";
/// Suffix of the markup companion each description must have.
pub const MARKUP_SUFFIX: &str = ".html";

/// A validated description/markup pair.
///
/// The `*_rel` paths are relative to the template root — the shape the
/// page generator's argument contract wants, and the suffix that gets
/// mirrored into the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePair {
    pub description: PathBuf,
    pub markup: PathBuf,
    pub description_rel: PathBuf,
    pub markup_rel: PathBuf,
}

/// Collect and validate every template pair under `template_root`, in
/// discovery order.
pub fn pair_templates(template_root: &Path) -> Result<Vec<TemplatePair>, PairError> {
    let mut pairs = Vec::new();
    let walker = WalkDir::new(template_root)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == OsStr::new(SUPPORT_DIR)));

    for entry in walker {
        let entry = entry.map_err(|e| PairError::Walk(template_root.to_path_buf(), e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let Some(base) = name.strip_suffix(DESCRIPTION_SUFFIX) else {
            continue;
        };

        let description = entry.path().to_path_buf();
        let markup = description.with_file_name(format!("{base}{MARKUP_SUFFIX}"));
        if !markup.is_file() {
            return Err(PairError::MissingMarkup {
                description,
                expected: markup,
            });
        }

        pairs.push(TemplatePair {
            description_rel: rel(&description, template_root)?,
            markup_rel: rel(&markup, template_root)?,
            description,
            markup,
        });
    }
    Ok(pairs)
}

fn rel(path: &Path, root: &Path) -> Result<PathBuf, PairError> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| PairError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
}
