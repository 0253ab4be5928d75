//! Entry-point discovery.
//!
//! Walks a client source tree, hands every `.go` file to the
//! classifier, and returns the positives in discovery order — the walk
//! order of the directory tree, not sorted. That order is the order the
//! compiler will run in.
//!
//! The scan is all-or-nothing: an unreadable directory or a file the
//! classifier rejects aborts the whole scan, and no partial result
//! escapes to the dispatch stage.

use crate::classify::{ClassifyError, SourceClassifier};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("error walking {0}: {1}")]
    Walk(PathBuf, walkdir::Error),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Recognized suffix for entry-point candidate sources.
pub const SOURCE_SUFFIX: &str = ".go";

/// A source file classified as an independently compilable entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub path: PathBuf,
}

/// Discover every entry point under `root`.
pub fn scan_entry_points(
    root: &Path,
    classifier: &dyn SourceClassifier,
) -> Result<Vec<EntryPoint>, ScanError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| ScanError::Walk(root.to_path_buf(), e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(SOURCE_SUFFIX) {
            continue;
        }
        if classifier.classify(entry.path())? {
            entries.push(EntryPoint {
                path: entry.path().to_path_buf(),
            });
        }
    }
    Ok(entries)
}
