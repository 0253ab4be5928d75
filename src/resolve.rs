//! Artifact path derivation for discovered sources.
//!
//! The output tree mirrors the input tree one-for-one: strip the
//! discovery root from the discovered path, re-root the relative
//! suffix under the output root. The suffix is preserved byte-for-byte
//! — artifact naming belongs to the compiler, mirroring belongs here.
//!
//! The scanner only ever returns paths under the root it was given, so
//! a prefix mismatch here is a logic defect inside this program, not
//! bad user input. It gets its own error kind, is reported as an
//! internal error, and aborts the run.

use std::path::{Path, PathBuf, StripPrefixError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("internal error: discovered path {path} is not under its root {root}")]
    OutsideRoot {
        path: PathBuf,
        root: PathBuf,
        #[source]
        source: StripPrefixError,
    },
}

/// Map a discovered path under `entry_root` to its mirror under
/// `output_root`.
pub fn resolve_output(
    discovered: &Path,
    entry_root: &Path,
    output_root: &Path,
) -> Result<PathBuf, ResolveError> {
    let suffix = discovered
        .strip_prefix(entry_root)
        .map_err(|source| ResolveError::OutsideRoot {
            path: discovered.to_path_buf(),
            root: entry_root.to_path_buf(),
            source,
        })?;
    Ok(output_root.join(suffix))
}
