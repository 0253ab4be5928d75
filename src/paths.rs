//! Canonical subtree derivation for a package inside a gb project.
//!
//! Every path the build touches is derived by a pure function from the
//! project root and a package identifier, so two derivations of the
//! "same" path are always byte-identical. Nothing here reads the
//! filesystem except [`validate_layout`].
//!
//! ## Layout Contract
//!
//! ```text
//! $GB_PROJECT_DIR/
//! └── src/<package>/
//!     ├── client/          # entry-point candidate sources (*.go)
//!     ├── pages/
//!     │   └── template/    # paired .json/.html templates
//!     │       └── support/ # reserved, never paired
//!     └── static/en/web/   # compiled artifacts and generated pages
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("unable to find client package, expected it at {0}")]
    MissingClient(PathBuf),
    #[error("unable to find static/en/web directory, expected it at {0}")]
    MissingOutput(PathBuf),
    #[error("unable to find pages directory, expected it at {0}")]
    MissingPages(PathBuf),
}

/// Directory name inside the template tree that is never scanned for
/// pairing. Its contents belong to the page generator.
pub const SUPPORT_DIR: &str = "support";

/// Root of the entry-point candidate sources for a package.
pub fn client_root(project: &Path, pkg: &str) -> PathBuf {
    project.join("src").join(pkg).join("client")
}

/// Root of the pages subtree for a package.
pub fn pages_root(project: &Path, pkg: &str) -> PathBuf {
    project.join("src").join(pkg).join("pages")
}

/// Root of the template tree for a package.
pub fn template_root(project: &Path, pkg: &str) -> PathBuf {
    pages_root(project, pkg).join("template")
}

/// Root of the deployable output tree for a package.
pub fn output_root(project: &Path, pkg: &str) -> PathBuf {
    project
        .join("src")
        .join(pkg)
        .join("static")
        .join("en")
        .join("web")
}

/// Confirm the expected subtree layout exists for a package.
///
/// Checked in the order the operator should fix them: client sources,
/// output tree, pages tree. Nothing is scanned or dispatched for a
/// package that fails this check.
pub fn validate_layout(project: &Path, pkg: &str) -> Result<(), LayoutError> {
    let client = client_root(project, pkg);
    if !client.is_dir() {
        return Err(LayoutError::MissingClient(client));
    }
    let output = output_root(project, pkg);
    if !output.is_dir() {
        return Err(LayoutError::MissingOutput(output));
    }
    let pages = pages_root(project, pkg);
    if !pages.is_dir() {
        return Err(LayoutError::MissingPages(pages));
    }
    Ok(())
}
