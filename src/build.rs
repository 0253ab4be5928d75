//! Per-package orchestration.
//!
//! Each package moves through the same states: validate the layout,
//! compile every client entry point, generate every template pair.
//! The first failure stops that package; `?` is the state machine.
//! Nothing carries across packages — every call starts from the
//! filesystem alone.

use crate::classify::SourceClassifier;
use crate::config::Verbosity;
use crate::dispatch::{self, CompileJob, DispatchError, PageJob, Toolchain};
use crate::pair::{self, PairError};
use crate::paths::{self, LayoutError};
use crate::resolve::ResolveError;
use crate::scan::{self, ScanError};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Pair(#[from] PairError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Build one package: compile its clients, then generate its pages.
pub fn build_package(
    project: &Path,
    pkg: &str,
    toolchain: &dyn Toolchain,
    classifier: &dyn SourceClassifier,
    verbosity: Verbosity,
) -> Result<(), BuildError> {
    paths::validate_layout(project, pkg)?;

    let entry_root = paths::client_root(project, pkg);
    let template_root = paths::template_root(project, pkg);
    let output_root = paths::output_root(project, pkg);

    if verbosity.banners() {
        println!("==> {pkg}: compiling client entry points");
    }
    let entries = scan::scan_entry_points(&entry_root, classifier)?;
    dispatch::compile_all(&entries, &entry_root, &output_root, toolchain, verbosity)?;

    if verbosity.banners() {
        println!("==> {pkg}: generating pages");
    }
    let pairs = pair::pair_templates(&template_root)?;
    dispatch::generate_all(&pairs, &template_root, &output_root, toolchain, verbosity)?;

    Ok(())
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("build failed for {pkg}: {source}")]
    Package {
        pkg: String,
        #[source]
        source: BuildError,
    },
    #[error("build failed for {failed} of {total} packages")]
    Aggregate { failed: usize, total: usize },
}

/// Build every package in argument order.
///
/// The default policy aborts the whole run at the first failed
/// package. With `keep_going` the remaining packages still build, each
/// failure is reported as it happens, and the run still ends in an
/// error if anything failed.
pub fn build_packages(
    project: &Path,
    packages: &[String],
    keep_going: bool,
    toolchain: &dyn Toolchain,
    classifier: &dyn SourceClassifier,
    verbosity: Verbosity,
) -> Result<(), RunError> {
    let mut failed = 0;
    for pkg in packages {
        match build_package(project, pkg, toolchain, classifier, verbosity) {
            Ok(()) => {
                if verbosity.banners() {
                    println!("==> {pkg}: done");
                }
            }
            Err(source) if keep_going => {
                eprintln!("{pkg}: {source}");
                failed += 1;
            }
            Err(source) => {
                return Err(RunError::Package {
                    pkg: pkg.clone(),
                    source,
                });
            }
        }
    }
    if failed > 0 {
        return Err(RunError::Aggregate {
            failed,
            total: packages.len(),
        });
    }
    Ok(())
}

/// Everything a build would do for one package, discovered and
/// validated but not dispatched.
#[derive(Debug)]
pub struct CheckReport {
    pub compiles: Vec<CompileJob>,
    pub pages: Vec<PageJob>,
}

/// Run the discovery half of the build — layout validation, entry-point
/// scanning, template pairing — without invoking any external tool.
pub fn check_package(
    project: &Path,
    pkg: &str,
    classifier: &dyn SourceClassifier,
) -> Result<CheckReport, BuildError> {
    paths::validate_layout(project, pkg)?;

    let entry_root = paths::client_root(project, pkg);
    let template_root = paths::template_root(project, pkg);
    let output_root = paths::output_root(project, pkg);

    let mut compiles = Vec::new();
    for entry in scan::scan_entry_points(&entry_root, classifier)? {
        compiles.push(CompileJob::from_entry(&entry, &entry_root, &output_root)?);
    }

    let pages = pair::pair_templates(&template_root)?
        .iter()
        .map(|p| PageJob::from_pair(p, &template_root, &output_root))
        .collect();

    Ok(CheckReport { compiles, pages })
}
