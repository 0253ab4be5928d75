//! Shared fixtures for the gb-web test suite.
//!
//! Tests build throwaway gb project trees inside a `TempDir`: the
//! standard `src/<pkg>/{client,pages/template,static/en/web}` skeleton
//! plus whatever sources and templates the test writes into it.

use std::fs;
use std::path::{Path, PathBuf};

/// A minimal compilable entry point.
pub const MAIN_GO: &str = "package main\n\nfunc main() {\n\tprintln(\"ready\")\n}\n";

/// A source file with no entry point.
pub const LIB_GO: &str = "package util\n\nfunc Helper() int {\n\treturn 1\n}\n";

/// Create the expected package skeleton under `project` and return the
/// package directory (`<project>/src/<pkg>`).
pub fn scaffold_package(project: &Path, pkg: &str) -> PathBuf {
    let base = project.join("src").join(pkg);
    fs::create_dir_all(base.join("client")).unwrap();
    fs::create_dir_all(base.join("pages/template")).unwrap();
    fs::create_dir_all(base.join("static/en/web")).unwrap();
    base
}

/// Write `contents` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}
