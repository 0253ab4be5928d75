//! External tool invocation.
//!
//! The compiler and the page generator are opaque executables; all this
//! module knows is their argument contracts, captured in [`CompileJob`]
//! and [`PageJob`]. The [`Toolchain`] trait separates "what to run"
//! from "how processes run" so the dispatch loops are testable without
//! either tool installed — the production implementation is
//! [`CommandToolchain`], the test double lives in [`tests`].
//!
//! Dispatch is strictly sequential and aborts on the first failed job;
//! the jobs share the output tree and a partial build must not look
//! like a finished one.

use crate::config::{BuildConfig, Verbosity};
use crate::output;
use crate::pair::TemplatePair;
use crate::paths::SUPPORT_DIR;
use crate::resolve::{self, ResolveError};
use crate::scan::EntryPoint;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("required executable `{0}` not found on PATH")]
    MissingExecutable(String),
    #[error("unable to start `{tool}`: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("compiler failed for {0}")]
    CompileFailed(PathBuf),
    #[error("page generator failed for {0}")]
    GenerateFailed(PathBuf),
    #[error("unable to create output file {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot extend the package search path with {path}: {source}")]
    SearchPath {
        path: PathBuf,
        #[source]
        source: std::env::JoinPathsError,
    },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// One compiler invocation: absolute source to absolute artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileJob {
    pub source: PathBuf,
    pub output: PathBuf,
}

impl CompileJob {
    /// The job a discovered entry point turns into.
    pub fn from_entry(
        entry: &EntryPoint,
        entry_root: &Path,
        output_root: &Path,
    ) -> Result<Self, ResolveError> {
        Ok(Self {
            source: entry.path.clone(),
            output: resolve::resolve_output(&entry.path, entry_root, output_root)?,
        })
    }
}

/// One generator invocation. The start and description paths are
/// template-root-relative, per the generator's argument contract; the
/// output path is where its stdout gets written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageJob {
    pub template_root: PathBuf,
    pub markup_rel: PathBuf,
    pub description_rel: PathBuf,
    pub output: PathBuf,
}

impl PageJob {
    /// The job a validated pair turns into. The output page mirrors the
    /// markup file's position in the template tree.
    pub fn from_pair(pair: &TemplatePair, template_root: &Path, output_root: &Path) -> Self {
        Self {
            template_root: template_root.to_path_buf(),
            markup_rel: pair.markup_rel.clone(),
            description_rel: pair.description_rel.clone(),
            output: output_root.join(&pair.markup_rel),
        }
    }
}

/// Outcome of one compiler run. The combined output stream is the
/// compiler's only diagnostic channel and is forwarded to the operator
/// whether or not the run succeeded.
#[derive(Debug, Clone, Default)]
pub struct ToolRun {
    pub success: bool,
    pub combined: String,
}

/// Outcome of one generator run: captured stdout is the page itself,
/// stderr is surfaced only on failure.
#[derive(Debug, Clone, Default)]
pub struct PageRun {
    pub success: bool,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// How external tools run. Implementations report launch failures as
/// errors and tool failures through the run outcome, so callers can
/// forward diagnostics before aborting.
pub trait Toolchain {
    fn compile(&self, job: &CompileJob) -> Result<ToolRun, DispatchError>;
    fn generate(&self, job: &PageJob) -> Result<PageRun, DispatchError>;
}

/// Production toolchain backed by `std::process::Command`.
pub struct CommandToolchain {
    project: PathBuf,
    compiler: String,
    generator: String,
    compiler_flags: Vec<String>,
}

impl CommandToolchain {
    pub fn new(project: &Path, config: &BuildConfig) -> Self {
        Self {
            project: project.to_path_buf(),
            compiler: config.tools.compiler.clone(),
            generator: config.tools.generator.clone(),
            compiler_flags: config.tools.compiler_flags.clone(),
        }
    }

    /// The compiler resolves imports against the project and its
    /// vendored packages.
    fn search_path(&self) -> Result<std::ffi::OsString, DispatchError> {
        std::env::join_paths([self.project.clone(), self.project.join("vendor")]).map_err(
            |source| DispatchError::SearchPath {
                path: self.project.clone(),
                source,
            },
        )
    }
}

impl Toolchain for CommandToolchain {
    fn compile(&self, job: &CompileJob) -> Result<ToolRun, DispatchError> {
        let gopath = self.search_path()?;
        let output = Command::new(&self.compiler)
            .arg("build")
            .args(&self.compiler_flags)
            .arg("-o")
            .arg(&job.output)
            .arg(&job.source)
            .env("GOPATH", gopath)
            .output()
            .map_err(|source| DispatchError::Launch {
                tool: self.compiler.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(ToolRun {
            success: output.status.success(),
            combined,
        })
    }

    fn generate(&self, job: &PageJob) -> Result<PageRun, DispatchError> {
        let output = Command::new(&self.generator)
            .arg("--support")
            .arg(SUPPORT_DIR)
            .arg("--dir")
            .arg(&job.template_root)
            .arg("--start")
            .arg(&job.markup_rel)
            .arg("--json")
            .arg(&job.description_rel)
            .output()
            .map_err(|source| DispatchError::Launch {
                tool: self.generator.clone(),
                source,
            })?;

        Ok(PageRun {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Verify both external tools resolve on PATH before any work begins.
pub fn probe_tools(config: &BuildConfig) -> Result<(), DispatchError> {
    for tool in [&config.tools.compiler, &config.tools.generator] {
        which::which(tool).map_err(|_| DispatchError::MissingExecutable(tool.clone()))?;
    }
    Ok(())
}

/// Compile every entry point, in discovery order, into its mirrored
/// artifact path. The first failed compile aborts the remainder.
pub fn compile_all(
    entries: &[EntryPoint],
    entry_root: &Path,
    output_root: &Path,
    toolchain: &dyn Toolchain,
    verbosity: Verbosity,
) -> Result<(), DispatchError> {
    for entry in entries {
        let job = CompileJob::from_entry(entry, entry_root, output_root)?;
        if let Some(parent) = job.output.parent() {
            std::fs::create_dir_all(parent).map_err(|source| DispatchError::WriteOutput {
                path: job.output.clone(),
                source,
            })?;
        }

        if verbosity.job_lines() {
            println!("{}", output::format_dispatch_line(&job.source, &job.output));
        }

        let run = toolchain.compile(&job)?;
        if !run.combined.is_empty() {
            print!("{}", run.combined);
        }
        if !run.success {
            return Err(DispatchError::CompileFailed(job.source));
        }
    }
    Ok(())
}

/// Generate every validated pair, in pairing-discovery order, writing
/// captured stdout verbatim to the mirrored output file. The first
/// failed generation aborts the remainder.
pub fn generate_all(
    pairs: &[TemplatePair],
    template_root: &Path,
    output_root: &Path,
    toolchain: &dyn Toolchain,
    verbosity: Verbosity,
) -> Result<(), DispatchError> {
    for pair in pairs {
        let job = PageJob::from_pair(pair, template_root, output_root);
        if verbosity.job_lines() {
            println!(
                "{}",
                output::format_dispatch_line(&pair.description, &job.output)
            );
        }

        let run = toolchain.generate(&job)?;
        if !run.success {
            if !run.stderr.is_empty() {
                eprint!("{}", run.stderr);
            }
            return Err(DispatchError::GenerateFailed(pair.description.clone()));
        }

        if let Some(parent) = job.output.parent() {
            std::fs::create_dir_all(parent).map_err(|source| DispatchError::WriteOutput {
                path: job.output.clone(),
                source,
            })?;
        }
        std::fs::write(&job.output, &run.stdout).map_err(|source| DispatchError::WriteOutput {
            path: job.output.clone(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Mock toolchain that records invocations without running anything.
    /// Results are popped per call; an empty result stack means success.
    #[derive(Default)]
    pub struct MockToolchain {
        pub operations: RefCell<Vec<RecordedOp>>,
        pub compile_results: RefCell<Vec<ToolRun>>,
        pub page_results: RefCell<Vec<PageRun>>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RecordedOp {
        Compile {
            source: PathBuf,
            output: PathBuf,
        },
        Generate {
            template_root: PathBuf,
            markup_rel: PathBuf,
            description_rel: PathBuf,
            output: PathBuf,
        },
    }

    impl MockToolchain {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a failing compile for the next compile call.
        pub fn fail_next_compile(self) -> Self {
            self.compile_results.borrow_mut().push(ToolRun {
                success: false,
                combined: "compile exploded\n".to_string(),
            });
            self
        }

        /// Queue a failing generation for the next generate call.
        pub fn fail_next_generate(self) -> Self {
            self.page_results.borrow_mut().push(PageRun {
                success: false,
                stdout: Vec::new(),
                stderr: "template exploded\n".to_string(),
            });
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.borrow().clone()
        }
    }

    impl Toolchain for MockToolchain {
        fn compile(&self, job: &CompileJob) -> Result<ToolRun, DispatchError> {
            self.operations.borrow_mut().push(RecordedOp::Compile {
                source: job.source.clone(),
                output: job.output.clone(),
            });
            Ok(self
                .compile_results
                .borrow_mut()
                .pop()
                .unwrap_or(ToolRun {
                    success: true,
                    combined: String::new(),
                }))
        }

        fn generate(&self, job: &PageJob) -> Result<PageRun, DispatchError> {
            self.operations.borrow_mut().push(RecordedOp::Generate {
                template_root: job.template_root.clone(),
                markup_rel: job.markup_rel.clone(),
                description_rel: job.description_rel.clone(),
                output: job.output.clone(),
            });
            Ok(self.page_results.borrow_mut().pop().unwrap_or(PageRun {
                success: true,
                stdout: b"<html>generated</html>".to_vec(),
                stderr: String::new(),
            }))
        }
    }

    fn entry(path: PathBuf) -> EntryPoint {
        EntryPoint { path }
    }

    #[test]
    fn compile_all_dispatches_in_discovery_order() {
        let tmp = TempDir::new().unwrap();
        let client = tmp.path().join("client");
        let out = tmp.path().join("out");
        fs::create_dir_all(&client).unwrap();
        fs::create_dir_all(&out).unwrap();

        let entries = vec![
            entry(client.join("a/main.go")),
            entry(client.join("b/main.go")),
        ];
        let mock = MockToolchain::new();

        compile_all(&entries, &client, &out, &mock, Verbosity::Quiet).unwrap();

        let ops = mock.get_operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(
            ops[0],
            RecordedOp::Compile {
                source: client.join("a/main.go"),
                output: out.join("a/main.go"),
            }
        );
        assert_eq!(
            ops[1],
            RecordedOp::Compile {
                source: client.join("b/main.go"),
                output: out.join("b/main.go"),
            }
        );
    }

    #[test]
    fn compile_all_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let client = tmp.path().join("client");
        let out = tmp.path().join("out");
        fs::create_dir_all(&client).unwrap();

        let entries = vec![entry(client.join("deep/nest/main.go"))];
        let mock = MockToolchain::new();

        compile_all(&entries, &client, &out, &mock, Verbosity::Quiet).unwrap();
        assert!(out.join("deep/nest").is_dir());
    }

    #[test]
    fn failed_compile_aborts_remaining_entries() {
        let tmp = TempDir::new().unwrap();
        let client = tmp.path().join("client");
        let out = tmp.path().join("out");
        fs::create_dir_all(&client).unwrap();

        let entries = vec![
            entry(client.join("a/main.go")),
            entry(client.join("b/main.go")),
        ];
        let mock = MockToolchain::new().fail_next_compile();

        let err = compile_all(&entries, &client, &out, &mock, Verbosity::Quiet).unwrap_err();
        assert!(matches!(err, DispatchError::CompileFailed(p) if p == client.join("a/main.go")));
        assert_eq!(mock.get_operations().len(), 1);
    }

    #[test]
    fn entry_outside_root_aborts_before_any_dispatch() {
        let tmp = TempDir::new().unwrap();
        let client = tmp.path().join("client");
        let out = tmp.path().join("out");
        fs::create_dir_all(&client).unwrap();

        let entries = vec![entry(tmp.path().join("elsewhere/main.go"))];
        let mock = MockToolchain::new();

        let err = compile_all(&entries, &client, &out, &mock, Verbosity::Quiet).unwrap_err();
        assert!(matches!(err, DispatchError::Resolve(_)));
        assert!(mock.get_operations().is_empty());
    }

    #[test]
    fn generate_all_writes_captured_stdout_verbatim() {
        let tmp = TempDir::new().unwrap();
        let templates = tmp.path().join("template");
        let out = tmp.path().join("out");
        write_file(&templates.join("x/page.json"), "{}");
        write_file(&templates.join("x/page.html"), "<p></p>");
        fs::create_dir_all(&out).unwrap();

        let pairs = crate::pair::pair_templates(&templates).unwrap();
        let mock = MockToolchain::new();

        generate_all(&pairs, &templates, &out, &mock, Verbosity::Quiet).unwrap();

        let written = fs::read(out.join("x/page.html")).unwrap();
        assert_eq!(written, b"<html>generated</html>");

        let ops = mock.get_operations();
        assert_eq!(
            ops,
            vec![RecordedOp::Generate {
                template_root: templates.clone(),
                markup_rel: PathBuf::from("x/page.html"),
                description_rel: PathBuf::from("x/page.json"),
                output: out.join("x/page.html"),
            }]
        );
    }

    #[test]
    fn failed_generation_aborts_remaining_pairs() {
        let tmp = TempDir::new().unwrap();
        let templates = tmp.path().join("template");
        let out = tmp.path().join("out");
        write_file(&templates.join("a/one.json"), "{}");
        write_file(&templates.join("a/one.html"), "<p></p>");
        write_file(&templates.join("b/two.json"), "{}");
        write_file(&templates.join("b/two.html"), "<p></p>");
        fs::create_dir_all(&out).unwrap();

        let pairs = crate::pair::pair_templates(&templates).unwrap();
        assert_eq!(pairs.len(), 2);
        let mock = MockToolchain::new().fail_next_generate();

        let err = generate_all(&pairs, &templates, &out, &mock, Verbosity::Quiet).unwrap_err();
        assert!(matches!(err, DispatchError::GenerateFailed(_)));
        assert_eq!(mock.get_operations().len(), 1);
        // Nothing was written for the failed pair.
        assert!(!out.join("a/one.html").exists());
        assert!(!out.join("b/two.html").exists());
    }

    #[test]
    fn unwritable_output_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let templates = tmp.path().join("template");
        write_file(&templates.join("page.json"), "{}");
        write_file(&templates.join("page.html"), "<p></p>");
        // The output root is a file, so creating the page must fail.
        let out = tmp.path().join("out");
        write_file(&out, "in the way");

        let pairs = crate::pair::pair_templates(&templates).unwrap();
        let mock = MockToolchain::new();

        let err = generate_all(&pairs, &templates, &out, &mock, Verbosity::Quiet).unwrap_err();
        assert!(matches!(err, DispatchError::WriteOutput { .. }));
    }

    #[test]
    fn probe_reports_the_missing_tool_by_name() {
        let mut config = BuildConfig::default();
        config.tools.compiler = "gb-web-no-such-compiler".to_string();

        let err = probe_tools(&config).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::MissingExecutable(name) if name == "gb-web-no-such-compiler"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn probe_accepts_resolvable_tools() {
        let mut config = BuildConfig::default();
        config.tools.compiler = "sh".to_string();
        config.tools.generator = "sh".to_string();

        probe_tools(&config).unwrap();
    }
}
