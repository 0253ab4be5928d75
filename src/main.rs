use clap::{CommandFactory, Parser};
use gb_web::classify::GoEntryClassifier;
use gb_web::config::{self, Verbosity};
use gb_web::dispatch::{self, CommandToolchain};
use gb_web::{build, output};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup — trivial, called exactly once
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "gb-web")]
#[command(about = "gb extension that builds browser clients and static pages")]
#[command(long_about = "\
gb extension that builds browser clients and static pages

Run from gb with one or more package identifiers. For each package,
every client source with a top-level func main is compiled to a
browser artifact with gopherjs, and every template pair is rendered
to a static page with pagegen.

Expected layout per package (under $GB_PROJECT_DIR):

  src/<package>/
  ├── client/               # *.go entry-point candidates
  │   └── admin/main.go     # has func main → compiled
  ├── pages/
  │   └── template/
  │       ├── index.json    # description file...
  │       ├── index.html    # ...must have a markup companion
  │       └── support/      # reserved for pagegen, never paired
  └── static/en/web/        # artifacts land here, mirroring the
                            # client/ and template/ subtrees

Tool names and flags can be overridden in <project>/gb-web.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Package identifiers to build, in order
    packages: Vec<String>,

    /// Discover and validate everything without running any tool
    #[arg(long)]
    check: bool,

    /// Keep building remaining packages after one fails
    #[arg(long)]
    keep_going: bool,

    /// Print each tool invocation as it happens
    #[arg(long)]
    verbose: bool,

    /// Suppress stage banners
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gb-web: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.packages.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let project = project_root()?;
    let config = config::load_config(&project)?;
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose || config.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let classifier = GoEntryClassifier;

    if cli.check {
        for pkg in &cli.packages {
            let report = build::check_package(&project, pkg, &classifier)?;
            output::print_check(pkg, &report, &project);
        }
        return Ok(());
    }

    dispatch::probe_tools(&config)?;
    let toolchain = CommandToolchain::new(&project, &config);

    build::build_packages(
        &project,
        &cli.packages,
        cli.keep_going,
        &toolchain,
        &classifier,
        verbosity,
    )?;
    Ok(())
}

/// The project root comes from the environment; gb sets it before
/// launching extensions.
fn project_root() -> Result<PathBuf, Box<dyn std::error::Error>> {
    match std::env::var("GB_PROJECT_DIR") {
        Ok(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Err("GB_PROJECT_DIR is not set; gb-web must be launched as a gb extension".into()),
    }
}
