//! # gb-web
//!
//! A `gb` build extension that turns a package's browser-facing source
//! into deployable artifacts: `.go` client entry points are compiled to
//! JavaScript with gopherjs, and `.json`/`.html` template pairs are
//! materialized into static pages with pagegen.
//!
//! # Architecture: Discover, Map, Dispatch
//!
//! For every package identifier on the command line the build runs the
//! same fixed pipeline:
//!
//! ```text
//! 1. Validate   src/<pkg>/{client,static/en/web,pages} must exist
//! 2. Compile    client/**/*.go with a top-level `func main`
//!               → gopherjs → static/en/web/** (mirrors client/**)
//! 3. Paginate   pages/template/**/*.json paired with *.html
//!               → pagegen stdout → static/en/web/** (mirrors template/**)
//! ```
//!
//! Discovery and dispatch are kept apart on purpose: every entry point
//! and every template pair is found and validated before the first
//! external process for that phase runs. A broken input late in the
//! tree stops the build before any tool sees it, not halfway through.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`paths`] | Canonical subtree derivation and layout validation |
//! | [`classify`] | Entry-point detection behind the [`classify::SourceClassifier`] seam |
//! | [`scan`] | Recursive discovery of classified sources in walk order |
//! | [`resolve`] | Source path → artifact path mirroring |
//! | [`pair`] | Template pairing with the reserved `support/` subtree pruned |
//! | [`dispatch`] | External tool invocation behind the [`dispatch::Toolchain`] seam |
//! | [`build`] | Per-package orchestration: validate → compile → paginate |
//! | [`config`] | Optional `gb-web.toml`: tool names, flags, verbosity |
//! | [`output`] | CLI output formatting — pure format functions, print wrappers |
//!
//! # Design Decisions
//!
//! ## Fail Fast, Fail Loud
//!
//! There is no retry and no per-file skipping anywhere. A malformed
//! source file, an unpaired template, a missing directory, or a
//! non-zero tool exit terminates the run with a diagnostic. A build
//! tool that quietly ships partial artifacts is worse than one that
//! stops.
//!
//! ## Sequential Dispatch
//!
//! Entry points compile one at a time and pages generate one at a
//! time. The external tools are I/O- and CPU-heavy, and the output
//! tree is shared, unguarded state between them. Distinct inputs map
//! to distinct outputs today, but nothing enforces that under
//! concurrency — so there is none.
//!
//! ## Traits at the Two Unstable Seams
//!
//! The entry-point convention ([`classify::SourceClassifier`]) and the
//! external tools ([`dispatch::Toolchain`]) are the two things most
//! likely to be swapped — for another language's convention, or for a
//! different compiler. Both are traits with the production
//! implementation beside them, and both have recording test doubles so
//! the orchestration is testable without gopherjs or pagegen
//! installed.

pub mod build;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod output;
pub mod pair;
pub mod paths;
pub mod resolve;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
