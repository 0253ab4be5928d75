//! CLI output formatting.
//!
//! Format functions are pure — they return strings and never touch
//! stdout — so the exact operator-visible text is testable. `print_*`
//! wrappers do the writing. Paths are shown relative to the project
//! root where possible; the absolute prefix is noise the operator
//! already knows.

use crate::build::CheckReport;
use std::path::Path;

/// One dispatched unit of work: input becomes output.
pub fn format_dispatch_line(input: &Path, output: &Path) -> String {
    format!("{} → {}", input.display(), output.display())
}

/// Strip `base` for display when the path is under it.
fn display_rel<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

/// Everything a build would do for one package, without doing it.
pub fn format_check(pkg: &str, report: &CheckReport, project: &Path) -> Vec<String> {
    let mut lines = vec![format!("{pkg}: entry points")];
    if report.compiles.is_empty() {
        lines.push("    (none)".to_string());
    }
    for job in &report.compiles {
        lines.push(format!(
            "    {}",
            format_dispatch_line(
                display_rel(&job.source, project),
                display_rel(&job.output, project)
            )
        ));
    }

    lines.push(format!("{pkg}: pages"));
    if report.pages.is_empty() {
        lines.push("    (none)".to_string());
    }
    for job in &report.pages {
        lines.push(format!(
            "    {} + {} → {}",
            job.markup_rel.display(),
            job.description_rel.display(),
            display_rel(&job.output, project).display()
        ));
    }

    lines.push(format!(
        "{pkg}: {} entry points, {} pages",
        report.compiles.len(),
        report.pages.len()
    ));
    lines
}

pub fn print_check(pkg: &str, report: &CheckReport, project: &Path) {
    for line in format_check(pkg, report, project) {
        println!("{line}");
    }
}
