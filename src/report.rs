//! Output formatting for scan results.
//!
//! Three surfaces:
//! - a deterministic plain-text artifact written to disk, which drives the
//!   report -> fix -> re-scan convergence loop
//! - pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::issue::{FileReport, Report};

/// Success line rendered when the tree is fully compliant.
const CLEAN_MESSAGE: &str = "All docstrings present and well-formed.";

/// Render the report artifact.
///
/// Per file with issues: the path as a heading, one `line N: <message>`
/// line per issue, then a blank line. A trailing summary line carries the
/// total issue count and affected-file count. A clean tree renders the
/// success line only. Output is byte-identical across runs on the same
/// input.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("# Docstring Issues\n\n");

    if report.is_clean() {
        out.push_str(CLEAN_MESSAGE);
        out.push('\n');
        return out;
    }

    for file in &report.files {
        out.push_str(&format!("## {}\n", file.path));
        for issue in &file.issues {
            out.push_str(&format!("line {}: {}\n", issue.line, issue.message));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "{} issue(s) across {} file(s)\n",
        report.total_issues(),
        report.files_with_issues()
    ));
    out
}

/// JSON report structure.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub root: String,
    pub files_scanned: usize,
    pub total_issues: usize,
    pub files_with_issues: usize,
    pub passed: bool,
    pub files: Vec<FileReport>,
}

/// Write results to stdout in JSON format.
pub fn write_json(root: &str, report: &Report) -> anyhow::Result<()> {
    let json_report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        root: root.to_string(),
        files_scanned: report.scanned,
        total_issues: report.total_issues(),
        files_with_issues: report.files_with_issues(),
        passed: report.is_clean(),
        files: report.files.clone(),
    };

    let json = serde_json::to_string_pretty(&json_report)?;
    println!("{}", json);
    Ok(())
}

/// Write results to stdout in pretty (human-readable) format.
pub fn write_pretty(root: &str, report: &Report) {
    println!();
    print!("  ");
    print!("{}", "doccheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", root);
    print!("  {}", "Files:    ".dimmed());
    println!("{}", report.scanned);
    println!();

    if report.is_clean() {
        println!("  {}  {}", "✓ PASS".green(), CLEAN_MESSAGE);
        println!();
        return;
    }

    println!(
        "  {}  {} issue(s) in {} file(s)",
        "✗ FAIL".red(),
        report.total_issues(),
        report.files_with_issues()
    );
    println!();

    for file in &report.files {
        write_file_section(file);
    }
}

fn write_file_section(file: &FileReport) {
    println!("  {} ({}):", file.path.blue(), file.issues.len());
    for issue in &file.issues {
        print!("    {}", format!("{:<6}", issue.line).dimmed());
        print!("{:<24}", issue.category.as_str().dimmed());
        println!("{}", issue.message);
    }
    println!();
}
