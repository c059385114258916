//! Command-line interface for doccheck.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::report;
use crate::scan::{ScanConfig, Scanner};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default name of the report artifact, written under the scan root.
const DEFAULT_REPORT_NAME: &str = "DOCSTRING_REPORT.md";

/// Docstring compliance gate for Python source trees.
///
/// doccheck walks a source tree, extracts every documentable entity
/// (modules, classes, functions, methods), and checks that required
/// docstrings are present and well-formed. The report it writes is
/// deterministic, so an external fix pass followed by a re-scan
/// converges on an empty report.
#[derive(Parser)]
#[command(name = "doccheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check docstring compliance for a file or directory
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Path to check (file or directory)
    pub path: PathBuf,

    /// Where to write the report artifact (default: DOCSTRING_REPORT.md under the scan root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Analyze files across worker threads
    #[arg(long)]
    pub parallel: bool,

    /// Additional directory names to skip (extends the built-in set)
    #[arg(long = "skip", value_name = "DIR")]
    pub skip: Vec<String>,

    /// Do not write the report artifact to disk
    #[arg(long)]
    pub no_report_file: bool,
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let mut config = ScanConfig::default();
    config.skip_dirs.extend(args.skip.iter().cloned());
    config.parallel = args.parallel;

    let scanner = Scanner::new(&args.path).with_config(config);
    let scan_report = match scanner.run() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Write (fully overwriting) the report artifact unless suppressed.
    if !args.no_report_file {
        let artifact_path = match &args.output {
            Some(p) => p.clone(),
            None => default_artifact_path(&args.path),
        };
        std::fs::write(&artifact_path, report::render_text(&scan_report))?;
    }

    let path_str = args.path.to_string_lossy().to_string();
    match args.format.as_str() {
        "json" => report::write_json(&path_str, &scan_report)?,
        _ => report::write_pretty(&path_str, &scan_report),
    }

    if scan_report.is_clean() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

fn default_artifact_path(scan_path: &PathBuf) -> PathBuf {
    if scan_path.is_dir() {
        scan_path.join(DEFAULT_REPORT_NAME)
    } else {
        PathBuf::from(DEFAULT_REPORT_NAME)
    }
}
