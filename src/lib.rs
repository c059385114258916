//! Doccheck - docstring compliance gate for Python source trees.
//!
//! Doccheck parses a source tree into a structural model of documentable
//! entities (modules, classes, functions, methods), applies a fixed rule
//! set to decide whether each entity's documentation is present and
//! well-formed, and emits a deterministic report describing every
//! violation with line-level precision. The report drives a convergence
//! loop: report, fix externally, re-scan, empty report.
//!
//! # Architecture
//!
//! The pipeline runs as a single pass per invocation:
//!
//! - `scan`: directory walk feeding per-file analysis and aggregation
//! - `extract`: tree-sitter entity extraction for one file
//! - `rules`: exemption classification and format validation
//! - `issue`: issue, per-file, and whole-run report types
//! - `report`: output formatting (text artifact, pretty, JSON)
//!
//! Per-file analysis has no cross-file dependencies; `ScanConfig::parallel`
//! fans it out over worker threads without changing the rendered report.

pub mod cli;
pub mod entity;
pub mod extract;
pub mod issue;
pub mod report;
pub mod rules;
pub mod scan;

pub use entity::{DocumentableEntity, EntityKind};
pub use extract::{ExtractError, PythonExtractor};
pub use issue::{FileReport, Issue, IssueCategory, Report};
pub use rules::{requires_docstring, validate};
pub use scan::{ScanConfig, ScanError, Scanner, DEFAULT_SKIP_DIRS};
