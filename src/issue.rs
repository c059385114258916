//! Core types for compliance results.

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// Category of a docstring compliance issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    #[serde(rename = "missing")]
    Missing,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "format_capitalization")]
    FormatCapitalization,
    #[serde(rename = "format_punctuation")]
    FormatPunctuation,
    #[serde(rename = "parse_error")]
    ParseError,
    #[serde(rename = "io_error")]
    IoError,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Missing => "missing",
            IssueCategory::Empty => "empty",
            IssueCategory::FormatCapitalization => "format_capitalization",
            IssueCategory::FormatPunctuation => "format_punctuation",
            IssueCategory::ParseError => "parse_error",
            IssueCategory::IoError => "io_error",
        }
    }

    /// Whether this category is scoped to the whole file rather than a
    /// single entity. File-scoped issues are the only issue emitted for
    /// their file.
    pub fn is_file_scoped(&self) -> bool {
        matches!(self, IssueCategory::ParseError | IssueCategory::IoError)
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single docstring compliance issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub category: IssueCategory,
    pub message: String,
    /// Line of the offending definition (1-indexed).
    pub line: usize,
    /// Kind of the offending entity. `None` for file-scoped issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_kind: Option<EntityKind>,
    /// Qualified name of the offending entity. `None` for file-scoped issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
}

impl Issue {
    /// Create a file-scoped issue (parse or read failure).
    pub fn file_scoped(category: IssueCategory, line: usize, message: String) -> Self {
        Self {
            category,
            message,
            line,
            entity_kind: None,
            qualified_name: None,
        }
    }
}

/// All issues recorded for a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Path relative to the scan root.
    pub path: String,
    /// Issues ordered by line, discovery order breaking ties.
    pub issues: Vec<Issue>,
}

/// Result of a full scan, built fresh on every run.
///
/// Files appear in discovery order; a new scan produces a new report
/// rather than mutating a previous one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Per-file issue lists, files without issues omitted.
    pub files: Vec<FileReport>,
    /// Number of files visited by the scan.
    pub scanned: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of issues across all files.
    pub fn total_issues(&self) -> usize {
        self.files.iter().map(|f| f.issues.len()).sum()
    }

    /// Number of files with at least one issue.
    pub fn files_with_issues(&self) -> usize {
        self.files.len()
    }

    /// Whether the scanned tree is fully compliant.
    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }
}
