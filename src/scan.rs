//! Scan orchestration: directory walk, per-file analysis, aggregation.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use walkdir::WalkDir;

use crate::extract::{ExtractError, PythonExtractor};
use crate::issue::{FileReport, Issue, IssueCategory, Report};
use crate::rules;

/// Directory names pruned from the walk by default. Files beneath a pruned
/// directory are never read.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    "build",
    "dist",
    ".eggs",
];

/// Scan configuration, passed in explicitly rather than read from
/// process-wide state.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory names to prune entirely during the walk.
    pub skip_dirs: Vec<String>,
    /// Analyze files across worker threads. The rendered report is
    /// byte-identical to a sequential run on the same input.
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            parallel: false,
        }
    }
}

/// Unrecoverable scan failure: only an inaccessible scan root. Everything
/// below the root is recorded as a per-file issue instead, and the scan
/// continues.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot access scan root {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One unit of work discovered by the walk: either a Python file to
/// analyze, or an entry the walk itself could not read, carried as a
/// ready-made issue so it lands in the report at its discovery position.
enum WalkEntry {
    File(PathBuf),
    Failed(FileReport),
}

/// Runs the full analysis pipeline over a source tree.
pub struct Scanner {
    root: PathBuf,
    config: ScanConfig,
    extractor: PythonExtractor,
}

impl Scanner {
    /// Create a scanner with the default configuration.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config: ScanConfig::default(),
            extractor: PythonExtractor::new(),
        }
    }

    /// Replace the scan configuration.
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Walk the tree and produce a fresh report.
    ///
    /// An inaccessible root aborts the run with no partial report; every
    /// other failure is recorded per file and the scan continues.
    pub fn run(&self) -> Result<Report, ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| ScanError::Root {
            path: self.root.clone(),
            source: e,
        })?;

        let entries = if metadata.is_dir() {
            self.collect_entries()
        } else {
            vec![WalkEntry::File(self.root.clone())]
        };

        let scanned = entries
            .iter()
            .filter(|e| matches!(e, WalkEntry::File(_)))
            .count();

        let file_reports: Vec<FileReport> = if self.config.parallel {
            // Fan out per file, then restore discovery order so the rendered
            // report matches a sequential run byte for byte.
            let mut indexed: Vec<(usize, FileReport)> = entries
                .par_iter()
                .enumerate()
                .map(|(i, entry)| (i, self.evaluate(entry)))
                .collect();
            indexed.sort_by_key(|(i, _)| *i);
            indexed.into_iter().map(|(_, r)| r).collect()
        } else {
            entries.iter().map(|entry| self.evaluate(entry)).collect()
        };

        Ok(Report {
            files: file_reports
                .into_iter()
                .filter(|f| !f.issues.is_empty())
                .collect(),
            scanned,
        })
    }

    /// Enumerate Python files under the root in discovery order, pruning
    /// configured directory names entirely. Walk failures below the root
    /// (e.g. an unreadable subdirectory) become `io_error` entries rather
    /// than aborting the run.
    fn collect_entries(&self) -> Vec<WalkEntry> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.file_type().is_dir() && e.depth() > 0 {
                    let name = e.file_name().to_string_lossy();
                    if self.config.skip_dirs.iter().any(|d| d == name.as_ref()) {
                        return false;
                    }
                }
                true
            })
        {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file()
                        && entry.path().extension().and_then(|e| e.to_str()) == Some("py")
                    {
                        entries.push(WalkEntry::File(entry.path().to_path_buf()));
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| self.relative_path(p))
                        .unwrap_or_else(|| self.relative_path(&self.root));
                    entries.push(WalkEntry::Failed(FileReport {
                        path,
                        issues: vec![Issue::file_scoped(
                            IssueCategory::IoError,
                            1,
                            format!("could not read directory entry: {}", e),
                        )],
                    }));
                }
            }
        }

        entries
    }

    fn evaluate(&self, entry: &WalkEntry) -> FileReport {
        match entry {
            WalkEntry::File(path) => self.check_file(path),
            WalkEntry::Failed(report) => report.clone(),
        }
    }

    /// Analyze one file: extract entities, classify, validate, and collect
    /// the file's issues in entity order.
    fn check_file(&self, path: &Path) -> FileReport {
        let rel_path = self.relative_path(path);

        let source = match fs::read(path) {
            Ok(s) => s,
            Err(e) => {
                return FileReport {
                    path: rel_path,
                    issues: vec![Issue::file_scoped(
                        IssueCategory::IoError,
                        1,
                        format!("could not read file: {}", e),
                    )],
                };
            }
        };

        let entities = match self.extractor.extract(path, &source) {
            Ok(entities) => entities,
            Err(ExtractError::Syntax { line }) => {
                return FileReport {
                    path: rel_path,
                    issues: vec![Issue::file_scoped(
                        IssueCategory::ParseError,
                        line,
                        "syntax error prevented analysis".to_string(),
                    )],
                };
            }
            Err(ExtractError::Parser(msg)) => {
                return FileReport {
                    path: rel_path,
                    issues: vec![Issue::file_scoped(IssueCategory::ParseError, 1, msg)],
                };
            }
        };

        let issues = entities
            .iter()
            .filter(|e| rules::requires_docstring(e))
            .flat_map(rules::validate)
            .collect();

        FileReport {
            path: rel_path,
            issues,
        }
    }

    /// Path relative to the scan root. When the root is itself the scanned
    /// file, stripping the prefix leaves nothing, so fall back to the file
    /// name.
    fn relative_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        if rel.as_os_str().is_empty() {
            return path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string());
        }
        rel.to_string_lossy().replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_clean_tree_yields_empty_report() {
        let temp = TempDir::new().unwrap();
        write(
            &temp,
            "ok.py",
            "\"\"\"Compliant module.\"\"\"\n\ndef run():\n    \"\"\"Runs the thing.\"\"\"\n    pass\n",
        );

        let report = Scanner::new(temp.path()).run().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.scanned, 1);
    }

    #[test]
    fn test_issues_collected_in_line_order() {
        let temp = TempDir::new().unwrap();
        write(
            &temp,
            "bad.py",
            "def first():\n    pass\n\nclass Thing:\n    def method(self):\n        pass\n",
        );

        let report = Scanner::new(temp.path()).run().unwrap();
        assert_eq!(report.files_with_issues(), 1);

        let lines: Vec<usize> = report.files[0].issues.iter().map(|i| i.line).collect();
        // Module, first, Thing, Thing.method.
        assert_eq!(lines, vec![1, 1, 4, 5]);
    }

    #[test]
    fn test_parse_error_is_sole_issue_for_file() {
        let temp = TempDir::new().unwrap();
        write(&temp, "broken.py", "def broken(:\n    pass\n");
        write(&temp, "missing.py", "def undocumented():\n    pass\n");

        let report = Scanner::new(temp.path()).run().unwrap();
        assert_eq!(report.files_with_issues(), 2);

        let broken = report
            .files
            .iter()
            .find(|f| f.path == "broken.py")
            .unwrap();
        assert_eq!(broken.issues.len(), 1);
        assert_eq!(broken.issues[0].category, IssueCategory::ParseError);

        // Other files are still fully evaluated.
        let missing = report
            .files
            .iter()
            .find(|f| f.path == "missing.py")
            .unwrap();
        assert!(missing
            .issues
            .iter()
            .any(|i| i.category == IssueCategory::Missing));
    }

    #[test]
    fn test_skip_dirs_are_never_read() {
        let temp = TempDir::new().unwrap();
        write(&temp, "ok.py", "\"\"\"Fine.\"\"\"\n");
        write(&temp, ".venv/lib.py", "def undocumented():\n    pass\n");
        write(&temp, "__pycache__/junk.py", "def broken(:\n");

        let report = Scanner::new(temp.path()).run().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.scanned, 1);
    }

    #[test]
    fn test_custom_skip_dir() {
        let temp = TempDir::new().unwrap();
        write(&temp, "generated/gen.py", "def undocumented():\n    pass\n");

        let mut config = ScanConfig::default();
        config.skip_dirs.push("generated".to_string());

        let report = Scanner::new(temp.path()).with_config(config).run().unwrap();
        assert!(report.is_clean());
        assert_eq!(report.scanned, 0);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let err = Scanner::new("/nonexistent/doccheck-root").run().unwrap_err();
        assert!(matches!(err, ScanError::Root { .. }));
    }

    #[test]
    fn test_single_file_root() {
        let temp = TempDir::new().unwrap();
        write(&temp, "one.py", "def undocumented():\n    pass\n");

        let report = Scanner::new(temp.path().join("one.py")).run().unwrap();
        assert_eq!(report.scanned, 1);
        assert_eq!(report.files_with_issues(), 1);
        // The report path is the file name, never empty.
        assert_eq!(report.files[0].path, "one.py");
    }

    #[test]
    #[cfg(unix)]
    fn test_unreadable_subdirectory_does_not_abort_scan() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        write(&temp, "ok.py", "\"\"\"Fine.\"\"\"\n");
        let locked = temp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.py"), "def undocumented():\n    pass\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let result = Scanner::new(temp.path()).run();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // The run completes; the unreadable directory is recorded as an
        // io_error entry. Privileged runs can read the directory anyway,
        // in which case its file shows up as an ordinary violation.
        let report = result.unwrap();
        let locked_failure = report
            .files
            .iter()
            .find(|f| f.path == "locked")
            .map(|f| f.issues[0].category);
        let hidden_evaluated = report.files.iter().any(|f| f.path == "locked/hidden.py");

        match locked_failure {
            Some(category) => assert_eq!(category, IssueCategory::IoError),
            None => assert!(hidden_evaluated),
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let temp = TempDir::new().unwrap();
        for i in 0..8 {
            write(
                &temp,
                &format!("mod_{i}.py"),
                "def undocumented():\n    pass\n",
            );
        }
        write(&temp, "broken.py", "def broken(:\n");

        let sequential = Scanner::new(temp.path()).run().unwrap();
        let parallel = Scanner::new(temp.path())
            .with_config(ScanConfig {
                parallel: true,
                ..ScanConfig::default()
            })
            .run()
            .unwrap();

        let seq_paths: Vec<&str> = sequential.files.iter().map(|f| f.path.as_str()).collect();
        let par_paths: Vec<&str> = parallel.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(seq_paths, par_paths);
        assert_eq!(sequential.total_issues(), parallel.total_issues());
    }

    #[test]
    fn test_idempotent_scan() {
        let temp = TempDir::new().unwrap();
        write(&temp, "a.py", "def undocumented():\n    pass\n");

        let first = Scanner::new(temp.path()).run().unwrap();
        let second = Scanner::new(temp.path()).run().unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
