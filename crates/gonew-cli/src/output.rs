//! Output formatting for gonew
//!
//! Supports text (colored terminal) and JSON output formats.

use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::path::Path;

use gonew_rewrite::{Change, ChangeKind};

use crate::process::TreeReport;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// A single rewrite decision
#[derive(Debug, Clone, Serialize)]
pub struct ChangeInfo {
    pub kind: &'static str,
    pub line: usize,
    pub message: String,
}

impl From<&Change> for ChangeInfo {
    fn from(change: &Change) -> Self {
        let kind = match change.kind {
            ChangeKind::PackageRenamed { .. } => "package",
            ChangeKind::ImportRewritten { .. } => "import",
            ChangeKind::AliasInserted { .. } => "alias",
        };
        Self {
            kind,
            line: change.line,
            message: change.kind.to_string(),
        }
    }
}

/// Changes made to one file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    pub changes: Vec<ChangeInfo>,
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub files_excluded: usize,
    pub total_changes: usize,
    pub warnings: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub module: String,
    pub directory: String,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    warnings: Vec<String>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            warnings: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report a rewritten file
    pub fn report_file(&mut self, path: &Path, changes: &[Change]) {
        self.summary.files_scanned += 1;
        if changes.is_empty() {
            return;
        }

        self.summary.files_rewritten += 1;
        self.summary.total_changes += changes.len();

        if self.verbose && self.format == OutputFormat::Text {
            println!("{}", path.display().to_string().bold());
            for change in changes {
                println!("  {} {}:{}", "->".green(), change.line, change.kind);
            }
        }

        self.results.push(FileResult {
            path: path.display().to_string(),
            changes: changes.iter().map(ChangeInfo::from).collect(),
        });
    }

    /// Report a file left out by the exclude patterns
    pub fn report_excluded(&mut self, path: &Path) {
        self.summary.files_excluded += 1;
        if self.verbose && self.format == OutputFormat::Text {
            println!("{}: excluded", path.display());
        }
    }

    /// Report a recoverable problem
    pub fn report_warning(&mut self, message: &str) {
        self.summary.warnings += 1;
        if self.format == OutputFormat::Text {
            eprintln!("{}: {}", "Warning".yellow(), message);
        }
        self.warnings.push(message.to_string());
    }

    /// Report everything a tree rewrite did
    pub fn report_tree(&mut self, report: &TreeReport) {
        if let Some(manifest) = &report.manifest {
            match &manifest.warning {
                Some(warning) => self.report_warning(warning),
                None if manifest.rewritten.is_some() => {
                    self.summary.files_rewritten += 1;
                    if self.verbose && self.format == OutputFormat::Text {
                        println!("{}", manifest.path.display().to_string().bold());
                        println!("  {} module statement updated", "->".green());
                    }
                }
                None => {}
            }
        }
        for outcome in &report.sources {
            self.report_file(&outcome.path, &outcome.changes);
        }
        for path in &report.excluded {
            self.report_excluded(path);
        }
        if self.verbose && self.format == OutputFormat::Text {
            for path in &report.removed_metadata {
                println!("{}: removed", path.display());
            }
        }
    }

    /// Print final summary/output
    pub fn finish(self, module: &str, directory: &Path) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                if self.verbose {
                    println!();
                    println!("{}", "Summary".bold().underline());
                    println!("  Go files scanned: {}", self.summary.files_scanned);
                    println!("  Files rewritten: {}", self.summary.files_rewritten);
                    println!("  Total changes: {}", self.summary.total_changes);
                    if self.summary.files_excluded > 0 {
                        println!("  Files excluded: {}", self.summary.files_excluded);
                    }
                    println!();
                }
                println!(
                    "{} {} in {}",
                    "initialized".green(),
                    module,
                    directory.display()
                );
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    module: module.to_string(),
                    directory: directory.display().to_string(),
                    summary: self.summary,
                    warnings: self.warnings,
                    files: self.results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import_change(line: usize) -> Change {
        Change {
            line,
            kind: ChangeKind::ImportRewritten {
                from: "a/old".to_string(),
                to: "b/new".to_string(),
            },
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("diff"), None);
    }

    #[test]
    fn test_summary_counts() {
        let mut reporter = Reporter::new(OutputFormat::Json, false);
        reporter.report_file(Path::new("a.go"), &[import_change(3), import_change(4)]);
        reporter.report_file(Path::new("b.go"), &[]);
        reporter.report_excluded(Path::new("c.go"));
        reporter.report_warning("go.mod:1:1: bad");

        let summary = &reporter.summary;
        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.files_rewritten, 1);
        assert_eq!(summary.total_changes, 2);
        assert_eq!(summary.files_excluded, 1);
        assert_eq!(summary.warnings, 1);
    }

    #[test]
    fn test_change_info() {
        let info = ChangeInfo::from(&Change {
            line: 1,
            kind: ChangeKind::PackageRenamed {
                from: "old".to_string(),
                to: "new".to_string(),
            },
        });
        assert_eq!(info.kind, "package");
        assert_eq!(info.message, "package old -> package new");
    }

    #[test]
    fn test_json_serialization() {
        let output = JsonOutput {
            version: "0.1.0".to_string(),
            module: "your.domain/myprog".to_string(),
            directory: "myprog".to_string(),
            summary: Summary {
                files_scanned: 3,
                files_rewritten: 1,
                files_excluded: 0,
                total_changes: 1,
                warnings: 0,
            },
            warnings: vec![],
            files: vec![FileResult {
                path: "main.go".to_string(),
                changes: vec![ChangeInfo::from(&import_change(5))],
            }],
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"module\":\"your.domain/myprog\""));
        assert!(json.contains("\"files_scanned\":3"));
        assert!(json.contains("\"kind\":\"import\""));
        assert!(!json.contains("\"warnings\":["));
    }
}
