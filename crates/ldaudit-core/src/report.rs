//! Audit report model.
//!
//! Each check stage produces a [`StageReport`] of what it examined and what it
//! found; a run folds the stage reports into a [`RunSummary`]. Warnings are
//! advisory and never affect the pass verdict, errors always do.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Weight of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Advisory. Reported, counted, and ignored by the pass verdict.
    Warning,
    /// A check failed for the document.
    Error,
}

/// The four check stages of an audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Well-formedness of every selected file as JSON.
    Syntax,
    /// JSON-LD expandability of `.jsonld` files.
    Structure,
    /// Conformance of example files to their bound schema.
    Schema,
    /// Conformance of example files to their expected context.
    Context,
}

impl Stage {
    /// Human-readable stage name used in section headers and summary lines.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Syntax => "JSON syntax",
            Stage::Structure => "JSON-LD structure",
            Stage::Schema => "Schema validation",
            Stage::Context => "Context conformance",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One observation about one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Document the finding refers to.
    pub path: PathBuf,
    /// Whether the finding fails the run.
    pub severity: Severity,
    /// Rendered description of what was found.
    pub message: String,
}

/// Everything one stage found across the files it examined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    /// Which stage produced this report.
    pub stage: Stage,
    /// How many files the stage examined. Findings may be fewer or more;
    /// a single file can produce several findings.
    pub checked: usize,
    /// Findings in the order they were recorded.
    pub findings: Vec<Finding>,
}

impl StageReport {
    /// Creates an empty report for a stage that examined `checked` files.
    pub fn new(stage: Stage, checked: usize) -> Self {
        Self {
            stage,
            checked,
            findings: Vec::new(),
        }
    }

    /// Records an error finding for `path`.
    pub fn record_error(&mut self, path: &Path, message: impl Into<String>) {
        self.findings.push(Finding {
            path: path.to_path_buf(),
            severity: Severity::Error,
            message: message.into(),
        });
    }

    /// Records a warning finding for `path`.
    pub fn record_warning(&mut self, path: &Path, message: impl Into<String>) {
        self.findings.push(Finding {
            path: path.to_path_buf(),
            severity: Severity::Warning,
            message: message.into(),
        });
    }

    /// Number of error findings.
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    /// Number of warning findings.
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    /// Whether any error finding was recorded.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }
}

/// Stage reports of one audit run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// One report per stage that ran.
    pub stages: Vec<StageReport>,
}

impl RunSummary {
    /// Sum of error findings across all stages.
    pub fn total_errors(&self) -> usize {
        self.stages.iter().map(StageReport::error_count).sum()
    }

    /// Sum of warning findings across all stages.
    pub fn total_warnings(&self) -> usize {
        self.stages.iter().map(StageReport::warning_count).sum()
    }

    /// The run verdict. Warnings do not fail a run.
    pub fn passed(&self) -> bool {
        self.stages.iter().all(|s| !s.has_errors())
    }

    /// Report for `stage`, when that stage ran.
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels_are_stable() {
        assert_eq!(Stage::Syntax.label(), "JSON syntax");
        assert_eq!(Stage::Structure.label(), "JSON-LD structure");
        assert_eq!(Stage::Schema.label(), "Schema validation");
        assert_eq!(Stage::Context.label(), "Context conformance");
        assert_eq!(Stage::Schema.to_string(), "Schema validation");
    }

    #[test]
    fn counts_separate_errors_from_warnings() {
        let mut report = StageReport::new(Stage::Context, 3);
        report.record_error(Path::new("/c/a.json"), "bad");
        report.record_warning(Path::new("/c/b.json"), "odd");
        report.record_error(Path::new("/c/c.json"), "worse");
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
        assert_eq!(report.checked, 3);
    }

    #[test]
    fn warnings_do_not_fail_a_run() {
        let mut warned = StageReport::new(Stage::Schema, 1);
        warned.record_warning(Path::new("/c/a.json"), "no binding");
        let summary = RunSummary {
            stages: vec![StageReport::new(Stage::Syntax, 4), warned],
        };
        assert!(summary.passed());
        assert_eq!(summary.total_errors(), 0);
        assert_eq!(summary.total_warnings(), 1);
    }

    #[test]
    fn any_stage_error_fails_the_run() {
        let mut broken = StageReport::new(Stage::Syntax, 2);
        broken.record_error(Path::new("/c/a.json"), "unparsable");
        let summary = RunSummary {
            stages: vec![broken, StageReport::new(Stage::Context, 2)],
        };
        assert!(!summary.passed());
        assert_eq!(summary.total_errors(), 1);
        assert!(summary.stage(Stage::Syntax).unwrap().has_errors());
        assert!(summary.stage(Stage::Schema).is_none());
    }
}
