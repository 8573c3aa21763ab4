use crate::errors::EntryError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Outcome of copying a single manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CopyResult {
    Copied {
        entry: String,
        source: PathBuf,
        destination: PathBuf,
    },
    Skipped {
        entry: String,
        source: PathBuf,
        destination: PathBuf,
        reason: String,
    },
    Failed {
        entry: String,
        source: PathBuf,
        destination: Option<PathBuf>,
        error: EntryError,
    },
}

impl CopyResult {
    pub fn entry(&self) -> &str {
        match self {
            CopyResult::Copied { entry, .. }
            | CopyResult::Skipped { entry, .. }
            | CopyResult::Failed { entry, .. } => entry,
        }
    }

    pub fn is_copied(&self) -> bool {
        matches!(self, CopyResult::Copied { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CopyResult::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CopyResult::Failed { .. })
    }
}

/// Ordered outcomes of one run, one per manifest entry
#[derive(Debug, Clone, Serialize)]
pub struct CopyReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<CopyResult>,
}

impl CopyReport {
    pub fn total_processed(&self) -> usize {
        self.results.len()
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total_processed();
        if total == 0 {
            0.0
        } else {
            summarize(self).copied as f64 / total as f64
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CopyResult> {
        self.results.iter().filter(|result| result.is_failed())
    }
}

/// Accumulates results while a run is in progress
#[derive(Debug)]
pub struct CopyReportBuilder {
    started_at: DateTime<Utc>,
    results: Vec<CopyResult>,
}

impl CopyReportBuilder {
    pub fn start(capacity: usize) -> Self {
        Self {
            started_at: Utc::now(),
            results: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, result: CopyResult) {
        self.results.push(result);
    }

    pub fn build(self) -> CopyReport {
        CopyReport {
            started_at: self.started_at,
            finished_at: Utc::now(),
            results: self.results,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopySummary {
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl fmt::Display for CopySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "copied={} skipped={} failed={}",
            self.copied, self.skipped, self.failed
        )
    }
}

/// Reduce a report to its outcome counts
pub fn summarize(report: &CopyReport) -> CopySummary {
    report
        .results
        .iter()
        .fold(CopySummary::default(), |mut summary, result| {
            match result {
                CopyResult::Copied { .. } => summary.copied += 1,
                CopyResult::Skipped { .. } => summary.skipped += 1,
                CopyResult::Failed { .. } => summary.failed += 1,
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copied(entry: &str) -> CopyResult {
        CopyResult::Copied {
            entry: entry.to_string(),
            source: PathBuf::from("/src").join(entry),
            destination: PathBuf::from("/dst").join(entry),
        }
    }

    fn failed(entry: &str) -> CopyResult {
        CopyResult::Failed {
            entry: entry.to_string(),
            source: PathBuf::from("/src").join(entry),
            destination: None,
            error: EntryError::SourceNotFound {
                path: PathBuf::from("/src").join(entry),
            },
        }
    }

    #[test]
    fn test_summarize_counts_each_outcome() {
        let mut builder = CopyReportBuilder::start(4);
        builder.push(copied("a"));
        builder.push(failed("b"));
        builder.push(CopyResult::Skipped {
            entry: "c".to_string(),
            source: PathBuf::from("/src/c"),
            destination: PathBuf::from("/dst/c"),
            reason: "destination already exists".to_string(),
        });
        builder.push(copied("d"));
        let report = builder.build();

        let summary = summarize(&report);
        assert_eq!(
            summary,
            CopySummary {
                copied: 2,
                skipped: 1,
                failed: 1
            }
        );
        assert_eq!(summary.to_string(), "copied=2 skipped=1 failed=1");
        assert_eq!(report.success_rate(), 0.5);
    }

    #[test]
    fn test_builder_preserves_push_order() {
        let mut builder = CopyReportBuilder::start(0);
        builder.push(failed("z"));
        builder.push(copied("a"));
        let report = builder.build();

        let entries: Vec<&str> = report.results.iter().map(CopyResult::entry).collect();
        assert_eq!(entries, ["z", "a"]);
        assert!(report.finished_at >= report.started_at);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_empty_report() {
        let report = CopyReportBuilder::start(0).build();
        assert_eq!(summarize(&report), CopySummary::default());
        assert_eq!(report.success_rate(), 0.0);
    }

    #[test]
    fn test_result_serializes_with_status_tag() {
        let json = serde_json::to_value(failed("b")).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"]["kind"], "source_not_found");
        assert!(json["destination"].is_null());
    }
}
