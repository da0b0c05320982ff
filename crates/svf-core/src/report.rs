//! Run reporting types
//!
//! A [`TransformReport`] describes one successful table transform; a
//! [`RunSummary`] collects per-table outcomes for a whole pipeline run.
//! Both serialize to JSON so the summary can be compared against bronze
//! row counts by reconciliation tooling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The stage of a table transform at which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Pre-run spec validation
    Preflight,
    /// Rebuilding the table from its source query
    Rebuild,
    /// Quality rule evaluation and quarantine
    Validate,
    /// Writing rejected rows to the audit store
    Quarantine,
    /// Primary-key deduplication
    Deduplicate,
    /// Dropping the ordering column and committing the transaction
    Finalize,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Preflight => "preflight",
            Stage::Rebuild => "rebuild",
            Stage::Validate => "validate",
            Stage::Quarantine => "quarantine",
            Stage::Deduplicate => "deduplicate",
            Stage::Finalize => "finalize",
        };
        f.write_str(s)
    }
}

/// Rows quarantined under one reason code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionCount {
    /// Reason code from the matching quality rule
    pub reason: String,

    /// Number of rows quarantined under this reason
    pub rows: usize,
}

/// Result of one successful table transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformReport {
    /// Silver table name
    pub table: String,

    /// Rows materialized by the rebuild, before validation
    pub rows_loaded: usize,

    /// Quarantined row counts, in rule order
    pub rejections: Vec<RejectionCount>,

    /// Duplicate rows discarded by the deduplicator
    pub duplicates_removed: usize,

    /// Rows with a NULL primary key that survived validation. These are
    /// left in place and surfaced here rather than silently patched.
    pub null_key_rows: usize,

    /// Rows in the final table
    pub final_rows: usize,

    /// Transform duration in milliseconds
    pub duration_ms: u64,
}

impl TransformReport {
    /// Total rows quarantined across all rules
    pub fn rows_quarantined(&self) -> usize {
        self.rejections.iter().map(|r| r.rows).sum()
    }
}

/// Outcome of one table within a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableOutcome {
    /// Silver table name
    pub table: String,

    /// Success or failure
    #[serde(flatten)]
    pub status: TableStatus,
}

/// Success or failure of a table transform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TableStatus {
    /// The table was fully rebuilt, validated, and deduplicated
    Succeeded {
        /// The transform report
        report: TransformReport,
    },
    /// The transform failed; the table's on-disk state carries no
    /// guarantee and the table must be re-run from rebuild
    Failed {
        /// Stage at which the failure occurred
        stage: Stage,
        /// Error message
        error: String,
    },
}

/// Status of a whole pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Run is currently in progress
    Running,
    /// All tables succeeded
    Completed,
    /// At least one table failed
    Failed,
}

/// Summary of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Short unique identifier for this run
    pub run_id: String,

    /// Pipeline name
    pub pipeline: String,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (None while running)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Run status
    pub status: RunStatus,

    /// Per-table outcomes, in execution order
    pub outcomes: Vec<TableOutcome>,
}

impl RunSummary {
    /// Start a new run summary
    pub fn start(pipeline: &str) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            pipeline: pipeline.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            status: RunStatus::Running,
            outcomes: Vec::new(),
        }
    }

    /// Record a table outcome
    pub fn record(&mut self, outcome: TableOutcome) {
        self.outcomes.push(outcome);
    }

    /// Mark the run finished, deriving the final status
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
        self.status = if self.all_succeeded() {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };
    }

    /// Whether every table succeeded
    pub fn all_succeeded(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| matches!(o.status, TableStatus::Succeeded { .. }))
    }

    /// Number of succeeded tables
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, TableStatus::Succeeded { .. }))
            .count()
    }

    /// Number of failed tables
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Aggregate quarantined row count across succeeded tables
    pub fn total_quarantined(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                TableStatus::Succeeded { report } => Some(report.rows_quarantined()),
                TableStatus::Failed { .. } => None,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(table: &str, rejected: usize) -> TransformReport {
        TransformReport {
            table: table.to_string(),
            rows_loaded: 10,
            rejections: vec![RejectionCount {
                reason: "Missing ID".to_string(),
                rows: rejected,
            }],
            duplicates_removed: 0,
            null_key_rows: 0,
            final_rows: 10 - rejected,
            duration_ms: 3,
        }
    }

    #[test]
    fn test_rows_quarantined_sums_reasons() {
        let mut r = report("customers", 2);
        r.rejections.push(RejectionCount {
            reason: "Invalid Email Format".to_string(),
            rows: 3,
        });
        assert_eq!(r.rows_quarantined(), 5);
    }

    #[test]
    fn test_summary_status_derivation() {
        let mut summary = RunSummary::start("food_delivery");
        summary.record(TableOutcome {
            table: "customers".to_string(),
            status: TableStatus::Succeeded {
                report: report("customers", 1),
            },
        });
        summary.record(TableOutcome {
            table: "orders".to_string(),
            status: TableStatus::Failed {
                stage: Stage::Rebuild,
                error: "boom".to_string(),
            },
        });
        summary.finish();

        assert_eq!(summary.status, RunStatus::Failed);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total_quarantined(), 1);
        assert!(summary.finished_at.is_some());
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let mut summary = RunSummary::start("food_delivery");
        summary.record(TableOutcome {
            table: "customers".to_string(),
            status: TableStatus::Succeeded {
                report: report("customers", 0),
            },
        });
        summary.finish();

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"status\":\"completed\""));
        assert!(json.contains("\"table\":\"customers\""));
    }
}
