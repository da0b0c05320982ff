//! Quality rule evaluation and quarantine
//!
//! Rules run strictly in declared order. For each rule: matching rows
//! are captured in full (every column except the internal ordering
//! column), handed to the rejection sink, and only then deleted. A row
//! removed by an earlier rule is invisible to later rules, so a row
//! matching several predicates is attributed to the first - declared
//! order is authoritative.

use crate::audit::RejectionSink;
use crate::error::{EngineError, EngineResult};
use crate::transformer::ROW_SEQ_COLUMN;
use log::{debug, warn};
use svf_core::spec::TableSpec;
use svf_core::sql_utils::quote_ident;
use svf_core::RejectionCount;
use svf_db::Database;

/// Result of validating one table
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// Quarantined row counts, in rule order
    pub rejections: Vec<RejectionCount>,

    /// Total rows removed from the table
    pub rows_removed: usize,
}

/// Evaluates a table's quality rules and quarantines failing rows
pub struct QualityValidator<'a> {
    db: &'a dyn Database,
}

impl<'a> QualityValidator<'a> {
    /// Create a validator over a database handle
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Run the spec's rules against the freshly rebuilt table at
    /// `qualified` (a quoted, schema-qualified name).
    pub async fn validate(
        &self,
        qualified: &str,
        spec: &TableSpec,
        sink: &mut RejectionSink<'_>,
    ) -> EngineResult<ValidationOutcome> {
        let mut rejections = Vec::with_capacity(spec.rules.len());
        let mut rows_removed = 0;

        for rule in &spec.rules {
            // Capture before deletion: the audit record carries the full
            // row, and a failed capture must abort before anything is
            // removed.
            let capture_sql = format!(
                "SELECT CAST(to_json(r) AS VARCHAR) FROM (SELECT * EXCLUDE ({seq}) FROM {qualified} WHERE {predicate}) AS r",
                seq = quote_ident(ROW_SEQ_COLUMN),
                predicate = rule.predicate,
            );
            let captured = self.db.query_rows(&capture_sql).await.map_err(|source| {
                EngineError::RuleExecution {
                    table: spec.name.clone(),
                    reason: rule.reason.clone(),
                    source,
                }
            })?;

            for row in &captured {
                let payload = row.first().map(String::as_str).unwrap_or("{}");
                sink.record(&rule.reason, payload).await?;
            }

            let delete_sql = format!("DELETE FROM {qualified} WHERE {}", rule.predicate);
            let removed =
                self.db
                    .execute(&delete_sql)
                    .await
                    .map_err(|source| EngineError::RuleExecution {
                        table: spec.name.clone(),
                        reason: rule.reason.clone(),
                        source,
                    })?;

            if removed != captured.len() {
                warn!(
                    "Rule '{}' on {}: captured {} rows but deleted {}",
                    rule.reason,
                    spec.name,
                    captured.len(),
                    removed
                );
            }

            debug!(
                "Rule '{}' on {} quarantined {} rows",
                rule.reason, spec.name, removed
            );

            rows_removed += removed;
            rejections.push(RejectionCount {
                reason: rule.reason.clone(),
                rows: removed,
            });
        }

        Ok(ValidationOutcome {
            rejections,
            rows_removed,
        })
    }
}
