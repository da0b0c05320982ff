//! Pipeline orchestration
//!
//! Drives the table transformer over an ordered spec list. Preflight
//! runs first and aborts the whole run on configuration errors, before
//! any table is touched. After that, a table's failure is isolated: it
//! is logged with its stage and cause, recorded in the summary, and the
//! run proceeds to the next table. A failed parent typically surfaces
//! downstream as FK-rule rejections in its dependents, not as a hard
//! failure - that is expected.

use crate::audit::AuditStore;
use crate::error::EngineResult;
use crate::preflight;
use crate::transformer::{TableTransformer, SILVER_SCHEMA};
use log::{error, info};
use svf_core::{PipelineSpec, RunSummary, TableOutcome, TableStatus};
use svf_db::Database;

/// Runs a pipeline of table specs in declared order
pub struct Pipeline<'a> {
    db: &'a dyn Database,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline runner over a database handle
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Run every table in the pipeline, strictly in declared order.
    ///
    /// Returns `Err` only for pre-run configuration problems or if the
    /// engine's own bootstrap fails; per-table failures are captured in
    /// the summary.
    pub async fn run(&self, pipeline: &PipelineSpec) -> EngineResult<RunSummary> {
        preflight::check(self.db, pipeline).await?;

        self.db.create_schema_if_not_exists(SILVER_SCHEMA).await?;
        let audit = AuditStore::new(self.db);
        audit.ensure().await?;

        let mut summary = RunSummary::start(&pipeline.name);
        info!(
            "Run {} started: {} tables on {}",
            summary.run_id,
            pipeline.tables.len(),
            self.db.db_type()
        );

        let transformer = TableTransformer::new(self.db, &audit);
        for spec in &pipeline.tables {
            let status = match transformer.transform(spec).await {
                Ok(report) => {
                    info!(
                        "{}: {} loaded, {} quarantined, {} deduplicated, {} final",
                        spec.name,
                        report.rows_loaded,
                        report.rows_quarantined(),
                        report.duplicates_removed,
                        report.final_rows
                    );
                    TableStatus::Succeeded { report }
                }
                Err(err) => {
                    error!("{} failed at {}: {}", spec.name, err.stage(), err);
                    TableStatus::Failed {
                        stage: err.stage(),
                        error: err.to_string(),
                    }
                }
            };
            summary.record(TableOutcome {
                table: spec.name.clone(),
                status,
            });
        }

        summary.finish();
        info!(
            "Run {} finished: {} succeeded, {} failed, {} rows quarantined",
            summary.run_id,
            summary.succeeded(),
            summary.failed(),
            summary.total_quarantined()
        );
        Ok(summary)
    }
}
