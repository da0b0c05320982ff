//! Table transformer - rebuild, validate, deduplicate
//!
//! One transform is one transaction. The silver table is replaced
//! wholesale from its source query (zero rows empties it), quality
//! rules quarantine failing rows, duplicates are removed, and only then
//! does the transaction commit - a consumer never observes a table
//! mid-rebuild. On any failure the transaction rolls back and the table
//! must be retried from the rebuild step; there is no resuming
//! mid-validation.

use crate::audit::{AuditStore, RejectionSink};
use crate::dedup::Deduplicator;
use crate::error::{EngineError, EngineResult};
use crate::validator::QualityValidator;
use log::{info, warn};
use std::time::Instant;
use svf_core::spec::TableSpec;
use svf_core::sql_utils::{quote_ident, quote_qualified};
use svf_core::TransformReport;
use svf_db::Database;

/// Schema holding the engine's output tables
pub const SILVER_SCHEMA: &str = "silver";

/// Internal ingestion-order column, assigned at rebuild and dropped
/// before commit. The dedup tie-break is computed over it so the
/// first-seen policy does not depend on storage-engine internals.
pub const ROW_SEQ_COLUMN: &str = "_row_seq";

/// Rebuilds one silver table and runs validation and deduplication
/// against it
pub struct TableTransformer<'a> {
    db: &'a dyn Database,
    audit: &'a AuditStore<'a>,
}

impl<'a> TableTransformer<'a> {
    /// Create a transformer over a database handle and audit store
    pub fn new(db: &'a dyn Database, audit: &'a AuditStore<'a>) -> Self {
        Self { db, audit }
    }

    /// Transform one table as a single unit of work
    pub async fn transform(&self, spec: &TableSpec) -> EngineResult<TransformReport> {
        self.db
            .begin()
            .await
            .map_err(|source| EngineError::Rebuild {
                table: spec.name.clone(),
                source,
            })?;

        match self.transform_inner(spec).await {
            Ok(report) => {
                self.db
                    .commit()
                    .await
                    .map_err(|source| EngineError::Finalize {
                        table: spec.name.clone(),
                        source,
                    })?;
                Ok(report)
            }
            Err(err) => {
                // Best effort; the original error is the one to report.
                let _ = self.db.rollback().await;
                Err(err)
            }
        }
    }

    async fn transform_inner(&self, spec: &TableSpec) -> EngineResult<TransformReport> {
        let started = Instant::now();
        let qualified = quote_qualified(&format!("{}.{}", SILVER_SCHEMA, spec.name));
        let seq = quote_ident(ROW_SEQ_COLUMN);

        // 1. Rebuild: replace contents wholesale, tagging each row with
        // its position in the source query's output.
        let source = spec.source_query.trim().trim_end_matches(';');
        let select = format!("SELECT row_number() OVER () AS {seq}, q.* FROM ({source}) AS q");
        self.db
            .create_table_as(&format!("{}.{}", SILVER_SCHEMA, spec.name), &select, true)
            .await
            .map_err(|source| EngineError::Rebuild {
                table: spec.name.clone(),
                source,
            })?;

        let rows_loaded = self
            .db
            .query_count(&format!("SELECT * FROM {qualified}"))
            .await
            .map_err(|source| EngineError::Rebuild {
                table: spec.name.clone(),
                source,
            })?;
        info!("Rebuilt {} ({} rows)", spec.name, rows_loaded);

        // 2. Validate
        let validator = QualityValidator::new(self.db);
        let mut sink = RejectionSink::new(self.audit, &spec.name);
        let outcome = validator.validate(&qualified, spec, &mut sink).await?;
        if outcome.rows_removed > 0 {
            info!(
                "Quarantined {} rows from {} across {} rules",
                outcome.rows_removed,
                spec.name,
                spec.rules.len()
            );
        }

        // Null-key rows that survived validation are left in place; the
        // spec for this table is missing a missing-ID rule.
        let null_key_rows = self
            .db
            .query_count(&format!(
                "SELECT * FROM {qualified} WHERE {} IS NULL",
                quote_ident(&spec.primary_key)
            ))
            .await
            .map_err(|source| EngineError::Dedup {
                table: spec.name.clone(),
                source,
            })?;
        if null_key_rows > 0 {
            warn!(
                "{}: {} rows with NULL primary key \"{}\" survived validation and were not deduplicated",
                spec.name, null_key_rows, spec.primary_key
            );
        }

        // 3. Deduplicate, then drop the ordering column
        let dedup = Deduplicator::new(self.db);
        let duplicates_removed = dedup
            .deduplicate(&qualified, &spec.name, &spec.primary_key)
            .await?;

        self.db
            .execute(&format!("ALTER TABLE {qualified} DROP COLUMN {seq}"))
            .await
            .map_err(|source| EngineError::Finalize {
                table: spec.name.clone(),
                source,
            })?;

        let final_rows = self
            .db
            .query_count(&format!("SELECT * FROM {qualified}"))
            .await
            .map_err(|source| EngineError::Finalize {
                table: spec.name.clone(),
                source,
            })?;

        Ok(TransformReport {
            table: spec.name.clone(),
            rows_loaded,
            rejections: outcome.rejections,
            duplicates_removed,
            null_key_rows,
            final_rows,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}
