//! Primary-key deduplication
//!
//! Within each primary-key group, the row with the lowest ingestion
//! sequence number survives - first-seen wins, computed over the
//! explicit ordering column assigned at rebuild, never storage-engine
//! row identity. Rows with a NULL key are excluded from grouping and
//! left untouched; they should already have been quarantined by a
//! missing-ID rule. Removal is data hygiene: nothing is written to the
//! audit store.

use crate::error::{EngineError, EngineResult};
use crate::transformer::ROW_SEQ_COLUMN;
use log::debug;
use svf_core::sql_utils::quote_ident;
use svf_db::Database;

/// Removes duplicate primary-key rows from a rebuilt table
pub struct Deduplicator<'a> {
    db: &'a dyn Database,
}

impl<'a> Deduplicator<'a> {
    /// Create a deduplicator over a database handle
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Deduplicate `qualified` (a quoted, schema-qualified name) on
    /// `primary_key`, returning the number of rows discarded.
    pub async fn deduplicate(
        &self,
        qualified: &str,
        table: &str,
        primary_key: &str,
    ) -> EngineResult<usize> {
        let seq = quote_ident(ROW_SEQ_COLUMN);
        let pk = quote_ident(primary_key);

        let sql = format!(
            "DELETE FROM {qualified} \
             WHERE {seq} IN ( \
                 SELECT {seq} FROM ( \
                     SELECT {seq}, \
                            row_number() OVER (PARTITION BY {pk} ORDER BY {seq}) AS dup_rank \
                     FROM {qualified} \
                     WHERE {pk} IS NOT NULL \
                 ) ranked \
                 WHERE dup_rank > 1 \
             )"
        );

        let removed = self
            .db
            .execute(&sql)
            .await
            .map_err(|source| EngineError::Dedup {
                table: table.to_string(),
                source,
            })?;

        debug!("Deduplicated {}: {} duplicate rows removed", table, removed);
        Ok(removed)
    }
}
