//! Audit store and rejection sink
//!
//! Rejected rows are quarantined into `audit.rejected_rows`, an
//! append-only table: one record per (row, failing rule), full row
//! payload as a JSON document, timestamp assigned by the store at write
//! time. Payload schemas differ table to table; the JSON column absorbs
//! that. Nothing ever updates or deletes entries.

use crate::error::{EngineError, EngineResult};
use serde::Serialize;
use svf_core::sql_utils::escape_sql_string;
use svf_db::Database;

/// Qualified name of the audit table
pub const AUDIT_TABLE: &str = "audit.rejected_rows";

/// Durable quarantine log for rejected rows
pub struct AuditStore<'a> {
    db: &'a dyn Database,
}

/// One audit entry read back from the store
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    /// Silver table the row was rejected from
    pub table_name: String,

    /// Reason code from the matching quality rule
    pub reason: String,

    /// Full rejected row as a JSON document
    pub payload: serde_json::Value,

    /// Store-assigned write timestamp, rendered as text
    pub rejected_at: String,
}

impl<'a> AuditStore<'a> {
    /// Create a store over a database handle
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Create the audit schema and table if they do not exist
    pub async fn ensure(&self) -> EngineResult<()> {
        self.db.create_schema_if_not_exists("audit").await?;
        self.db
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS audit.rejected_rows (
                    table_name  VARCHAR NOT NULL,
                    reason      VARCHAR NOT NULL,
                    payload     JSON NOT NULL,
                    rejected_at TIMESTAMP NOT NULL DEFAULT current_timestamp
                );
                "#,
            )
            .await?;
        Ok(())
    }

    /// Append one rejection record. The timestamp is assigned by the
    /// store; existing entries are never touched.
    pub async fn append(
        &self,
        table_name: &str,
        reason: &str,
        payload: &str,
    ) -> EngineResult<()> {
        self.db
            .execute_params(
                "INSERT INTO audit.rejected_rows (table_name, reason, payload) \
                 VALUES (?, ?, CAST(? AS JSON))",
                &[table_name, reason, payload],
            )
            .await
            .map_err(|source| EngineError::QuarantineWrite {
                table: table_name.to_string(),
                source,
            })?;
        Ok(())
    }

    /// Most recent entries, newest first
    pub async fn recent(&self, limit: usize) -> EngineResult<Vec<RejectedRow>> {
        let sql = format!(
            "SELECT table_name, reason, CAST(payload AS VARCHAR), CAST(rejected_at AS VARCHAR) \
             FROM audit.rejected_rows ORDER BY rejected_at DESC LIMIT {limit}"
        );
        let rows = self.db.query_rows(&sql).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let [table_name, reason, payload, rejected_at]: [String; 4] =
                row.try_into().map_err(|_| {
                    EngineError::Db(svf_db::DbError::ExecutionError(
                        "audit query returned an unexpected column count".to_string(),
                    ))
                })?;
            out.push(RejectedRow {
                table_name,
                reason,
                payload: serde_json::from_str(&payload)?,
                rejected_at,
            });
        }
        Ok(out)
    }

    /// Number of entries for a table under one reason
    pub async fn count_for(&self, table_name: &str, reason: &str) -> EngineResult<usize> {
        let sql = format!(
            "SELECT * FROM audit.rejected_rows WHERE table_name = '{}' AND reason = '{}'",
            escape_sql_string(table_name),
            escape_sql_string(reason)
        );
        Ok(self.db.query_count(&sql).await?)
    }
}

/// Writes rejections for one table to the audit store, tallying as it
/// goes. Dedup never goes through here - duplicate removal is data
/// hygiene, not a quality violation.
pub struct RejectionSink<'a> {
    store: &'a AuditStore<'a>,
    table: String,
    recorded: usize,
}

impl<'a> RejectionSink<'a> {
    /// Create a sink bound to one silver table
    pub fn new(store: &'a AuditStore<'a>, table: &str) -> Self {
        Self {
            store,
            table: table.to_string(),
            recorded: 0,
        }
    }

    /// Record one rejected row under a reason code
    pub async fn record(&mut self, reason: &str, payload: &str) -> EngineResult<()> {
        self.store.append(&self.table, reason, payload).await?;
        self.recorded += 1;
        Ok(())
    }

    /// Total rows recorded through this sink
    pub fn recorded(&self) -> usize {
        self.recorded
    }
}
