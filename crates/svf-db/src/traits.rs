//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Database abstraction trait for Silverflow
///
/// Implementations must be Send + Sync for async operation. All
/// statements issued between `begin` and `commit`/`rollback` belong to
/// one transaction; the engine relies on this for per-table atomicity.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute SQL with bound string parameters, returns affected rows
    async fn execute_params(&self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Create (or replace) a table from a SELECT statement
    async fn create_table_as(&self, name: &str, select: &str, replace: bool) -> DbResult<()>;

    /// Drop a table or view if it exists
    async fn drop_if_exists(&self, name: &str) -> DbResult<()>;

    /// Create a schema if it does not exist
    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Execute a query and return the row count of its result
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Execute a query and return every cell rendered as text
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<String>>>;

    /// Column names a SELECT statement would produce, without running it
    async fn query_schema(&self, select: &str) -> DbResult<Vec<String>>;

    /// Load a CSV file into a table, replacing existing contents
    async fn load_csv(&self, table: &str, path: &str) -> DbResult<()>;

    /// Begin a transaction
    async fn begin(&self) -> DbResult<()>;

    /// Commit the current transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the current transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
