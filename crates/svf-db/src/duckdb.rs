//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use duckdb::types::ValueRef;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use svf_core::sql_utils::{escape_sql_string, quote_qualified, split_qualified_name};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.conn()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Query count synchronously
    fn query_count_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.conn()?;
        let subquery = sql.trim().trim_end_matches(';');
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({})", subquery), [], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count as usize)
    }

    /// Query rows synchronously, rendering every cell as text
    fn query_rows_sync(&self, sql: &str) -> DbResult<Vec<Vec<String>>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let ncols = row.as_ref().column_count();
            let mut rec = Vec::with_capacity(ncols);
            for i in 0..ncols {
                rec.push(value_to_string(row.get_ref(i)?));
            }
            out.push(rec);
        }
        Ok(out)
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let (schema, table) = split_qualified_name(name);

        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = '{}' AND table_name = '{}'",
            escape_sql_string(schema),
            escape_sql_string(table)
        );

        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        Ok(count > 0)
    }
}

/// Render a DuckDB value as text. NULL becomes the literal string NULL;
/// callers that need finer typing should cast in SQL.
fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Boolean(b) => b.to_string(),
        ValueRef::TinyInt(i) => i.to_string(),
        ValueRef::SmallInt(i) => i.to_string(),
        ValueRef::Int(i) => i.to_string(),
        ValueRef::BigInt(i) => i.to_string(),
        ValueRef::UTinyInt(i) => i.to_string(),
        ValueRef::USmallInt(i) => i.to_string(),
        ValueRef::UInt(i) => i.to_string(),
        ValueRef::UBigInt(i) => i.to_string(),
        ValueRef::Float(f) => f.to_string(),
        ValueRef::Double(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        other => format!("{:?}", other),
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn execute_params(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        let conn = self.conn()?;
        conn.execute(sql, duckdb::params_from_iter(params.iter().copied()))
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    async fn create_table_as(&self, name: &str, select: &str, replace: bool) -> DbResult<()> {
        let qname = quote_qualified(name);
        let sql = if replace {
            format!("CREATE OR REPLACE TABLE {} AS {}", qname, select)
        } else {
            format!("CREATE TABLE {} AS {}", qname, select)
        };
        self.execute_sync(&sql)?;
        Ok(())
    }

    async fn drop_if_exists(&self, name: &str) -> DbResult<()> {
        let qname = quote_qualified(name);
        // Try dropping as view first, then as table
        let _ = self.execute_sync(&format!("DROP VIEW IF EXISTS {}", qname));
        let _ = self.execute_sync(&format!("DROP TABLE IF EXISTS {}", qname));
        Ok(())
    }

    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()> {
        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quote_qualified(schema));
        self.execute_sync(&sql)?;
        Ok(())
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.query_count_sync(sql)
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<String>>> {
        self.query_rows_sync(sql)
    }

    async fn query_schema(&self, select: &str) -> DbResult<Vec<String>> {
        let subquery = select.trim().trim_end_matches(';');
        let rows = self.query_rows_sync(&format!(
            "SELECT column_name FROM (DESCRIBE {})",
            subquery
        ))?;
        Ok(rows.into_iter().filter_map(|mut r| r.pop()).collect())
    }

    async fn load_csv(&self, table: &str, path: &str) -> DbResult<()> {
        let sql = format!(
            "CREATE OR REPLACE TABLE {} AS SELECT * FROM read_csv_auto('{}')",
            quote_qualified(table),
            escape_sql_string(path)
        );
        self.execute_sync(&sql)
            .map_err(|e| DbError::CsvError(e.to_string()))?;
        Ok(())
    }

    async fn begin(&self) -> DbResult<()> {
        self.execute_batch_sync("BEGIN TRANSACTION;")
    }

    async fn commit(&self) -> DbResult<()> {
        self.execute_batch_sync("COMMIT;")
    }

    async fn rollback(&self) -> DbResult<()> {
        self.execute_batch_sync("ROLLBACK;")
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory() {
        let db = DuckDbBackend::in_memory().unwrap();
        assert_eq!(db.db_type(), "duckdb");
    }

    #[tokio::test]
    async fn test_create_table_as_qualified() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.create_schema_if_not_exists("silver").await.unwrap();
        db.create_table_as("silver.customers", "SELECT 1 AS id, 'a@b.c' AS email", true)
            .await
            .unwrap();

        assert!(db.relation_exists("silver.customers").await.unwrap());
        assert!(!db.relation_exists("silver.orders").await.unwrap());
    }

    #[tokio::test]
    async fn test_query_count() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(7) t(n)")
            .await
            .unwrap();

        let count = db.query_count("SELECT * FROM nums WHERE n > 2").await.unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_execute_params() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch("CREATE TABLE log (name VARCHAR, reason VARCHAR)")
            .await
            .unwrap();

        let n = db
            .execute_params(
                "INSERT INTO log (name, reason) VALUES (?, ?)",
                &["orders", "it's broken"],
            )
            .await
            .unwrap();
        assert_eq!(n, 1);

        let rows = db.query_rows("SELECT reason FROM log").await.unwrap();
        assert_eq!(rows, vec![vec!["it's broken".to_string()]]);
    }

    #[tokio::test]
    async fn test_query_rows_renders_nulls() {
        let db = DuckDbBackend::in_memory().unwrap();
        let rows = db
            .query_rows("SELECT 1 AS a, NULL AS b, 'x' AS c")
            .await
            .unwrap();
        assert_eq!(
            rows,
            vec![vec!["1".to_string(), "NULL".to_string(), "x".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_query_schema() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch("CREATE TABLE src (id INT, email VARCHAR)")
            .await
            .unwrap();

        let cols = db
            .query_schema("SELECT id, lower(email) AS email FROM src")
            .await
            .unwrap();
        assert_eq!(cols, vec!["id".to_string(), "email".to_string()]);
    }

    #[tokio::test]
    async fn test_query_schema_has_no_side_effects() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.query_schema("SELECT 1 AS id").await.unwrap();
        assert!(!db.relation_exists("id").await.unwrap());
    }

    #[tokio::test]
    async fn test_rollback_discards_changes() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch("CREATE TABLE t (id INT); INSERT INTO t VALUES (1);")
            .await
            .unwrap();

        db.begin().await.unwrap();
        db.execute("DELETE FROM t").await.unwrap();
        db.rollback().await.unwrap();

        assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_commit_keeps_changes() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch("CREATE TABLE t (id INT); INSERT INTO t VALUES (1), (2);")
            .await
            .unwrap();

        db.begin().await.unwrap();
        db.execute("DELETE FROM t WHERE id = 1").await.unwrap();
        db.commit().await.unwrap();

        assert_eq!(db.query_count("SELECT * FROM t").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Customers.csv");
        std::fs::write(&path, "Customer_id,Email\n1,a@b.c\n2,bad\n").unwrap();

        let db = DuckDbBackend::in_memory().unwrap();
        db.create_schema_if_not_exists("bronze").await.unwrap();
        db.load_csv("bronze.Customers", path.to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(
            db.query_count("SELECT * FROM bronze.\"Customers\"")
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_drop_if_exists() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.create_table_as("to_drop", "SELECT 1 AS id", false)
            .await
            .unwrap();

        db.drop_if_exists("to_drop").await.unwrap();

        assert!(!db.relation_exists("to_drop").await.unwrap());
    }
}
