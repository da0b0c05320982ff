//! svf-db - Database abstraction layer for Silverflow
//!
//! This crate provides the `Database` trait the engine runs against and
//! the DuckDB implementation backing the warehouse.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
