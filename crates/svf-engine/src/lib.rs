//! svf-engine - the Silverflow conformance engine
//!
//! Turns bronze tables into silver tables: each table is rebuilt from
//! its source query, rows failing quality rules are quarantined into an
//! append-only audit store, and duplicate primary keys are resolved
//! first-seen-wins - one transaction per table, configuration validated
//! up front, failures isolated per table.

pub mod audit;
pub mod dedup;
pub mod error;
pub mod orchestrator;
pub mod preflight;
pub mod transformer;
pub mod validator;

pub use audit::{AuditStore, RejectedRow, RejectionSink};
pub use dedup::Deduplicator;
pub use error::{EngineError, EngineResult};
pub use orchestrator::Pipeline;
pub use transformer::{TableTransformer, ROW_SEQ_COLUMN, SILVER_SCHEMA};
pub use validator::{QualityValidator, ValidationOutcome};
