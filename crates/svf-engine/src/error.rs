//! Error types for svf-engine

use svf_core::report::Stage;
use svf_core::CoreError;
use svf_db::DbError;
use thiserror::Error;

/// Engine error type. Variants carry the table and, implicitly, the
/// transform stage at which they arise (see [`EngineError::stage`]).
#[derive(Error, Debug)]
pub enum EngineError {
    /// Spec-level configuration error from svf-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// V001: Probing a source query's schema failed
    #[error("[V001] Failed to probe source query schema for '{table}': {source}")]
    SchemaProbe { table: String, source: DbError },

    /// V002: Primary key not projected by the source query
    #[error("[V002] Primary key \"{column}\" of table '{table}' is not projected by its source query")]
    PrimaryKeyNotProjected { table: String, column: String },

    /// V003: A quality rule references a column the source query does not project
    #[error("[V003] Rule '{reason}' on table '{table}' references unknown column \"{column}\"")]
    UnknownRuleColumn {
        table: String,
        reason: String,
        column: String,
    },

    /// V004: The rebuild query failed; the table state is undefined and
    /// the transform must be retried from the rebuild step
    #[error("[V004] Rebuild of '{table}' failed: {source}")]
    Rebuild { table: String, source: DbError },

    /// V005: A quality rule failed to execute
    #[error("[V005] Rule '{reason}' on '{table}' failed to execute: {source}")]
    RuleExecution {
        table: String,
        reason: String,
        source: DbError,
    },

    /// V006: Writing rejected rows to the audit store failed. Fatal for
    /// the table's run - quality checks must not succeed with their
    /// rejections dropped.
    #[error("[V006] Quarantine write for '{table}' failed: {source}")]
    QuarantineWrite { table: String, source: DbError },

    /// V007: Deduplication failed
    #[error("[V007] Deduplication of '{table}' failed: {source}")]
    Dedup { table: String, source: DbError },

    /// V008: Committing or finalizing a table transform failed
    #[error("[V008] Finalizing '{table}' failed: {source}")]
    Finalize { table: String, source: DbError },

    /// V009: Database error outside any table transform (bootstrap,
    /// audit reads)
    #[error("[V009] Database error: {0}")]
    Db(#[from] DbError),

    /// Malformed payload read back from the audit store
    #[error("Audit payload is not valid JSON: {0}")]
    PayloadParse(#[from] serde_json::Error),
}

impl EngineError {
    /// The transform stage this error belongs to
    pub fn stage(&self) -> Stage {
        match self {
            EngineError::Core(_)
            | EngineError::SchemaProbe { .. }
            | EngineError::PrimaryKeyNotProjected { .. }
            | EngineError::UnknownRuleColumn { .. }
            | EngineError::Db(_)
            | EngineError::PayloadParse(_) => Stage::Preflight,
            EngineError::Rebuild { .. } => Stage::Rebuild,
            EngineError::RuleExecution { .. } => Stage::Validate,
            EngineError::QuarantineWrite { .. } => Stage::Quarantine,
            EngineError::Dedup { .. } => Stage::Deduplicate,
            EngineError::Finalize { .. } => Stage::Finalize,
        }
    }

    /// Whether this is a pre-run configuration error (fatal before any
    /// table is touched)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::Core(_)
                | EngineError::SchemaProbe { .. }
                | EngineError::PrimaryKeyNotProjected { .. }
                | EngineError::UnknownRuleColumn { .. }
        )
    }
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
