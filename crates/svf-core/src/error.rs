//! Error types for svf-core

use thiserror::Error;

/// Core error type for Silverflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Pipeline spec file not found
    #[error("[E001] Pipeline spec not found: {path}")]
    SpecNotFound { path: String },

    /// E002: Invalid table spec value
    #[error("[E002] Invalid spec for table '{table}': {reason}")]
    InvalidSpec { table: String, reason: String },

    /// E003: Duplicate table name in a pipeline
    #[error("[E003] Duplicate table name: {name}")]
    DuplicateTable { name: String },

    /// E004: A spec depends on a table that is not part of the pipeline
    #[error("[E004] Table '{table}' depends on unknown table '{dependency}'")]
    UnknownDependency { table: String, dependency: String },

    /// E005: Circular dependency detected
    #[error("[E005] Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// E006: Declared table order contradicts the dependency graph
    #[error("[E006] Table '{table}' is scheduled before its dependency '{dependency}'")]
    OrderViolation { table: String, dependency: String },

    /// E007: IO error
    #[error("[E007] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E008: Spec YAML parse error
    #[error("[E008] Spec parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
