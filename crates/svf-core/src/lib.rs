//! svf-core - Core library for Silverflow
//!
//! This crate provides the shared types used across all Silverflow
//! components: table specifications, the dependency DAG, run reports,
//! SQL identifier utilities, and the built-in food-delivery catalog.

pub mod catalog;
pub mod dag;
pub mod error;
pub mod report;
pub mod spec;
pub mod sql_utils;

pub use dag::TableDag;
pub use error::{CoreError, CoreResult};
pub use report::{
    RejectionCount, RunStatus, RunSummary, Stage, TableOutcome, TableStatus, TransformReport,
};
pub use spec::{PipelineSpec, QualityRule, TableSpec};
