//! Command implementations

pub mod rejections;
pub mod run;
pub mod seed;

use anyhow::{Context, Result};
use std::path::Path;
use svf_core::{catalog, PipelineSpec};
use svf_db::DuckDbBackend;

use crate::cli::GlobalArgs;

/// Resolve the pipeline to run: a YAML file if `--pipeline` was given,
/// otherwise the built-in food-delivery pipeline.
pub fn load_pipeline(global: &GlobalArgs) -> Result<PipelineSpec> {
    match &global.pipeline {
        Some(path) => PipelineSpec::load(Path::new(path))
            .with_context(|| format!("Failed to load pipeline from {}", path)),
        None => Ok(catalog::food_delivery()),
    }
}

/// Open the warehouse named by `--target`
pub fn connect(global: &GlobalArgs) -> Result<DuckDbBackend> {
    DuckDbBackend::new(&global.target)
        .with_context(|| format!("Failed to open database at {}", global.target))
}
