//! Pre-run configuration validation
//!
//! Runs before any table is rebuilt and has zero side effects: each
//! source query's schema is probed with DESCRIBE, the primary key must
//! be projected, and every column a rule predicate references must
//! exist in the transformed schema. A bad rule is a configuration
//! error, never a silently skipped check.

use crate::error::{EngineError, EngineResult};
use regex::Regex;
use std::sync::OnceLock;
use svf_core::{PipelineSpec, TableSpec};
use svf_db::Database;

static QUOTED_IDENT: OnceLock<Regex> = OnceLock::new();

fn quoted_ident_regex() -> &'static Regex {
    QUOTED_IDENT.get_or_init(|| Regex::new(r#""[^"]+""#).expect("valid regex"))
}

/// Extract the double-quoted column identifiers a predicate references.
///
/// Identifiers adjacent to a `.` are skipped: those are schema or table
/// components of qualified names (e.g. the FK subquery target
/// `silver."orders"`), not columns of the table under validation.
pub fn predicate_columns(predicate: &str) -> Vec<String> {
    let mut columns = Vec::new();
    for m in quoted_ident_regex().find_iter(predicate) {
        let before = predicate[..m.start()].chars().next_back();
        let after = predicate[m.end()..].chars().next();
        if before == Some('.') || after == Some('.') {
            continue;
        }
        let ident = m.as_str().trim_matches('"').to_string();
        if !columns.contains(&ident) {
            columns.push(ident);
        }
    }
    columns
}

/// Validate one table spec against its probed source-query schema
async fn check_table(db: &dyn Database, spec: &TableSpec) -> EngineResult<()> {
    let columns =
        db.query_schema(&spec.source_query)
            .await
            .map_err(|source| EngineError::SchemaProbe {
                table: spec.name.clone(),
                source,
            })?;

    if !columns.contains(&spec.primary_key) {
        return Err(EngineError::PrimaryKeyNotProjected {
            table: spec.name.clone(),
            column: spec.primary_key.clone(),
        });
    }

    for rule in &spec.rules {
        for column in predicate_columns(&rule.predicate) {
            if !columns.contains(&column) {
                return Err(EngineError::UnknownRuleColumn {
                    table: spec.name.clone(),
                    reason: rule.reason.clone(),
                    column,
                });
            }
        }
    }

    Ok(())
}

/// Validate a whole pipeline: spec shape and ordering first (no
/// database needed), then every table against its probed schema.
pub async fn check(db: &dyn Database, pipeline: &PipelineSpec) -> EngineResult<()> {
    pipeline.validate()?;
    for spec in &pipeline.tables {
        check_table(db, spec).await?;
    }
    Ok(())
}
