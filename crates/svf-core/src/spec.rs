//! Table specifications - the configuration surface of the engine
//!
//! A [`TableSpec`] declares how one silver table is built and validated:
//! the source query against bronze, the primary key used for
//! deduplication, and an ordered list of quality rules whose predicates
//! select FAILING rows. Specs are plain data; everything that requires a
//! live database (schema probing, rule column checks) happens in the
//! engine's preflight step.

use crate::dag::TableDag;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One data-quality rule: a SQL predicate selecting rows that FAIL the
/// check, and the reason string recorded for each quarantined row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityRule {
    /// SQL boolean expression over the transformed table's columns.
    /// Rows matching it are quarantined.
    pub predicate: String,

    /// Free-form classification string written to the audit log
    pub reason: String,
}

impl QualityRule {
    /// Create a rule from predicate and reason strings
    pub fn new(predicate: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration for building one silver table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    /// Silver table name (unqualified; the engine qualifies it with the
    /// silver schema)
    pub name: String,

    /// Read query against bronze producing the target schema
    pub source_query: String,

    /// Primary key column, must be projected by `source_query`
    pub primary_key: String,

    /// Quality rules, evaluated strictly in this order. A row matching
    /// several rules is attributed to the first one.
    #[serde(default)]
    pub rules: Vec<QualityRule>,

    /// Silver tables that must be built before this one
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl TableSpec {
    /// Shape-level validation that needs no database: non-empty name,
    /// query, and primary key, and non-empty rule fields.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidSpec {
                table: self.name.clone(),
                reason: "table name is empty".to_string(),
            });
        }
        if self.source_query.trim().is_empty() {
            return Err(CoreError::InvalidSpec {
                table: self.name.clone(),
                reason: "source query is empty".to_string(),
            });
        }
        if self.primary_key.trim().is_empty() {
            return Err(CoreError::InvalidSpec {
                table: self.name.clone(),
                reason: "primary key is empty".to_string(),
            });
        }
        for rule in &self.rules {
            if rule.predicate.trim().is_empty() {
                return Err(CoreError::InvalidSpec {
                    table: self.name.clone(),
                    reason: format!("rule '{}' has an empty predicate", rule.reason),
                });
            }
            if rule.reason.trim().is_empty() {
                return Err(CoreError::InvalidSpec {
                    table: self.name.clone(),
                    reason: "rule has an empty reason".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// An ordered pipeline of table specs. The declared order is the
/// execution order and must respect `depends_on`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSpec {
    /// Pipeline name, used in logs and the run summary
    pub name: String,

    /// Table specs in execution order
    pub tables: Vec<TableSpec>,
}

impl PipelineSpec {
    /// Load a pipeline spec from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::SpecNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let spec: PipelineSpec = serde_yaml::from_str(&content)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Validate everything that needs no database: per-table shape,
    /// unique names, dependency closure, acyclicity, and that the
    /// declared order schedules every dependency before its dependent.
    pub fn validate(&self) -> CoreResult<()> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (idx, table) in self.tables.iter().enumerate() {
            table.validate()?;
            if positions.insert(table.name.as_str(), idx).is_some() {
                return Err(CoreError::DuplicateTable {
                    name: table.name.clone(),
                });
            }
        }

        for table in &self.tables {
            for dep in &table.depends_on {
                match positions.get(dep.as_str()) {
                    None => {
                        return Err(CoreError::UnknownDependency {
                            table: table.name.clone(),
                            dependency: dep.clone(),
                        })
                    }
                    Some(&dep_idx) if dep_idx >= positions[table.name.as_str()] => {
                        return Err(CoreError::OrderViolation {
                            table: table.name.clone(),
                            dependency: dep.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        // Cycle detection; with a valid order this cannot trigger, but a
        // hand-built spec list may reach here through code paths that
        // skipped the order check.
        TableDag::build(&self.tables)?.validate()?;

        Ok(())
    }

    /// Table names in execution order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}

#[cfg(test)]
#[path = "spec_test.rs"]
mod tests;
