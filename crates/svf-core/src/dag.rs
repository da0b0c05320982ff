//! Dependency graph over table specs
//!
//! The pipeline's execution order is declared statically, not computed;
//! the DAG exists to reject cyclic or dangling `depends_on`
//! declarations.

use crate::error::{CoreError, CoreResult};
use crate::spec::TableSpec;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// A directed graph of table dependencies
#[derive(Debug)]
pub struct TableDag {
    /// The underlying graph; an edge a -> b means b depends on a
    graph: DiGraph<String, ()>,

    /// Map from table name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl TableDag {
    /// Create a new empty DAG
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Build the DAG from a pipeline's table specs
    pub fn build(tables: &[TableSpec]) -> CoreResult<Self> {
        let mut dag = Self::new();

        for table in tables {
            dag.add_table(&table.name);
        }

        for table in tables {
            for dep in &table.depends_on {
                if !dag.contains(dep) {
                    return Err(CoreError::UnknownDependency {
                        table: table.name.clone(),
                        dependency: dep.clone(),
                    });
                }
                dag.add_dependency(&table.name, dep);
            }
        }

        Ok(dag)
    }

    /// Add a table node, reusing the existing node if present
    pub fn add_table(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(name) {
            idx
        } else {
            let idx = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), idx);
            idx
        }
    }

    /// Add a dependency edge (`table` depends on `dependency`)
    pub fn add_dependency(&mut self, table: &str, dependency: &str) {
        let table_idx = self.add_table(table);
        let dep_idx = self.add_table(dependency);
        // Edge goes from dependency to dependent so topological sort
        // yields dependencies first.
        self.graph.add_edge(dep_idx, table_idx, ());
    }

    /// Validate the DAG has no cycles
    pub fn validate(&self) -> CoreResult<()> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(CoreError::CircularDependency {
                cycle: self.find_cycle_path(cycle.node_id()),
            }),
        }
    }

    /// Check if a table exists in the DAG
    pub fn contains(&self, table: &str) -> bool {
        self.node_map.contains_key(table)
    }

    /// Find a cycle path starting from a node for error reporting
    fn find_cycle_path(&self, start: NodeIndex) -> String {
        let mut path: Vec<String> = vec![self.graph[start].clone()];
        let mut current = start;
        let mut visited = HashSet::new();
        visited.insert(current);

        while let Some(edge) = self.graph.edges(current).next() {
            let target = edge.target();
            path.push(self.graph[target].clone());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        path.join(" -> ")
    }
}

impl Default for TableDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
