//! Dependency graph and installation ordering.
//!
//! Every manifest in a batch becomes a node. For each declared dependency
//! the referenced module must be in the same batch and satisfy the version
//! constraint; an edge then runs from the dependency to the dependent.
//! Kahn's algorithm yields an order in which every dependency precedes the
//! modules that declare it.
//!
//! Ready nodes are taken first-in first-out, seeded in batch order, so the
//! result is deterministic for a given batch.
//!
//! Dependencies on modules installed by an earlier, separate batch are not
//! resolved: every dependency must be present in the batch being installed.
//!
//! # Example
//!
//! ```
//! use forge_modules::dependency::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_node("sales");
//! graph.add_node("crm");
//! graph.add_edge("crm", "sales");
//!
//! let order = graph.topological_order().unwrap();
//! assert_eq!(order, vec!["crm", "sales"]);
//! ```

use std::collections::{HashMap, VecDeque};

use crate::error::{Error, Result};
use crate::manifest::{Manifest, ensure_unique};

/// Directed graph of module dependencies.
///
/// Edges point from dependency to dependent: if `sales` depends on `crm`,
/// the edge is `crm -> sales`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Node names in insertion order.
    names: Vec<String>,
    index: HashMap<String, usize>,
    /// Adjacency list: `dependents[i]` are the nodes that depend on node `i`.
    dependents: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its index. Adding an existing name is a no-op.
    pub fn add_node(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), i);
        self.dependents.push(Vec::new());
        i
    }

    /// Declare that `dependent` depends on `dependency`.
    ///
    /// Missing nodes are created. Repeated edges are collapsed.
    pub fn add_edge(&mut self, dependency: &str, dependent: &str) {
        let from = self.add_node(dependency);
        let to = self.add_node(dependent);
        if !self.dependents[from].contains(&to) {
            self.dependents[from].push(to);
        }
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.dependents.iter().map(Vec::len).sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names of the modules that directly depend on `name`.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&i| {
                self.dependents[i]
                    .iter()
                    .map(|&j| self.names[j].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Build the graph for a batch, checking presence and version of every
    /// declared dependency.
    ///
    /// # Errors
    ///
    /// - `Error::DuplicateModule` if two manifests share a name
    /// - `Error::MissingDependency` if a dependency is not in the batch
    /// - `Error::VersionMismatch` if its version does not satisfy the constraint
    pub fn from_manifests(manifests: &[Manifest]) -> Result<Self> {
        ensure_unique(manifests)?;

        let mut graph = Self::new();
        let mut versions: HashMap<&str, &str> = HashMap::with_capacity(manifests.len());
        for manifest in manifests {
            graph.add_node(manifest.name());
            versions.insert(manifest.name(), manifest.version());
        }

        for manifest in manifests {
            for dependency in &manifest.dependencies {
                let actual = versions.get(dependency.name.as_str()).ok_or_else(|| {
                    Error::MissingDependency {
                        dependency: dependency.name.clone(),
                        dependent: manifest.name().to_string(),
                    }
                })?;

                if !dependency.satisfied_by(actual) {
                    return Err(Error::VersionMismatch {
                        dependency: dependency.name.clone(),
                        dependent: manifest.name().to_string(),
                        constraint: dependency.constraint(),
                        actual: actual.to_string(),
                    });
                }

                graph.add_edge(&dependency.name, manifest.name());
            }
        }

        Ok(graph)
    }

    /// Order node indices with Kahn's algorithm.
    fn sorted_indices(&self) -> Result<Vec<usize>> {
        let mut in_degree = vec![0usize; self.names.len()];
        for targets in &self.dependents {
            for &to in targets {
                in_degree[to] += 1;
            }
        }

        let mut ready: VecDeque<usize> = (0..self.names.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.names.len());

        while let Some(current) = ready.pop_front() {
            order.push(current);
            for &next in &self.dependents[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push_back(next);
                }
            }
        }

        if order.len() < self.names.len() {
            let participants = (0..self.names.len())
                .filter(|&i| in_degree[i] > 0)
                .map(|i| self.names[i].clone())
                .collect();
            return Err(Error::DependencyCycle { participants });
        }

        Ok(order)
    }

    /// Return node names in dependency-first order.
    ///
    /// # Errors
    ///
    /// Returns `Error::DependencyCycle` naming the unordered nodes if the
    /// graph contains a cycle.
    pub fn topological_order(&self) -> Result<Vec<&str>> {
        Ok(self
            .sorted_indices()?
            .into_iter()
            .map(|i| self.names[i].as_str())
            .collect())
    }
}

/// Reorder a batch so that every dependency precedes its dependents.
pub fn resolve_order(manifests: Vec<Manifest>) -> Result<Vec<Manifest>> {
    let graph = DependencyGraph::from_manifests(&manifests)?;
    let order = graph.sorted_indices()?;

    // Node indices match batch positions because nodes were added in batch order.
    let mut slots: Vec<Option<Manifest>> = manifests.into_iter().map(Some).collect();
    let ordered: Vec<Manifest> = order
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect();

    tracing::debug!(
        order = ?ordered.iter().map(Manifest::name).collect::<Vec<_>>(),
        "Resolved installation order"
    );
    Ok(ordered)
}
