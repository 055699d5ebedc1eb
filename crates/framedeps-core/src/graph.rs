//! Dependency graph as an ordered adjacency map

use std::collections::{BTreeMap, BTreeSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::model::NodeId;

/// Map from each inspected node to its direct dependencies.
///
/// A node may show up only as a dependency target, which means it was never
/// inspected. Closure removes that case for everything reachable from the
/// seeds. Keys and targets are kept sorted so every walk is deterministic.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.node_count())
            .field("edge_count", &self.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the dependency set of `node`, replacing any previous entry.
    /// A self-reference is dropped.
    pub fn insert(&mut self, node: NodeId, mut deps: BTreeSet<NodeId>) {
        deps.remove(&node);
        self.adjacency.insert(node, deps);
    }

    /// Direct dependencies of a node, if it has been inspected.
    pub fn dependencies(&self, node: &str) -> Option<&BTreeSet<NodeId>> {
        self.adjacency.get(node)
    }

    pub(crate) fn dependencies_mut(&mut self, node: &str) -> Option<&mut BTreeSet<NodeId>> {
        self.adjacency.get_mut(node)
    }

    /// True if `node` has its own entry.
    pub fn contains_node(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Inspected nodes in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &NodeId> {
        self.adjacency.keys()
    }

    /// Every node mentioned anywhere: keys plus all dependency targets.
    pub fn all_nodes(&self) -> BTreeSet<&NodeId> {
        self.adjacency
            .iter()
            .flat_map(|(k, deps)| std::iter::once(k).chain(deps))
            .collect()
    }

    /// Dependency targets that have no entry of their own.
    pub fn unclosed(&self) -> BTreeSet<&NodeId> {
        self.adjacency
            .values()
            .flatten()
            .filter(|dep| !self.adjacency.contains_key(*dep))
            .collect()
    }

    /// Fails with the first unclosed node, if any.
    pub fn ensure_closed(&self) -> Result<(), GraphError> {
        match self.unclosed().into_iter().next() {
            Some(node) => Err(GraphError::Unclosed(node.clone())),
            None => Ok(()),
        }
    }

    /// Number of inspected nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    /// All `(dependent, dependency)` pairs in order.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.adjacency
            .iter()
            .flat_map(|(k, deps)| deps.iter().map(move |d| (k, d)))
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Dependency cycles: strongly connected components with more than one node.
    ///
    /// Two-hop reduction is only reachability-preserving on acyclic input,
    /// so callers log these before reducing.
    pub fn cycles(&self) -> Vec<Vec<NodeId>> {
        let mut g: DiGraphMap<&str, ()> = DiGraphMap::new();
        for (k, d) in self.edges() {
            g.add_edge(k.as_str(), d.as_str(), ());
        }

        let mut cycles: Vec<Vec<NodeId>> = tarjan_scc(&g)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut members: Vec<NodeId> = scc.into_iter().map(NodeId::from).collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }
}

impl FromIterator<(NodeId, BTreeSet<NodeId>)> for Graph {
    fn from_iter<T: IntoIterator<Item = (NodeId, BTreeSet<NodeId>)>>(iter: T) -> Self {
        let mut graph = Graph::new();
        for (node, deps) in iter {
            graph.insert(node, deps);
        }
        graph
    }
}
