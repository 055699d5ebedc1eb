//! Dependency Inspector seam and its memoizing wrapper

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::model::NodeId;

/// Reports the immediate dependencies of a node.
///
/// Implementations normalize binary paths to bundle identifiers and return
/// an empty set when the node's binary cannot be found. Failing to find a
/// binary is an expected outcome, not an error.
pub trait DependencyInspector: Send + Sync {
    fn inspect(&self, node: &NodeId) -> BTreeSet<NodeId>;
}

impl<T: DependencyInspector + ?Sized> DependencyInspector for &T {
    fn inspect(&self, node: &NodeId) -> BTreeSet<NodeId> {
        (**self).inspect(node)
    }
}

impl<T: DependencyInspector + ?Sized> DependencyInspector for Box<T> {
    fn inspect(&self, node: &NodeId) -> BTreeSet<NodeId> {
        (**self).inspect(node)
    }
}

/// Caches every answer so the wrapped inspector runs at most once per node.
/// Safe to share across the closure engine's worker threads.
pub struct MemoizingInspector<I> {
    inner: I,
    answers: DashMap<NodeId, Arc<OnceLock<BTreeSet<NodeId>>>>,
    calls: AtomicUsize,
}

impl<I: DependencyInspector> MemoizingInspector<I> {
    pub fn new(inner: I) -> Self {
        MemoizingInspector {
            inner,
            answers: DashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times the wrapped inspector was actually invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: DependencyInspector> DependencyInspector for MemoizingInspector<I> {
    fn inspect(&self, node: &NodeId) -> BTreeSet<NodeId> {
        // The shard lock is held only long enough to fetch the cell. Queries
        // for different nodes run concurrently; a second query for the same
        // node waits on the cell instead of invoking the inspector again.
        let cell = match self.answers.get(node) {
            Some(cell) => Arc::clone(cell.value()),
            None => Arc::clone(self.answers.entry(node.clone()).or_default().value()),
        };

        cell.get_or_init(|| {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let mut deps = self.inner.inspect(node);
            deps.remove(node);
            tracing::debug!("Inspected {} ({} deps)", node, deps.len());
            deps
        })
        .clone()
    }
}

/// Inspector answering from a fixed table. Unknown nodes have no dependencies.
#[derive(Debug, Clone, Default)]
pub struct StaticInspector {
    table: HashMap<NodeId, BTreeSet<NodeId>>,
}

impl StaticInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: `node` depends on each of `deps`.
    pub fn with(mut self, node: &str, deps: &[&str]) -> Self {
        self.table
            .insert(NodeId::from(node), deps.iter().map(|d| NodeId::from(*d)).collect());
        self
    }
}

impl DependencyInspector for StaticInspector {
    fn inspect(&self, node: &NodeId) -> BTreeSet<NodeId> {
        self.table.get(node).cloned().unwrap_or_default()
    }
}
