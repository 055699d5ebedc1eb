//! Two-hop redundant edge elimination
//!
//! An edge `k -> f` is dropped when `k` also depends on some `d1` that itself
//! depends on `f`. Every round reads from a frozen copy of the graph and only
//! applies its removals once the whole round has been evaluated, so the
//! outcome of a round does not depend on visiting order. Rounds repeat until
//! one removes nothing.

use std::collections::BTreeSet;

use crate::graph::Graph;
use crate::model::NodeId;

/// Summary of a reduction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReduceReport {
    /// Rounds that removed at least one edge.
    pub rounds: usize,
    pub removed: usize,
}

/// Edges a single round would remove, judged against `snapshot` only.
fn redundant_edges(snapshot: &Graph) -> BTreeSet<(NodeId, NodeId)> {
    let mut removals = BTreeSet::new();

    for k in snapshot.keys() {
        let Some(deps) = snapshot.dependencies(k.as_str()) else {
            continue;
        };

        if deps.contains(k) {
            removals.insert((k.clone(), k.clone()));
        }

        for d1 in deps.iter().filter(|d1| *d1 != k) {
            let Some(via) = snapshot.dependencies(d1.as_str()) else {
                continue;
            };
            for f in deps.intersection(via).filter(|f| *f != d1) {
                removals.insert((k.clone(), f.clone()));
            }
        }
    }

    removals
}

/// Apply one round. Returns the number of edges removed.
pub fn reduce_round(graph: &mut Graph) -> usize {
    let removals = redundant_edges(graph);

    let mut removed = 0;
    for (k, f) in removals {
        if let Some(deps) = graph.dependencies_mut(k.as_str()) {
            if deps.remove(&f) {
                removed += 1;
            }
        }
    }
    removed
}

/// Reduce to a fixed point. Only ever removes edges, so it terminates.
pub fn reduce(graph: &mut Graph) -> ReduceReport {
    let mut report = ReduceReport::default();
    let before = graph.edge_count();

    loop {
        let removed = reduce_round(graph);
        if removed == 0 {
            break;
        }
        report.rounds += 1;
        report.removed += removed;
        tracing::debug!("Reduction round {}: {} edges removed", report.rounds, removed);
    }

    tracing::info!(
        "Reduced {} edges to {} in {} rounds",
        before,
        graph.edge_count(),
        report.rounds
    );
    report
}
