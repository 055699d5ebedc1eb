//! Graph Builder and Closure Engine

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::graph::Graph;
use crate::inspector::DependencyInspector;
use crate::model::NodeId;

/// Summary of a closure run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClosureReport {
    /// Frontier waves that discovered at least one node.
    pub passes: usize,
    /// Nodes added beyond the seeds.
    pub discovered: usize,
}

/// Inspect every seed once and record the results. Does not recurse.
pub fn build<I>(seed: &BTreeSet<NodeId>, inspector: &I) -> Graph
where
    I: DependencyInspector + ?Sized,
{
    let answers: Vec<(NodeId, BTreeSet<NodeId>)> = seed
        .par_iter()
        .map(|node| (node.clone(), inspector.inspect(node)))
        .collect();

    let graph: Graph = answers.into_iter().collect();
    tracing::info!("Built graph from {} seeds ({} edges)", graph.node_count(), graph.edge_count());
    graph
}

/// Inspect every dependency target that has no entry yet.
///
/// Returns the number of new entries; zero means the graph is closed.
pub fn discover_pass<I>(graph: &mut Graph, inspector: &I) -> usize
where
    I: DependencyInspector + ?Sized,
{
    let frontier: Vec<NodeId> = graph.unclosed().into_iter().cloned().collect();
    if frontier.is_empty() {
        return 0;
    }

    // Frontier is sorted and answers are collected in frontier order, so the
    // result does not depend on how rayon schedules the queries.
    let answers: Vec<(NodeId, BTreeSet<NodeId>)> = frontier
        .into_par_iter()
        .map(|node| {
            let deps = inspector.inspect(&node);
            (node, deps)
        })
        .collect();

    let added = answers.len();
    for (node, deps) in answers {
        graph.insert(node, deps);
    }
    added
}

/// Run discovery waves until every reachable node has an entry.
///
/// Each node is inspected exactly once: a wave only queries targets that are
/// not keys, and every queried target becomes a key before the next wave.
pub fn close<I>(graph: &mut Graph, inspector: &I) -> ClosureReport
where
    I: DependencyInspector + ?Sized,
{
    let mut report = ClosureReport::default();
    loop {
        let added = discover_pass(graph, inspector);
        if added == 0 {
            break;
        }
        report.passes += 1;
        report.discovered += added;
        tracing::debug!("Closure pass {}: {} new nodes", report.passes, added);
    }

    tracing::info!(
        "Closure complete after {} passes: {} nodes discovered, {} total",
        report.passes,
        report.discovered,
        graph.node_count()
    );
    report
}
