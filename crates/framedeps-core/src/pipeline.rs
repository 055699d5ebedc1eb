//! Seed set → build → close → reduce, with an optional cache in front

use std::collections::BTreeSet;

use anyhow::Context;

use crate::cache::GraphCache;
use crate::closure::{self, ClosureReport};
use crate::graph::Graph;
use crate::inspector::{DependencyInspector, MemoizingInspector};
use crate::model::NodeId;
use crate::reduce::{self, ReduceReport};

/// Result of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Closed and reduced graph.
    pub graph: Graph,
    pub from_cache: bool,
    /// Zeroed when the graph came from the cache.
    pub closure: ClosureReport,
    pub reduce: ReduceReport,
    /// Underlying inspector invocations.
    pub inspections: usize,
}

pub struct Pipeline<'a, I> {
    inspector: MemoizingInspector<I>,
    cache: &'a dyn GraphCache,
}

impl<'a, I: DependencyInspector> Pipeline<'a, I> {
    pub fn new(inspector: I, cache: &'a dyn GraphCache) -> Self {
        Pipeline {
            inspector: MemoizingInspector::new(inspector),
            cache,
        }
    }

    /// Produce the reduced graph.
    ///
    /// `seeds` is only called on a cache miss; its failure aborts the run.
    pub fn run<F, E>(&self, seeds: F) -> anyhow::Result<PipelineOutcome>
    where
        F: FnOnce() -> Result<BTreeSet<NodeId>, E>,
        E: Into<anyhow::Error>,
    {
        if let Some(graph) = self.cache.load().context("loading graph cache")? {
            tracing::info!(
                "Using cached graph: {} nodes, {} edges",
                graph.node_count(),
                graph.edge_count()
            );
            return Ok(PipelineOutcome {
                graph,
                from_cache: true,
                closure: ClosureReport::default(),
                reduce: ReduceReport::default(),
                inspections: 0,
            });
        }

        let seed = seeds().map_err(Into::<anyhow::Error>::into).context("enumerating seed bundles")?;
        tracing::info!("Found {} seed bundles", seed.len());

        let mut graph = closure::build(&seed, &self.inspector);
        let closure = closure::close(&mut graph, &self.inspector);

        for cycle in graph.cycles() {
            let names: Vec<&str> = cycle.iter().map(NodeId::short_name).collect();
            tracing::warn!("Dependency cycle: {}", names.join(" <-> "));
        }

        let reduce = reduce::reduce(&mut graph);

        self.cache.store(&graph).context("storing graph cache")?;

        Ok(PipelineOutcome {
            graph,
            from_cache: false,
            closure,
            reduce,
            inspections: self.inspector.calls(),
        })
    }
}
