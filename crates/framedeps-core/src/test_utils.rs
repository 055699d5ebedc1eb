//! Test fixtures for framedeps-core

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use crate::graph::Graph;
use crate::inspector::{DependencyInspector, StaticInspector};
use crate::model::NodeId;

pub const COCOA: &str = "/System/Library/Frameworks/Cocoa.framework";
pub const APPKIT: &str = "/System/Library/Frameworks/AppKit.framework";
pub const FOUNDATION: &str = "/System/Library/Frameworks/Foundation.framework";
pub const CORE_FOUNDATION: &str = "/System/Library/Frameworks/CoreFoundation.framework";
pub const ACCELERATE: &str = "/System/Library/Frameworks/Accelerate.framework";
pub const VECLIB: &str =
    "/System/Library/Frameworks/Accelerate.framework/Versions/A/Frameworks/vecLib.framework";
pub const VIMAGE: &str =
    "/System/Library/Frameworks/Accelerate.framework/Versions/A/Frameworks/vImage.framework";
pub const LIBVDSP: &str = "/System/Library/Frameworks/Accelerate.framework/Versions/A/Frameworks/vecLib.framework/Versions/A/libvDSP.dylib";
pub const UIFOUNDATION: &str = "/System/Library/PrivateFrameworks/UIFoundation.framework";
pub const LIBSYSTEM: &str = "/usr/lib/libSystem.B.dylib";
pub const LIBKERNEL: &str = "/usr/lib/system/libsystem_kernel.dylib";

/// A small slice of a real system: nested frameworks, a private framework,
/// dylibs, and plenty of edges implied by two-hop paths.
pub fn sample_inspector() -> StaticInspector {
    StaticInspector::new()
        .with(COCOA, &[APPKIT, FOUNDATION, LIBSYSTEM])
        .with(APPKIT, &[FOUNDATION, CORE_FOUNDATION, LIBSYSTEM, UIFOUNDATION])
        .with(FOUNDATION, &[CORE_FOUNDATION, LIBSYSTEM])
        .with(CORE_FOUNDATION, &[LIBSYSTEM])
        .with(LIBSYSTEM, &[LIBKERNEL])
        .with(ACCELERATE, &[VECLIB, VIMAGE, LIBSYSTEM])
        .with(VECLIB, &[LIBVDSP, LIBSYSTEM, VECLIB])
        .with(VIMAGE, &[LIBSYSTEM])
        .with(LIBVDSP, &[LIBSYSTEM])
        .with(UIFOUNDATION, &[CORE_FOUNDATION])
}

/// What seed enumeration would find under the two framework roots.
pub fn sample_seeds() -> BTreeSet<NodeId> {
    [COCOA, APPKIT, FOUNDATION, CORE_FOUNDATION, ACCELERATE, UIFOUNDATION]
        .into_iter()
        .map(NodeId::from)
        .collect()
}

/// The sample after closure and reduction.
pub fn sample_reduced() -> Graph {
    graph_of(&[
        (COCOA, &[APPKIT]),
        (APPKIT, &[FOUNDATION, UIFOUNDATION]),
        (FOUNDATION, &[CORE_FOUNDATION]),
        (CORE_FOUNDATION, &[LIBSYSTEM]),
        (LIBSYSTEM, &[LIBKERNEL]),
        (LIBKERNEL, &[]),
        (ACCELERATE, &[VECLIB, VIMAGE]),
        (VECLIB, &[LIBVDSP]),
        (VIMAGE, &[LIBSYSTEM]),
        (LIBVDSP, &[LIBSYSTEM]),
        (UIFOUNDATION, &[CORE_FOUNDATION]),
    ])
}

/// Build a graph from `(node, deps)` rows.
pub fn graph_of(rows: &[(&str, &[&str])]) -> Graph {
    rows.iter()
        .map(|(node, deps)| {
            (
                NodeId::from(*node),
                deps.iter().map(|d| NodeId::from(*d)).collect(),
            )
        })
        .collect()
}

pub fn deps_of(graph: &Graph, node: &str) -> Vec<String> {
    graph
        .dependencies(node)
        .map(|deps| deps.iter().map(|d| d.to_string()).collect())
        .unwrap_or_default()
}

/// Records how often each node is asked about.
pub struct CountingInspector<I> {
    inner: I,
    counts: Mutex<HashMap<NodeId, usize>>,
}

impl<I: DependencyInspector> CountingInspector<I> {
    pub fn new(inner: I) -> Self {
        CountingInspector {
            inner,
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_queries_per_node(&self) -> usize {
        self.counts.lock().unwrap().values().copied().max().unwrap_or(0)
    }

    pub fn total_queries(&self) -> usize {
        self.counts.lock().unwrap().values().sum()
    }
}

impl<I: DependencyInspector> DependencyInspector for CountingInspector<I> {
    fn inspect(&self, node: &NodeId) -> BTreeSet<NodeId> {
        *self.counts.lock().unwrap().entry(node.clone()).or_insert(0) += 1;
        self.inner.inspect(node)
    }
}
