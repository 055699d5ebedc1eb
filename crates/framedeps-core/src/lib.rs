//! framedeps core — bundle dependency graph: closure, reduction, clustered rendering

pub mod model;
pub mod graph;
pub mod inspector;
pub mod closure;
pub mod reduce;
pub mod render;
pub mod cache;
pub mod config;
pub mod pipeline;
pub mod error;


#[cfg(test)]
pub mod test_utils;

pub use model::{NodeId, BundleKind, PRIVATE_ROOT, bundle_path_for_bin, short_name};
pub use graph::Graph;
pub use inspector::{DependencyInspector, MemoizingInspector, StaticInspector};
pub use closure::{ClosureReport, build, close, discover_pass};
pub use reduce::{ReduceReport, reduce, reduce_round};
pub use render::{Layout, RenderOptions, render_dot};
pub use cache::{CACHE_DIR, GRAPH_CACHE, FileCache, GraphCache, NoCache, default_cache_path};
pub use config::{CacheConfig, Config, ScanConfig};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use error::{CacheError, ConfigError, GraphError};
