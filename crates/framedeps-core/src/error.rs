//! Error types for the core crate

use std::path::PathBuf;

use thiserror::Error;

use crate::model::NodeId;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A dependency target was never inspected; closure was skipped.
    #[error("graph is not closed: '{0}' is referenced as a dependency but has no entry")]
    Unclosed(NodeId),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache file {} is malformed: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
