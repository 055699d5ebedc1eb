//! Persisted graph cache
//!
//! The pipeline receives a [`GraphCache`] from its caller. A hit skips seed
//! enumeration, inspection, closure and reduction entirely.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::graph::Graph;

/// Default cache directory: .framedeps/
pub const CACHE_DIR: &str = ".framedeps";

/// Default graph cache file inside [`CACHE_DIR`].
pub const GRAPH_CACHE: &str = "graph.json";

/// Default cache file path under `root`.
pub fn default_cache_path(root: &Path) -> PathBuf {
    root.join(CACHE_DIR).join(GRAPH_CACHE)
}

/// Load-if-present / store-on-success storage for a reduced graph.
pub trait GraphCache {
    fn load(&self) -> Result<Option<Graph>, CacheError>;
    fn store(&self, graph: &Graph) -> Result<(), CacheError>;
}

/// Cache that never hits and never writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl GraphCache for NoCache {
    fn load(&self) -> Result<Option<Graph>, CacheError> {
        Ok(None)
    }

    fn store(&self, _graph: &Graph) -> Result<(), CacheError> {
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct CacheDocument {
    version: String,
    cached_at: String,
    graph: Graph,
}

/// JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the cache file. Missing files are fine.
    pub fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl GraphCache for FileCache {
    fn load(&self) -> Result<Option<Graph>, CacheError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json_str = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let doc: CacheDocument =
            serde_json::from_str(&json_str).map_err(|source| CacheError::Format {
                path: self.path.clone(),
                source,
            })?;

        if doc.version != env!("CARGO_PKG_VERSION") {
            tracing::warn!(
                "Ignoring cache {} written by version {}",
                self.path.display(),
                doc.version
            );
            return Ok(None);
        }

        tracing::debug!(
            "Graph cache loaded from {} (cached at {})",
            self.path.display(),
            doc.cached_at
        );
        Ok(Some(doc.graph))
    }

    fn store(&self, graph: &Graph) -> Result<(), CacheError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let doc = CacheDocument {
            version: env!("CARGO_PKG_VERSION").to_string(),
            cached_at: chrono::Utc::now().to_rfc3339(),
            graph: graph.clone(),
        };
        let json_str = serde_json::to_string_pretty(&doc).map_err(|source| CacheError::Format {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json_str).map_err(|e| self.io_error(e))?;

        tracing::debug!("Graph cache saved: {}", self.path.display());
        Ok(())
    }
}
