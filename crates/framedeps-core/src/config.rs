//! Run configuration, optionally loaded from a TOML file
//!
//! ```toml
//! [scan]
//! roots = ["/System/Library/Frameworks"]
//! otool = "/usr/bin/otool"
//!
//! [render]
//! title = "macOS 15.1"
//! author = "@me"
//!
//! [cache]
//! enabled = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::{CACHE_DIR, GRAPH_CACHE};
use crate::error::ConfigError;
use crate::model::PRIVATE_ROOT;
use crate::render::RenderOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub render: RenderOptions,
    pub cache: CacheConfig,
}

/// Where seeds come from and how bundles are inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directories scanned for `.framework` entries.
    pub roots: Vec<PathBuf>,
    /// Binary-inspection tool invoked as `<otool> -L <binary>`.
    pub otool: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            roots: vec![
                PathBuf::from("/System/Library/Frameworks"),
                PathBuf::from(PRIVATE_ROOT),
            ],
            otool: PathBuf::from("/usr/bin/otool"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            path: Path::new(CACHE_DIR).join(GRAPH_CACHE),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text, path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
