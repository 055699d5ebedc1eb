//! Seed enumeration over the bundle roots

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use framedeps_core::NodeId;
use framedeps_core::model::FRAMEWORK_EXT;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read bundle root {}: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bundle path {} is not valid UTF-8", .0.display())]
    NonUtf8(PathBuf),
}

/// Every `.framework` entry directly under each root.
///
/// A missing or unreadable root aborts the scan.
pub fn enumerate_bundles<P: AsRef<Path>>(roots: &[P]) -> Result<BTreeSet<NodeId>, ScanError> {
    let mut seeds = BTreeSet::new();

    for root in roots {
        let root = root.as_ref();
        tracing::debug!("Scanning bundle root: {}", root.display());

        let entries = fs::read_dir(root).map_err(|source| ScanError::Root {
            path: root.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| ScanError::Root {
                path: root.to_path_buf(),
                source,
            })?;

            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::warn!("Skipping non UTF-8 entry in {}", root.display());
                continue;
            };
            if !name.ends_with(FRAMEWORK_EXT) {
                continue;
            }

            let id = path.to_str().ok_or_else(|| ScanError::NonUtf8(path.clone()))?;
            seeds.insert(NodeId::from(id));
        }
    }

    Ok(seeds)
}
