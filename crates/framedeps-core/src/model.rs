//! Node identifiers and path classification

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default root under which bundles are considered private.
pub const PRIVATE_ROOT: &str = "/System/Library/PrivateFrameworks";

pub const FRAMEWORK_EXT: &str = ".framework";
pub const DYLIB_EXT: &str = ".dylib";

/// Absolute path naming a bundle directory or a single shared-object file.
///
/// Two nodes are equal iff their path strings are equal. Ordering is
/// lexicographic on the string, which is what every deterministic walk in
/// the crate relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(path: impl Into<String>) -> Self {
        NodeId(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> BundleKind {
        BundleKind::of(&self.0)
    }

    /// Last path component without its extension.
    pub fn short_name(&self) -> &str {
        short_name(&self.0)
    }

    /// True when `other` lives strictly inside this node's path.
    pub fn contains(&self, other: &NodeId) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    pub fn is_private(&self, private_root: &str) -> bool {
        self.0.starts_with(private_root)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

/// What sort of bundle a node names, decided by its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BundleKind {
    /// Versioned `.framework` directory.
    Framework,
    /// Single `.dylib` file.
    Dylib,
    Other,
}

impl BundleKind {
    pub fn of(path: &str) -> Self {
        if path.ends_with(FRAMEWORK_EXT) {
            BundleKind::Framework
        } else if path.ends_with(DYLIB_EXT) {
            BundleKind::Dylib
        } else {
            BundleKind::Other
        }
    }

    /// Fill color used for this kind in the rendered graph and legend.
    pub fn color(self) -> &'static str {
        match self {
            BundleKind::Dylib => "lightblue",
            BundleKind::Framework | BundleKind::Other => "gold",
        }
    }
}

/// Map a binary path to the bundle that owns it.
///
/// Paths already naming a bundle come back unchanged. Otherwise everything
/// after the last `.framework` is cut, falling back to the last `.dylib`.
pub fn bundle_path_for_bin(bin_path: &str) -> NodeId {
    if matches!(BundleKind::of(bin_path), BundleKind::Framework | BundleKind::Dylib) {
        return NodeId::from(bin_path);
    }

    for ext in [FRAMEWORK_EXT, DYLIB_EXT] {
        if let Some(i) = bin_path.rfind(ext) {
            return NodeId::new(&bin_path[..i + ext.len()]);
        }
    }
    NodeId::from(bin_path)
}

/// Last path component with its final extension removed.
pub fn short_name(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(i) => &base[..i],
    }
}
