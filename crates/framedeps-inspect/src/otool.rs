//! Dependency inspection through `otool -L`

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use framedeps_core::{BundleKind, DependencyInspector, NodeId, bundle_path_for_bin};
use regex::Regex;

/// `\t<install name> (compatibility version 1.0.0, current version 2.0.0)`
static LOAD_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\t(.+?) \((?:compatibility|current) version").expect("load command pattern")
});

/// Locate the Mach-O binary of a bundle.
///
/// A dylib is its own binary. A framework's binary is named after the
/// framework and sits at its root or under `Versions/A` or `Versions/B`.
pub fn resolve_binary(bundle: &NodeId) -> Option<PathBuf> {
    let root = Path::new(bundle.as_str());

    if bundle.kind() == BundleKind::Dylib {
        return root.is_file().then(|| root.to_path_buf());
    }

    let name = bundle.short_name();
    [
        root.join(name),
        root.join("Versions").join("A").join(name),
        root.join("Versions").join("B").join(name),
    ]
    .into_iter()
    .find(|candidate| candidate.is_file())
}

/// Dependencies listed in `otool -L` output, normalized to bundle paths.
///
/// Only tab-indented lines are load commands; the header naming the
/// inspected file is skipped.
pub fn parse_otool_output(output: &str) -> BTreeSet<NodeId> {
    output
        .lines()
        .filter(|line| line.starts_with('\t'))
        .filter_map(|line| match LOAD_COMMAND.captures(line) {
            Some(caps) => caps.get(1).map(|m| m.as_str()),
            None => line.split_whitespace().next(),
        })
        .map(bundle_path_for_bin)
        .collect()
}

/// Runs the native inspection tool once per query.
#[derive(Debug, Clone)]
pub struct OtoolInspector {
    tool: PathBuf,
}

impl OtoolInspector {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        OtoolInspector { tool: tool.into() }
    }

    pub fn tool(&self) -> &Path {
        &self.tool
    }
}

impl Default for OtoolInspector {
    fn default() -> Self {
        Self::new("/usr/bin/otool")
    }
}

impl DependencyInspector for OtoolInspector {
    fn inspect(&self, node: &NodeId) -> BTreeSet<NodeId> {
        let Some(bin) = resolve_binary(node) else {
            tracing::debug!("No binary found for {}", node);
            return BTreeSet::new();
        };

        let output = match Command::new(&self.tool).arg("-L").arg(&bin).output() {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Cannot run {}: {}", self.tool.display(), e);
                return BTreeSet::new();
            }
        };

        if !output.status.success() {
            tracing::warn!(
                "{} -L {} failed: {}",
                self.tool.display(),
                bin.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return BTreeSet::new();
        }

        let mut deps = parse_otool_output(&String::from_utf8_lossy(&output.stdout));
        deps.remove(node);
        deps
    }
}
