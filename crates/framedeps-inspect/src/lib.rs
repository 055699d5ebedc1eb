//! Bundle discovery and `otool -L` dependency inspection

pub mod otool;
pub mod seeds;

#[cfg(test)]
pub mod tests;

pub use otool::{OtoolInspector, parse_otool_output, resolve_binary};
pub use seeds::{ScanError, enumerate_bundles};
