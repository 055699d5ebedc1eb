//! Unit tests for framedeps-inspect

use crate::*;
use framedeps_core::{DependencyInspector, NodeId};
use std::fs;
use tempfile::TempDir;

const ACCELERATE_OTOOL: &str = "\
/System/Library/Frameworks/Accelerate.framework/Versions/A/Accelerate:
\t/System/Library/Frameworks/Accelerate.framework/Versions/A/Accelerate (compatibility version 1.0.0, current version 4.0.0)
\t/System/Library/Frameworks/Accelerate.framework/Versions/A/Frameworks/vImage.framework/Versions/A/vImage (compatibility version 1.0.0, current version 1.0.0, reexport)
\t/System/Library/Frameworks/Accelerate.framework/Versions/A/Frameworks/vecLib.framework/Versions/A/vecLib (compatibility version 1.0.0, current version 1.0.0, reexport)
\t/usr/lib/libSystem.B.dylib (compatibility version 1.0.0, current version 1213.0.0)
";

#[test]
fn test_parse_otool_output() {
    let deps = parse_otool_output(ACCELERATE_OTOOL);
    let deps: Vec<&str> = deps.iter().map(NodeId::as_str).collect();

    assert_eq!(
        deps,
        vec![
            "/System/Library/Frameworks/Accelerate.framework",
            "/System/Library/Frameworks/Accelerate.framework/Versions/A/Frameworks/vImage.framework",
            "/System/Library/Frameworks/Accelerate.framework/Versions/A/Frameworks/vecLib.framework",
            "/usr/lib/libSystem.B.dylib",
        ]
    );
}

#[test]
fn test_parse_keeps_spaces_in_install_names() {
    let out = "/x:\n\t/Library/Frameworks/My Kit.framework/Versions/A/My Kit (compatibility version 1.0.0, current version 1.0.0)\n";
    let deps = parse_otool_output(out);
    assert!(deps.contains("/Library/Frameworks/My Kit.framework"));
}

#[test]
fn test_parse_falls_back_to_first_token() {
    let deps = parse_otool_output("\t@rpath/libfoo.dylib\n");
    assert!(deps.contains("@rpath/libfoo.dylib"));
    assert!(parse_otool_output("no load commands here\n").is_empty());
}

#[test]
fn test_resolve_binary_probes_versions() {
    let dir = TempDir::new().unwrap();
    let framework = dir.path().join("Foo.framework");
    fs::create_dir_all(framework.join("Versions/B")).unwrap();
    fs::write(framework.join("Versions/B/Foo"), b"").unwrap();

    let node = NodeId::from(framework.to_str().unwrap());
    assert_eq!(resolve_binary(&node), Some(framework.join("Versions/B/Foo")));

    fs::write(framework.join("Foo"), b"").unwrap();
    assert_eq!(resolve_binary(&node), Some(framework.join("Foo")));
}

#[test]
fn test_resolve_binary_dylib_is_itself() {
    let dir = TempDir::new().unwrap();
    let lib = dir.path().join("libbar.dylib");
    assert_eq!(resolve_binary(&NodeId::from(lib.to_str().unwrap())), None);

    fs::write(&lib, b"").unwrap();
    assert_eq!(resolve_binary(&NodeId::from(lib.to_str().unwrap())), Some(lib));
}

#[test]
fn test_missing_binary_yields_no_dependencies() {
    let dir = TempDir::new().unwrap();
    let framework = dir.path().join("Empty.framework");
    fs::create_dir_all(&framework).unwrap();

    // The tool is never spawned, so a bogus path is fine.
    let inspector = OtoolInspector::new(dir.path().join("no-such-otool"));
    assert!(inspector.inspect(&NodeId::from(framework.to_str().unwrap())).is_empty());
}

#[test]
fn test_unrunnable_tool_yields_no_dependencies() {
    let dir = TempDir::new().unwrap();
    let lib = dir.path().join("libbaz.dylib");
    fs::write(&lib, b"").unwrap();

    let inspector = OtoolInspector::new(dir.path().join("no-such-otool"));
    assert!(inspector.inspect(&NodeId::from(lib.to_str().unwrap())).is_empty());
}

#[test]
fn test_enumerate_bundles() {
    let dir = TempDir::new().unwrap();
    let public = dir.path().join("Frameworks");
    let private = dir.path().join("PrivateFrameworks");
    for d in [
        public.join("AppKit.framework"),
        public.join("Foundation.framework"),
        public.join("Headers"),
        private.join("UIFoundation.framework"),
    ] {
        fs::create_dir_all(d).unwrap();
    }
    fs::write(public.join("README"), b"").unwrap();

    let seeds = enumerate_bundles(&[&public, &private]).unwrap();
    let names: Vec<&str> = seeds.iter().map(NodeId::short_name).collect();
    assert_eq!(names, vec!["AppKit", "Foundation", "UIFoundation"]);
}

#[test]
fn test_enumerate_missing_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = enumerate_bundles(&[dir.path().join("nope")]).unwrap_err();
    assert!(matches!(err, ScanError::Root { .. }));
}
