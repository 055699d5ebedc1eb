//! Integration tests for framedeps
//!
//! These drive the built binary end to end.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn framedeps(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_framedeps"))
        .args(args)
        .output()
        .expect("Failed to execute framedeps")
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = framedeps(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("framedeps"));
    assert!(stdout.contains("selftest"));
}

/// The self-test suite passes through its subcommand and through any other argument
#[test]
fn test_selftest_exits_zero() {
    for args in [&["selftest"][..], &["Tests"][..]] {
        let output = framedeps(args);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success(), "{args:?} failed: {stdout}");
        assert!(stdout.contains("test result: ok"));
    }
}

/// Flags the parser does not know still run the suite rather than a usage error
#[test]
fn test_unknown_flags_run_selftest() {
    for args in [
        &["--bogus"][..],
        &["-x"][..],
        &["--bogus", "--no-cache", "--root", "/nonexistent"][..],
    ] {
        let output = framedeps(args);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(output.status.code(), Some(0), "{args:?}: {stdout}");
        assert!(stdout.contains("running 7 tests"));
        assert!(stdout.contains("test result: ok"));
    }
}

/// Rendering a root of binary-less bundles: nothing to inspect, every bundle is a lone node
#[test]
fn test_render_to_stdout() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Frameworks");
    fs::create_dir_all(root.join("Alpha.framework")).unwrap();
    fs::create_dir_all(root.join("Beta.framework")).unwrap();
    let cache = dir.path().join("cache/graph.json");

    let args = [
        "--root",
        root.to_str().unwrap(),
        "--cache",
        cache.to_str().unwrap(),
    ];
    let output = framedeps(&args);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.starts_with("digraph G {"));
    assert!(stdout.contains("[label = \"Alpha\""));
    assert!(stdout.contains("[label = \"Beta\""));
    assert!(stdout.trim_end().ends_with('}'));
    assert!(cache.exists());

    // Second run is served from the cache and renders the same graph body.
    let again = framedeps(&args);
    assert!(again.status.success());
    assert_eq!(String::from_utf8_lossy(&again.stdout), stdout);
}

/// A missing bundle root aborts without output
#[test]
fn test_missing_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let output = framedeps(&["--no-cache", "--root", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

/// Config file values are honored
#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("Frameworks");
    fs::create_dir_all(root.join("Gamma.framework")).unwrap();
    let config = dir.path().join("framedeps.toml");
    fs::write(
        &config,
        format!(
            "[scan]\nroots = [{:?}]\n\n[render]\ntitle = \"Custom Title\"\ndate = \"2015-02-25\"\n\n[cache]\nenabled = false\n",
            root.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = framedeps(&["--config", config.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("<B>Custom Title</B>"));
    assert!(stdout.contains("2015-02-25"));
    assert!(stdout.contains("Gamma"));
}
