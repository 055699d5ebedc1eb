//! Built-in self-test suite, runnable on a machine without a toolchain

use anyhow::{bail, ensure};
use framedeps_core::{
    DependencyInspector, Graph, MemoizingInspector, NodeId, RenderOptions, StaticInspector,
    bundle_path_for_bin, build, close, reduce, render_dot, short_name,
};
use std::collections::BTreeSet;

type Check = (&'static str, fn() -> anyhow::Result<()>);

const CHECKS: &[Check] = &[
    ("short_name_for_bundle", short_name_for_bundle),
    ("bundle_path_for_bin", bundle_path_for_bin_check),
    ("remove_direct_dep", remove_direct_dep),
    ("closure_inspects_once", closure_inspects_once),
    ("reduction_is_fixed_point", reduction_is_fixed_point),
    ("render_is_deterministic", render_is_deterministic),
    ("render_hides_private", render_hides_private),
];

/// Run every check, report like the test harness does, fail if any failed.
pub fn run() -> anyhow::Result<()> {
    println!("running {} tests", CHECKS.len());

    let mut failed = Vec::new();
    for (name, check) in CHECKS {
        match check() {
            Ok(()) => println!("test {name} ... ok"),
            Err(e) => {
                println!("test {name} ... FAILED");
                tracing::error!("{name}: {e:#}");
                failed.push(*name);
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} of {} self-tests failed: {}", failed.len(), CHECKS.len(), failed.join(", "));
    }
    println!("\ntest result: ok. {} passed; 0 failed", CHECKS.len());
    Ok(())
}

const FRAMEWORKS: &str = "/System/Library/Frameworks";

fn sample() -> (StaticInspector, BTreeSet<NodeId>) {
    let inspector = StaticInspector::new()
        .with("/F/Cocoa.framework", &["/F/AppKit.framework", "/usr/lib/libSystem.B.dylib"])
        .with("/F/AppKit.framework", &["/usr/lib/libSystem.B.dylib", "/P/UIKitCore.framework"])
        .with("/P/UIKitCore.framework", &["/usr/lib/libSystem.B.dylib"])
        .with("/usr/lib/libSystem.B.dylib", &["/usr/lib/libSystem.B.dylib"]);
    let seeds = ["/F/Cocoa.framework", "/P/UIKitCore.framework"]
        .into_iter()
        .map(NodeId::from)
        .collect();
    (inspector, seeds)
}

fn sample_options() -> RenderOptions {
    RenderOptions {
        private_root: "/P".to_string(),
        date: Some("2015-02-25".to_string()),
        ..RenderOptions::default()
    }
}

fn reduced_sample() -> Graph {
    let (inspector, seeds) = sample();
    let mut graph = build(&seeds, &inspector);
    close(&mut graph, &inspector);
    reduce(&mut graph);
    graph
}

fn short_name_for_bundle() -> anyhow::Result<()> {
    ensure!(short_name(&format!("{FRAMEWORKS}/Accelerate.framework")) == "Accelerate");
    ensure!(
        short_name(&format!(
            "{FRAMEWORKS}/Accelerate.framework/Versions/A/Frameworks/vImage.framework"
        )) == "vImage"
    );
    ensure!(short_name("/usr/lib/libSystem.B.dylib") == "libSystem.B");
    Ok(())
}

fn bundle_path_for_bin_check() -> anyhow::Result<()> {
    let cocoa = bundle_path_for_bin(&format!("{FRAMEWORKS}/Cocoa.framework/Versions/A/Cocoa"));
    ensure!(cocoa.as_str() == format!("{FRAMEWORKS}/Cocoa.framework"), "got {cocoa}");

    let dylib = format!(
        "{FRAMEWORKS}/Accelerate.framework/Versions/A/Frameworks/vecLib.framework/Versions/A/libvDSP.dylib"
    );
    ensure!(bundle_path_for_bin(&dylib).as_str() == dylib);
    Ok(())
}

fn remove_direct_dep() -> anyhow::Result<()> {
    let ids = |nodes: &[&str]| nodes.iter().map(|n| NodeId::from(*n)).collect::<BTreeSet<_>>();

    let mut graph: Graph = [
        (NodeId::from("a"), ids(&["b", "c"])),
        (NodeId::from("b"), ids(&["c"])),
    ]
    .into_iter()
    .collect();
    reduce(&mut graph);

    let expected: Graph = [
        (NodeId::from("a"), ids(&["b"])),
        (NodeId::from("b"), ids(&["c"])),
    ]
    .into_iter()
    .collect();
    ensure!(graph == expected, "a -> c was not removed");
    Ok(())
}

fn closure_inspects_once() -> anyhow::Result<()> {
    let (inspector, seeds) = sample();
    let memo = MemoizingInspector::new(inspector);

    let mut graph = build(&seeds, &memo);
    close(&mut graph, &memo);
    // Later consumers hit the memo, not the inspector.
    memo.inspect(&NodeId::from("/F/AppKit.framework"));

    ensure!(graph.ensure_closed().is_ok(), "graph not closed");
    ensure!(memo.calls() == graph.node_count(), "{} calls for {} nodes", memo.calls(), graph.node_count());
    Ok(())
}

fn reduction_is_fixed_point() -> anyhow::Result<()> {
    let mut graph = reduced_sample();
    let before = graph.clone();

    ensure!(reduce(&mut graph).removed == 0, "second reduction removed edges");
    ensure!(graph == before);
    for node in graph.keys() {
        let deps = graph.dependencies(node.as_str()).map(BTreeSet::len).unwrap_or(0);
        ensure!(deps <= 1, "{node} kept {deps} dependencies");
    }
    Ok(())
}

fn render_is_deterministic() -> anyhow::Result<()> {
    let graph = reduced_sample();
    let first = render_dot(&graph, &sample_options())?;
    let second = render_dot(&graph, &sample_options())?;
    ensure!(first == second, "renders differ");
    ensure!(first.starts_with("digraph G {"));
    Ok(())
}

fn render_hides_private() -> anyhow::Result<()> {
    let dot = render_dot(&reduced_sample(), &sample_options())?;
    ensure!(!dot.contains("/P/"), "private node rendered");
    ensure!(dot.contains("\"/F/Cocoa.framework\" -> \"/F/AppKit.framework\";"));
    Ok(())
}
