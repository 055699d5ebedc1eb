//! Cluster Renderer: Graphviz text with nested bundle clusters
//!
//! Private nodes and every edge touching them are filtered out here, at
//! render time; the graph itself is never modified. A node whose path is a
//! strict prefix of another public node's path is a container and gets a
//! cluster. Containers inside containers become sub-clusters, so each node
//! is declared exactly once.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::Graph;
use crate::model::{BundleKind, NodeId, PRIVATE_ROOT};

const SELF_FILL: &str = "white";

/// Rendering knobs. Rendering is a pure function of the graph and these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Nodes under this path are left out of the output.
    pub private_root: String,
    /// Legend heading.
    pub title: String,
    pub subtitle: String,
    /// Appended to the date on the legend's third row.
    pub author: String,
    /// Legend date. Left empty when unset so output stays reproducible.
    pub date: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            private_root: PRIVATE_ROOT.to_string(),
            title: "macOS".to_string(),
            subtitle: "Frameworks dependencies".to_string(),
            author: String::new(),
            date: None,
        }
    }
}

impl RenderOptions {
    fn stamp(&self) -> String {
        [self.date.as_deref().unwrap_or(""), self.author.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Public nodes classified by path containment.
#[derive(Debug)]
pub struct Layout<'g> {
    /// Every node that survives the private filter.
    pub public: BTreeSet<&'g NodeId>,
    /// Public nodes that prefix at least one other public node.
    pub containers: BTreeSet<&'g NodeId>,
    /// Nearest enclosing container of each nested node.
    pub parent: BTreeMap<&'g NodeId, &'g NodeId>,
}

impl<'g> Layout<'g> {
    pub fn new(graph: &'g Graph, private_root: &str) -> Self {
        let public: BTreeSet<&NodeId> = graph
            .all_nodes()
            .into_iter()
            .filter(|n| !n.is_private(private_root))
            .collect();

        let containers: BTreeSet<&NodeId> = public
            .iter()
            .copied()
            .filter(|c| public.iter().any(|n| c.contains(n)))
            .collect();

        // Enclosing containers of a node are all prefixes of it, so the
        // longest one is the nearest.
        let parent = public
            .iter()
            .filter_map(|n| {
                containers
                    .iter()
                    .filter(|c| c.contains(n))
                    .max_by_key(|c| c.as_str().len())
                    .map(|c| (*n, *c))
            })
            .collect();

        Layout {
            public,
            containers,
            parent,
        }
    }

    pub fn is_container(&self, node: &NodeId) -> bool {
        self.containers.contains(node)
    }

    fn children_of(&self, container: &NodeId) -> impl Iterator<Item = &'g NodeId> + '_ {
        let container = container.clone();
        self.parent
            .iter()
            .filter(move |(_, p)| ***p == container)
            .map(|(n, _)| *n)
    }
}

/// Render a reduced graph as a Graphviz digraph.
///
/// The graph must be closed; an unclosed graph means the closure step was
/// skipped and is reported as [`GraphError::Unclosed`].
pub fn render_dot(graph: &Graph, options: &RenderOptions) -> Result<String, GraphError> {
    graph.ensure_closed()?;

    let layout = Layout::new(graph, &options.private_root);
    let mut out = DotWriter::default();

    out.line(0, "digraph G {");
    out.line(1, "node [shape=box];");
    out.line(1, "splines=ortho;");
    out.line(1, "ranksep=4;");
    out.line(1, "compound=true;");
    out.blank();

    write_legend(&mut out, options);
    out.blank();

    for container in layout.containers.iter().filter(|c| !layout.parent.contains_key(*c)) {
        write_cluster(&mut out, &layout, container, 1);
    }
    out.blank();

    for node in layout
        .public
        .iter()
        .filter(|n| !layout.is_container(n) && !layout.parent.contains_key(*n))
    {
        out.line(1, &node_statement(node, node.kind().color()));
    }
    out.blank();

    for (u, v) in graph.edges() {
        if !layout.public.contains(u) || !layout.public.contains(v) {
            continue;
        }
        // Containment is drawn by the clusters themselves.
        if v.as_str().starts_with(u.as_str()) {
            continue;
        }

        let mut anchors = Vec::new();
        if layout.is_container(u) {
            anchors.push(format!("ltail={}", quote(&cluster_name(u))));
        }
        if layout.is_container(v) {
            anchors.push(format!("lhead={}", quote(&cluster_name(v))));
        }

        let edge = format!("{} -> {}", quote(u.as_str()), quote(v.as_str()));
        if anchors.is_empty() {
            out.line(1, &format!("{edge};"));
        } else {
            out.line(1, &format!("{edge} [{}];", anchors.join(",")));
        }
    }

    out.line(0, "}");
    Ok(out.finish())
}

fn write_legend(out: &mut DotWriter, options: &RenderOptions) {
    out.line(1, "{");
    out.line(2, "Legend [shape=none, margin=0, label=<");
    out.line(2, r#"<TABLE BORDER="0" CELLBORDER="1" CELLSPACING="0" CELLPADDING="4">"#);
    out.line(3, &format!(r#"<TR><TD COLSPAN="2"><B>{}</B></TD></TR>"#, html(&options.title)));
    out.line(3, &format!(r#"<TR><TD COLSPAN="2">{}</TD></TR>"#, html(&options.subtitle)));
    let stamp = options.stamp();
    if !stamp.is_empty() {
        out.line(3, &format!(r#"<TR><TD COLSPAN="2">{}</TD></TR>"#, html(&stamp)));
    }
    for (label, kind) in [(".framework", BundleKind::Framework), (".dylib", BundleKind::Dylib)] {
        out.line(
            3,
            &format!(r#"<TR><TD>{label}</TD><TD BGCOLOR="{}"></TD></TR>"#, kind.color()),
        );
    }
    out.line(2, "</TABLE>");
    out.line(2, ">];");
    out.line(1, "}");
}

fn write_cluster(out: &mut DotWriter, layout: &Layout<'_>, container: &NodeId, depth: usize) {
    out.line(depth, &format!("subgraph {} {{", quote(&cluster_name(container))));
    out.line(depth + 1, "style = filled;");
    out.line(depth + 1, &format!("color = {};", container.kind().color()));
    out.line(depth + 1, &node_statement(container, SELF_FILL));

    let (nested, leaves): (Vec<&NodeId>, Vec<&NodeId>) =
        layout.children_of(container).partition(|n| layout.is_container(n));

    for node in leaves {
        out.line(depth + 1, &node_statement(node, node.kind().color()));
    }
    for child in nested {
        write_cluster(out, layout, child, depth + 1);
    }
    out.line(depth, "}");
}

fn node_statement(node: &NodeId, fill: &str) -> String {
    format!(
        "{} [label = {}, style=filled, fillcolor={}];",
        quote(node.as_str()),
        quote(node.short_name()),
        quote(fill)
    )
}

fn cluster_name(node: &NodeId) -> String {
    format!("cluster_{node}")
}

/// Double-quoted Graphviz ID.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Tab-indented line buffer.
#[derive(Default)]
struct DotWriter {
    buf: String,
}

impl DotWriter {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.buf.push('\t');
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn finish(self) -> String {
        self.buf
    }
}
