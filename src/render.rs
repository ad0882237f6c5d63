//! # Tree Rendering
//!
//! Read-only views of the index for humans: Graphviz DOT text and a
//! box-drawing ASCII tree. Everything here is pure string production over
//! the index's public accessors; the tree logic knows nothing about
//! rendering, and rendering never mutates the tree.
//!
//! ## DOT Output
//!
//! ```text
//! digraph avl_index {
//!     rankdir=TB;
//!     n1 [label="USA\n12.8\nh=3 bf=0", fillcolor="lightgreen", ...];
//!     n1 -> n3 [label="L", color="blue"];
//!     ...
//! }
//! ```
//!
//! Nodes are filled by key band (cold cyan through hot salmon), a highlighted
//! node is drawn gold, an optional `cluster_legend` subgraph spells the bands
//! out, and [`render_search`] repaints the visited descent path coral over a
//! gray tree. Feed the text to the `dot` binary
//! (`dot -Tpng out.dot`) or any Graphviz viewer; running Graphviz is the
//! caller's business.
//!
//! ## ASCII Output
//!
//! [`render_ascii`] prints the tree sideways with box-drawing branches,
//! right subtree above left, suitable for a terminal.

use std::fmt::Write;

use crate::tree::{AvlIndex, NodeId};

/// Appearance knobs for [`render_dot`].
#[derive(Debug, Clone, Default)]
pub struct DotOptions {
    /// Add height and balance factor to each node label.
    pub show_details: bool,
    /// Append a color-band legend cluster to the graph.
    pub show_legend: bool,
    /// Draw this node gold with a thick border.
    pub highlight: Option<NodeId>,
    /// Graph caption. When `None`, a summary line (record count and key
    /// range) is generated from the index statistics.
    pub title: Option<String>,
}

/// Render the whole tree as Graphviz DOT text.
///
/// Returns a complete `digraph`; an empty index renders an empty graph with
/// just the caption.
pub fn render_dot(index: &AvlIndex, options: &DotOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph avl_index {{");
    let _ = writeln!(out, "    rankdir=TB;");
    let _ = writeln!(
        out,
        "    node [shape=circle, style=filled, fontname=\"Arial\", fontsize=10];"
    );
    let _ = writeln!(out, "    edge [fontname=\"Arial\", fontsize=8];");

    let title = match &options.title {
        Some(title) => title.clone(),
        None => summary_caption(index),
    };
    let _ = writeln!(out, "    label=\"{}\";", escape(&title));

    if let Some(root) = index.root() {
        write_subtree(index, root, options, &mut out);
    }
    if options.show_legend {
        write_legend(&mut out);
    }
    out.push_str("}\n");
    out
}

/// Render the tree with the descent path of a tolerance search for `key`
/// highlighted: the match (if any) gold, visited nodes coral, the rest gray.
pub fn render_search(index: &AvlIndex, key: f64) -> String {
    let trace = index.search_path(key);

    let title = match trace.found {
        Some(id) => {
            let node = index.get(id).expect("trace references a live node");
            format!(
                "search {:.2}: found {} ({:.2})",
                key,
                node.code(),
                node.key()
            )
        }
        None => format!("search {:.2}: not found", key),
    };

    let mut out = String::new();
    let _ = writeln!(out, "digraph avl_search {{");
    let _ = writeln!(out, "    rankdir=TB;");
    let _ = writeln!(
        out,
        "    node [shape=circle, style=filled, fontname=\"Arial\", fontsize=10];"
    );
    let _ = writeln!(out, "    edge [fontname=\"Arial\", fontsize=8];");
    let _ = writeln!(out, "    label=\"{}\";", escape(&title));

    if let Some(root) = index.root() {
        write_search_subtree(index, root, &trace.visited, trace.found, &mut out);
    }
    out.push_str("}\n");
    out
}

/// Box-drawing sideways tree, right subtree printed first.
pub fn render_ascii(index: &AvlIndex) -> String {
    let mut out = String::new();
    match index.root() {
        Some(root) => write_ascii(index, root, "", true, &mut out),
        None => out.push_str("(empty)\n"),
    }
    out
}

fn summary_caption(index: &AvlIndex) -> String {
    match index.statistics() {
        Some(stats) => format!(
            "{} records | keys {:.1} to {:.1}",
            stats.count, stats.min, stats.max
        ),
        None => "empty index".to_string(),
    }
}

fn write_subtree(index: &AvlIndex, id: NodeId, options: &DotOptions, out: &mut String) {
    let node = index.get(id).expect("subtree walk references a live node");

    let (color, penwidth) = if options.highlight == Some(id) {
        ("gold", 3)
    } else {
        (band_color(node.key()), 1)
    };

    let mut label = format!("{}\\n{:.1}", escape(node.code()), node.key());
    if options.show_details {
        let _ = write!(
            label,
            "\\nh={} bf={}",
            node.height(),
            index.balance_factor(id)
        );
    }

    let _ = writeln!(
        out,
        "    n{} [label=\"{}\", fillcolor=\"{}\", penwidth={}];",
        id.index(),
        label,
        color,
        penwidth
    );

    if let Some(left) = node.left() {
        let _ = writeln!(
            out,
            "    n{} -> n{} [label=\"L\", color=\"blue\"];",
            id.index(),
            left.index()
        );
        write_subtree(index, left, options, out);
    }
    if let Some(right) = node.right() {
        let _ = writeln!(
            out,
            "    n{} -> n{} [label=\"R\", color=\"red\"];",
            id.index(),
            right.index()
        );
        write_subtree(index, right, options, out);
    }
}

fn write_search_subtree(
    index: &AvlIndex,
    id: NodeId,
    visited: &[NodeId],
    found: Option<NodeId>,
    out: &mut String,
) {
    let node = index.get(id).expect("subtree walk references a live node");

    let (color, penwidth) = if found == Some(id) {
        ("gold", 3)
    } else if visited.contains(&id) {
        ("lightcoral", 2)
    } else {
        ("lightgray", 1)
    };

    let _ = writeln!(
        out,
        "    n{} [label=\"{}\\n{:.1}\", fillcolor=\"{}\", penwidth={}];",
        id.index(),
        escape(node.code()),
        node.key(),
        color,
        penwidth
    );

    for (child, side) in [(node.left(), "L"), (node.right(), "R")] {
        if let Some(child) = child {
            let edge_color = if visited.contains(&child) { "red" } else { "gray" };
            let _ = writeln!(
                out,
                "    n{} -> n{} [label=\"{}\", color=\"{}\"];",
                id.index(),
                child.index(),
                side,
                edge_color
            );
            write_search_subtree(index, child, visited, found, out);
        }
    }
}

fn write_ascii(index: &AvlIndex, id: NodeId, prefix: &str, is_last: bool, out: &mut String) {
    let node = index.get(id).expect("subtree walk references a live node");

    let _ = writeln!(
        out,
        "{}{}{} ({:.1})",
        prefix,
        if is_last { "└── " } else { "├── " },
        node.code(),
        node.key()
    );

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
    if let Some(right) = node.right() {
        write_ascii(index, right, &child_prefix, node.left().is_none(), out);
    }
    if let Some(left) = node.left() {
        write_ascii(index, left, &child_prefix, true, out);
    }
}

/// Color-band legend as a `cluster_legend` subgraph, one box per band,
/// stacked vertically with invisible edges.
fn write_legend(out: &mut String) {
    const BANDS: [(&str, &str, &str); 5] = [
        ("l0", "< 0", "lightcyan"),
        ("l1", "0 to 10", "lightblue"),
        ("l2", "10 to 20", "lightgreen"),
        ("l3", "20 to 30", "orange"),
        ("l4", ">= 30", "salmon"),
    ];

    let _ = writeln!(out, "    subgraph cluster_legend {{");
    let _ = writeln!(out, "        label=\"Key bands\";");
    let _ = writeln!(out, "        style=filled;");
    let _ = writeln!(out, "        color=white;");
    let _ = writeln!(out, "        node [shape=box, style=filled];");
    for (id, label, color) in BANDS {
        let _ = writeln!(
            out,
            "        {} [label=\"{}\", fillcolor=\"{}\"];",
            id, label, color
        );
    }
    for pair in BANDS.windows(2) {
        let _ = writeln!(out, "        {} -> {} [style=invis];", pair[0].0, pair[1].0);
    }
    let _ = writeln!(out, "    }}");
}

/// Fill color by key band: cold keys cyan/blue, temperate green, hot
/// orange/salmon. The bands come from the original temperature dataset but
/// degrade gracefully for any numeric key.
fn band_color(key: f64) -> &'static str {
    if key < 0.0 {
        "lightcyan"
    } else if key < 10.0 {
        "lightblue"
    } else if key < 20.0 {
        "lightgreen"
    } else if key < 30.0 {
        "orange"
    } else {
        "salmon"
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
