//! Serializes a scene subtree as SVG markup.
//!
//! Output is deterministic: `class` comes first, then attributes in name
//! order, so identical trees always produce identical bytes.

use std::fmt::Write as _;

use crate::node::{ElementKind, NodeId};
use crate::tree::{SceneError, SceneTree};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

pub fn to_svg_string(tree: &SceneTree, root: NodeId) -> Result<String, SceneError> {
    if !tree.contains(root) {
        return Err(SceneError::MissingNode(root));
    }
    let mut out = String::new();
    write_node(tree, root, &mut out);
    Ok(out)
}

fn write_node(tree: &SceneTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.node(id) else {
        return;
    };
    let tag = node.kind().tag();

    out.push('<');
    out.push_str(tag);
    if node.kind() == ElementKind::Svg && node.attr("xmlns").is_none() {
        let _ = write!(out, " xmlns=\"{SVG_NAMESPACE}\"");
    }
    if let Some(class) = node.class() {
        let _ = write!(out, " class=\"{}\"", escape(class));
    }
    for (name, value) in node.attributes() {
        let _ = write!(out, " {name}=\"{}\"", escape(value));
    }

    if node.text().is_none() && node.children().is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    if let Some(text) = node.text() {
        out.push_str(&escape(text));
    }
    for &child in node.children() {
        write_node(tree, child, out);
    }
    let _ = write!(out, "</{tag}>");
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
