//! The page snapshot and its read-only queries.

use serde::{Deserialize, Serialize};

use super::node::{ArenaNode, NodeData, NodeId};
use super::{Point, Viewport};

/// An active user text selection at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// The selected text, verbatim.
    pub text: String,
    /// The element containing the selection anchor.
    pub anchor: NodeId,
}

/// A serialized rendering of a page: node arena, page URL, viewport and
/// optional active selection. This is the wire form a host ships to the
/// engine; it round-trips through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Page URL at capture time.
    pub url: String,

    /// Visible viewport dimensions.
    pub viewport: Viewport,

    /// Active text selection, if any.
    #[serde(default)]
    pub selection: Option<Selection>,

    nodes: Vec<ArenaNode>,
}

/// Tags treated as line-breaking when assembling visible text.
const BLOCK_TAGS: &[&str] = &[
    "div", "p", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "br", "section", "article",
    "table", "tr", "blockquote",
];

fn is_block(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl PageSnapshot {
    /// Create an empty snapshot with a synthetic `body` root.
    pub fn new(url: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            url: url.into(),
            viewport,
            selection: None,
            nodes: vec![ArenaNode {
                data: NodeData::new("body"),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root node (always present).
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a child under `parent`. Returns the new node's id.
    pub fn push_node(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ArenaNode {
            data,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Node data accessor. Returns `None` for out-of-range ids.
    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).map(|n| &n.data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attr(name))
    }

    pub fn tag(&self, id: NodeId) -> &str {
        self.node(id).map(|n| n.tag.as_str()).unwrap_or("")
    }

    /// Rewrite a node's direct text. Used by expansion collaborators.
    pub fn set_direct_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            let text = text.into();
            node.data.text = if text.is_empty() { None } else { Some(text) };
        }
    }

    pub(crate) fn set_rect(&mut self, id: NodeId, rect: crate::dom::Rect) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.data.rect = rect;
        }
    }

    /// Remove an attribute. Used by expansion collaborators to retire a
    /// consumed control.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.data.attrs.shift_remove(name);
        }
    }

    /// Set an attribute on an existing node.
    pub fn set_attr(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.data.attrs.insert(name.into(), value.into());
        }
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(node) = cursor {
            out.push(node);
            cursor = self.parent(node);
        }
        out
    }

    /// Is `node` equal to `ancestor` or inside its subtree?
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if ancestor == node {
            return true;
        }
        self.ancestors(node).contains(&ancestor)
    }

    /// Descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// First element whose `id` attribute equals `dom_id`, searched
    /// document-wide (label references can point anywhere on the page).
    pub fn element_by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.all_nodes().find(|&n| self.attr(n, "id") == Some(dom_id))
    }

    /// All nodes in document order, root included.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Topmost element at a point: the deepest node in document order
    /// whose rectangle contains the point. Later siblings paint above
    /// earlier ones.
    pub fn element_from_point(&self, p: Point) -> Option<NodeId> {
        let mut best: Option<(usize, NodeId)> = None;
        let mut stack: Vec<(NodeId, usize)> = vec![(self.root(), 0)];
        while let Some((id, depth)) = stack.pop() {
            if let Some(node) = self.node(id) {
                if node.rect.contains(p) {
                    match best {
                        Some((d, _)) if d > depth => {}
                        _ => best = Some((depth, id)),
                    }
                }
            }
            for &child in self.children(id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Descendants with a given tag, document order.
    pub fn descendants_with_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.tag(n) == tag)
            .collect()
    }

    /// Descendants carrying an attribute, document order.
    pub fn descendants_with_attr(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.attr(n, name).is_some())
            .collect()
    }

    /// Descendants where an attribute equals a value, document order.
    pub fn descendants_with_attr_eq(&self, id: NodeId, name: &str, value: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.attr(n, name) == Some(value))
            .collect()
    }

    /// Descendants where an attribute contains a substring, document order.
    pub fn descendants_with_attr_containing(
        &self,
        id: NodeId,
        name: &str,
        needle: &str,
    ) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.attr(n, name).is_some_and(|v| v.contains(needle)))
            .collect()
    }

    /// Whitespace-normalized text of a subtree (own text plus all
    /// descendant text, document order, space-joined).
    pub fn text_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        if let Some(text) = self.node(id).and_then(|n| n.text.as_deref()) {
            parts.push(normalize_ws(text));
        }
        for node in self.descendants(id) {
            if let Some(text) = self.node(node).and_then(|n| n.text.as_deref()) {
                let normalized = normalize_ws(text);
                if !normalized.is_empty() {
                    parts.push(normalized);
                }
            }
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }

    /// Visible text of a subtree with line breaks at block boundaries,
    /// approximating a rendered `innerText`.
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut lines = Vec::new();
        let mut buf = String::new();
        self.collect_inner_text(id, &mut lines, &mut buf);
        Self::flush_line(&mut buf, &mut lines);
        lines.join("\n")
    }

    fn collect_inner_text(&self, id: NodeId, lines: &mut Vec<String>, buf: &mut String) {
        let Some(node) = self.node(id) else { return };
        let block = is_block(&node.tag);
        if block {
            Self::flush_line(buf, lines);
        }
        if let Some(text) = node.text.as_deref() {
            let normalized = normalize_ws(text);
            if !normalized.is_empty() {
                if !buf.is_empty() {
                    buf.push(' ');
                }
                buf.push_str(&normalized);
            }
        }
        for &child in self.children(id) {
            self.collect_inner_text(child, lines, buf);
        }
        if block {
            Self::flush_line(buf, lines);
        }
    }

    fn flush_line(buf: &mut String, lines: &mut Vec<String>) {
        if !buf.trim().is_empty() {
            lines.push(std::mem::take(buf).trim().to_string());
        } else {
            buf.clear();
        }
    }
}
