//! Arena nodes for the page snapshot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Rect;

/// Index of a node in the snapshot arena. Stable for the lifetime of
/// the snapshot, including across expansion rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// One rendered element: tag, attributes, the element's own direct text
/// (not descendant text), and its layout rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub tag: String,

    /// Attributes in document order.
    #[serde(default)]
    pub attrs: IndexMap<String, String>,

    /// Direct text content, whitespace-normalized. `None` for elements
    /// with no text of their own.
    #[serde(default)]
    pub text: Option<String>,

    /// Layout rectangle in page coordinates.
    pub rect: Rect,
}

impl NodeData {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            text: None,
            rect: Rect::ZERO,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }
}

/// Arena entry: node data plus tree links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ArenaNode {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
}
