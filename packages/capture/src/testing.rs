//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that drive the capture
//! engine without a real host page behind the snapshot.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::dom::{NodeData, NodeId, PageSnapshot, Rect, Viewport};
use crate::traits::Expander;

/// Builder for labelled snapshot trees.
///
/// Nodes are attached by the label of their parent (`"root"` for the
/// arena root) and can be looked up by label after building, which
/// keeps fixtures readable without threading `NodeId`s by hand.
pub struct SnapshotBuilder {
    page: PageSnapshot,
    labels: HashMap<String, NodeId>,
}

impl SnapshotBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        let mut page = PageSnapshot::new(url, Viewport::default());
        let root = page.root();
        page.set_rect(root, Rect::new(0.0, 0.0, 1280.0, 4000.0));
        let mut labels = HashMap::new();
        labels.insert("root".to_string(), root);
        Self { page, labels }
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.page.viewport = Viewport::new(width, height);
        self
    }

    /// Attach a node under the node labelled `parent`.
    ///
    /// Panics on an unknown parent or a reused label; fixtures with
    /// either are bugs.
    pub fn node(mut self, parent: &str, label: &str, data: NodeData) -> Self {
        let parent_id = *self
            .labels
            .get(parent)
            .unwrap_or_else(|| panic!("unknown parent label {parent:?}"));
        let id = self.page.push_node(parent_id, data);
        let replaced = self.labels.insert(label.to_string(), id);
        assert!(replaced.is_none(), "label {label:?} used twice");
        self
    }

    pub fn build(self) -> (PageSnapshot, Labels) {
        (self.page, Labels(self.labels))
    }
}

/// Label-to-node lookup produced by [`SnapshotBuilder`].
pub struct Labels(HashMap<String, NodeId>);

impl Labels {
    /// Panics on an unknown label.
    pub fn id(&self, label: &str) -> NodeId {
        *self
            .0
            .get(label)
            .unwrap_or_else(|| panic!("unknown label {label:?}"))
    }
}

/// An expander that rewrites a target node's text on activation, the
/// way a real "see more" click replaces truncated content.
///
/// The activated control is stripped of its text and `role` so that it
/// no longer registers as an expansion control afterwards.
pub struct ScriptedExpander {
    target: NodeId,
    expanded_text: String,
    inert: bool,
    activations: AtomicUsize,
}

impl ScriptedExpander {
    /// Expander that, when activated, replaces the direct text of
    /// `target` with `expanded_text`.
    pub fn new(target: NodeId, expanded_text: impl Into<String>) -> Self {
        Self {
            target,
            expanded_text: expanded_text.into(),
            inert: false,
            activations: AtomicUsize::new(0),
        }
    }

    /// Make activation report no change, modelling a control whose
    /// click never takes effect.
    pub fn inert(mut self) -> Self {
        self.inert = true;
        self
    }

    /// Number of activations performed.
    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Expander for ScriptedExpander {
    async fn activate(&self, page: &mut PageSnapshot, control: NodeId) -> bool {
        self.activations.fetch_add(1, Ordering::SeqCst);
        if self.inert {
            return false;
        }
        page.set_direct_text(self.target, self.expanded_text.clone());
        page.set_direct_text(control, "");
        page.remove_attr(control, "role");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Expander;

    #[test]
    fn test_builder_labels() {
        let (page, labels) = SnapshotBuilder::new("https://www.facebook.com/")
            .node(
                "root",
                "article",
                NodeData::new("div")
                    .with_attr("role", "article")
                    .with_rect(Rect::new(0.0, 0.0, 1000.0, 500.0)),
            )
            .node(
                "article",
                "caption",
                NodeData::new("div")
                    .with_attr("dir", "auto")
                    .with_text("hello")
                    .with_rect(Rect::new(0.0, 60.0, 1000.0, 20.0)),
            )
            .build();
        assert!(page.contains(labels.id("article"), labels.id("caption")));
        assert_eq!(page.text_of(labels.id("caption")), "hello");
    }

    #[tokio::test]
    async fn test_scripted_expander_rewrites_target() {
        let (mut page, labels) = SnapshotBuilder::new("https://www.facebook.com/")
            .node(
                "root",
                "caption",
                NodeData::new("div").with_text("Truncated…"),
            )
            .node(
                "root",
                "control",
                NodeData::new("div")
                    .with_attr("role", "button")
                    .with_text("See more"),
            )
            .build();
        let expander = ScriptedExpander::new(labels.id("caption"), "Full text");
        let changed = expander.activate(&mut page, labels.id("control")).await;
        assert!(changed);
        assert_eq!(page.text_of(labels.id("caption")), "Full text");
        assert_eq!(page.text_of(labels.id("control")), "");
        assert_eq!(expander.activations(), 1);
    }
}
