//! Content-expansion seam ("see more" activation).

use async_trait::async_trait;

use crate::dom::{NodeId, PageSnapshot};

/// Collaborator that synthetically activates an expansion control and
/// rewrites the snapshot with the expanded content.
///
/// The engine makes a bounded number of attempts and waits a fixed
/// short interval after each activation; it proceeds regardless of
/// whether the expansion visibly completed.
#[async_trait]
pub trait Expander: Send + Sync {
    /// Activate `control` in `page`. Returns `true` if the page
    /// changed as a result.
    async fn activate(&self, page: &mut PageSnapshot, control: NodeId) -> bool;
}

/// Expander for static snapshots: activation does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExpander;

#[async_trait]
impl Expander for NoopExpander {
    async fn activate(&self, _page: &mut PageSnapshot, _control: NodeId) -> bool {
        false
    }
}
