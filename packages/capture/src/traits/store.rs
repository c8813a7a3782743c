//! Persistence seam for saved post records.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::record::PostRecord;

/// Storage collaborator owning the saved-post list.
///
/// The engine performs one whole-list read-modify-write per capture and
/// retains no copy across calls. There is no transactional isolation:
/// two concurrent captures can race and one append can overwrite the
/// other. That gap is inherent to the collaborator interface and not
/// papered over here.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Read the full saved list, oldest first.
    async fn load_posts(&self) -> Result<Vec<PostRecord>, StoreError>;

    /// Replace the full saved list.
    async fn save_posts(&self, posts: &[PostRecord]) -> Result<(), StoreError>;
}
