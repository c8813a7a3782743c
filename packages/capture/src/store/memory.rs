//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::traits::store::PostStore;
use crate::types::record::PostRecord;

/// In-memory saved-post list.
///
/// Useful for testing and development. Data is lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<PostRecord>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn post_count(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    /// Clear all stored records.
    pub fn clear(&self) {
        self.posts.write().unwrap().clear();
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn load_posts(&self) -> Result<Vec<PostRecord>, StoreError> {
        Ok(self.posts.read().unwrap().clone())
    }

    async fn save_posts(&self, posts: &[PostRecord]) -> Result<(), StoreError> {
        *self.posts.write().unwrap() = posts.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.post_count(), 0);

        let record = PostRecord::new("https://www.facebook.com/somepage");
        store.save_posts(&[record.clone()]).await.unwrap();
        assert_eq!(store.post_count(), 1);

        let loaded = store.load_posts().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].source_url, record.source_url);

        store.clear();
        assert_eq!(store.post_count(), 0);
    }
}
