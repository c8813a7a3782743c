//! Field extraction: turns a located post container into a
//! [`PostRecord`].
//!
//! Each field family runs its own heuristic cascade over the snapshot;
//! the orchestrator assembles, classifies and validates the result.

use tracing::{debug, info};

use crate::dom::{NodeId, PageSnapshot};
use crate::error::{CaptureError, Result};
use crate::traits::Expander;
use crate::types::config::CaptureConfig;
use crate::types::record::{ExtractionMetadata, PostRecord};

mod author;
mod caption;
mod classify;
mod engagement;
mod media;
mod validate;

pub use engagement::normalize_count;

/// Runs the full extraction pipeline against one post container.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: CaptureConfig,
}

impl Extractor {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Extract every field from the post rooted at `post`. The page is
    /// mutable because truncated captions may be expanded in place
    /// through `expander` before reading.
    ///
    /// Extraction itself never fails on missing fields; each absent
    /// field is simply `None`/empty in the record.
    pub async fn extract(
        &self,
        page: &mut PageSnapshot,
        post: NodeId,
        expander: &dyn Expander,
    ) -> Result<PostRecord> {
        if page.node(post).is_none() {
            return Err(CaptureError::InvalidSnapshot(format!(
                "post node {} out of bounds",
                post.index()
            )));
        }

        let mut record = PostRecord::new(page.url.clone());

        if let Some(author) = author::extract_author(page, post) {
            debug!(name = %author.name, "author extracted");
            record.author = Some(author.name);
            record.author_profile_url = author.profile_url;
        }

        record.caption = caption::extract_caption(page, post, expander, &self.config).await;

        // An expander may rewrite the snapshot from the live page; the
        // located container has to survive that rewrite.
        if page.node(post).is_none() {
            return Err(CaptureError::Extraction(
                "post container lost during expansion".to_string(),
            ));
        }

        record.images = media::extract_images(page, post);
        record.videos = media::extract_videos(page, post);

        let counts = engagement::extract_engagement(page, post);
        record.likes = counts.likes;
        record.comments = counts.comments;
        record.shares = counts.shares;

        record.post_type =
            classify::classify(record.caption.as_deref(), &record.images, &record.videos);

        record.extraction_metadata = ExtractionMetadata {
            images_found: record.images.len(),
            videos_found: record.videos.len(),
            has_engagement_data: record.has_engagement(),
            extracted_at: record.captured_at,
        };

        validate::validate_record(&mut record);

        info!(
            post_type = ?record.post_type,
            quality = ?record.quality,
            caption_len = record.caption.as_deref().map(str::len).unwrap_or(0),
            images = record.images.len(),
            videos = record.videos.len(),
            "extraction complete"
        );
        Ok(record)
    }
}
