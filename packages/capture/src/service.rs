//! Request handling: ties locator, extractor, dedup and storage into
//! the host-facing message loop.

use chrono::Duration;
use tracing::{info, warn};

use crate::dom::{PageSnapshot, Point};
use crate::error::{CaptureError, Result};
use crate::extract::Extractor;
use crate::locator::PostLocator;
use crate::traits::{Expander, PostStore};
use crate::types::config::{CaptureConfig, DedupPolicy};
use crate::types::message::{
    CaptureRequest, CaptureResponse, ExtractionDebug, PingResponse, Response,
};
use crate::types::record::PostRecord;

/// Length of the diagnostic text preview on soft failures.
const DEBUG_PREVIEW_CHARS: usize = 200;

const MSG_MEDIA_VIEWER: &str =
    "Cannot capture from the photo viewer. Close it and capture from the post itself.";
const MSG_NO_POST: &str =
    "Could not find a post here. Try the post text or an area inside the post.";
const MSG_NO_CONTENT: &str = "This post has no extractable content.";
const MSG_DUPLICATE: &str = "This post is already saved.";

/// The capture engine behind the message transport. One instance
/// serves many requests; all per-capture state lives in the request.
pub struct CaptureService<S> {
    store: S,
    config: CaptureConfig,
    locator: PostLocator,
    extractor: Extractor,
}

impl<S: PostStore> CaptureService<S> {
    pub fn new(store: S, config: CaptureConfig) -> Self {
        let locator = PostLocator::new(config.max_ancestor_hops);
        let extractor = Extractor::new(config.clone());
        Self {
            store,
            config,
            locator,
            extractor,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one request from the host transport. Never returns an
    /// error: every failure becomes a `success: false` response with a
    /// user-facing message.
    pub async fn handle(
        &self,
        request: CaptureRequest,
        page: &mut PageSnapshot,
        expander: &dyn Expander,
    ) -> Response {
        match request {
            CaptureRequest::Ping => Response::Ping(PingResponse::ready()),
            CaptureRequest::AddPost { click_x, click_y } => {
                let hint = match (click_x, click_y) {
                    (Some(x), Some(y)) => Some(Point::new(x, y)),
                    _ => None,
                };
                let response = match self.capture(page, hint, expander).await {
                    Ok(record) => CaptureResponse::ok(record),
                    Err(err) => failure_response(err),
                };
                Response::Capture(Box::new(response))
            }
        }
    }

    /// Run the full capture pipeline: locate, extract, gate on content,
    /// dedup, persist. Returns the stored record.
    pub async fn capture(
        &self,
        page: &mut PageSnapshot,
        hint: Option<Point>,
        expander: &dyn Expander,
    ) -> Result<PostRecord> {
        let Some(post) = self.locator.locate(page, hint) else {
            let in_media_viewer = hint
                .map(|point| self.locator.media_viewer_hit(page, point))
                .unwrap_or(false);
            warn!(in_media_viewer, "locator miss");
            return Err(CaptureError::LocatorMiss { in_media_viewer });
        };

        let record = self.extractor.extract(page, post, expander).await?;

        if !self.has_sufficient_content(&record) {
            let text = page.inner_text(post);
            return Err(CaptureError::InsufficientContent {
                debug: ExtractionDebug {
                    text_length: text.chars().count(),
                    text_preview: text.chars().take(DEBUG_PREVIEW_CHARS).collect(),
                    image_count: record.images.len(),
                    video_count: record.videos.len(),
                },
            });
        }

        let mut posts = self.store.load_posts().await?;
        if self.is_duplicate(&record, &posts) {
            info!(url = %record.source_url, "duplicate suppressed");
            return Err(CaptureError::Duplicate);
        }

        posts.push(record.clone());
        while posts.len() > self.config.max_saved_posts {
            posts.remove(0);
        }
        self.store.save_posts(&posts).await?;

        info!(
            total = posts.len(),
            post_type = ?record.post_type,
            "post saved"
        );
        Ok(record)
    }

    /// A record counts as content when it has a caption of useful
    /// length, any media, or an author.
    fn has_sufficient_content(&self, record: &PostRecord) -> bool {
        let caption_len = record.caption.as_deref().map(str::len).unwrap_or(0);
        caption_len >= self.config.min_caption_len
            || !record.images.is_empty()
            || !record.videos.is_empty()
            || record.author.as_deref().is_some_and(|a| !a.is_empty())
    }

    fn is_duplicate(&self, record: &PostRecord, saved: &[PostRecord]) -> bool {
        let DedupPolicy::UrlOrAuthorWindow { window_secs } = self.config.dedup else {
            return false;
        };
        let window = Duration::seconds(window_secs);
        saved.iter().any(|existing| {
            if existing.source_url == record.source_url {
                return true;
            }
            match (&existing.author, &record.author) {
                (Some(a), Some(b)) if a == b => {
                    (record.captured_at - existing.captured_at).abs() <= window
                }
                _ => false,
            }
        })
    }
}

fn failure_response(err: CaptureError) -> CaptureResponse {
    match err {
        CaptureError::LocatorMiss { in_media_viewer } => {
            if in_media_viewer {
                CaptureResponse::failure(MSG_MEDIA_VIEWER)
            } else {
                CaptureResponse::failure(MSG_NO_POST)
            }
        }
        CaptureError::InsufficientContent { debug } => {
            CaptureResponse::failure_with_debug(MSG_NO_CONTENT, debug)
        }
        CaptureError::Duplicate => CaptureResponse::failure(MSG_DUPLICATE),
        other => CaptureResponse::failure(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NodeData, Rect, Viewport};
    use crate::store::MemoryStore;
    use crate::traits::NoopExpander;

    fn feed_page(url: &str, posts: &[&str]) -> PageSnapshot {
        let mut page = PageSnapshot::new(url, Viewport::new(1000.0, 800.0));
        let root = page.root();
        page.set_rect(root, Rect::new(0.0, 0.0, 1000.0, 3000.0));
        for (index, caption) in posts.iter().enumerate() {
            let top = index as f64 * 600.0;
            let article = page.push_node(
                root,
                NodeData::new("div")
                    .with_attr("role", "article")
                    .with_rect(Rect::new(0.0, top, 1000.0, 500.0)),
            );
            page.push_node(
                article,
                NodeData::new("div")
                    .with_attr("dir", "auto")
                    .with_text(*caption)
                    .with_rect(Rect::new(0.0, top + 60.0, 1000.0, 20.0)),
            );
        }
        page
    }

    fn service() -> CaptureService<MemoryStore> {
        CaptureService::new(MemoryStore::new(), CaptureConfig::new())
    }

    #[tokio::test]
    async fn test_ping() {
        let service = service();
        let mut page = feed_page("https://www.facebook.com/", &[]);
        let response = service
            .handle(CaptureRequest::Ping, &mut page, &NoopExpander)
            .await;
        assert_eq!(response, Response::Ping(PingResponse::ready()));
    }

    #[tokio::test]
    async fn test_add_post_saves_record() {
        let service = service();
        let mut page = feed_page(
            "https://www.facebook.com/someone/posts/1",
            &["A long enough caption for the content gate"],
        );
        let request = CaptureRequest::AddPost {
            click_x: Some(500.0),
            click_y: Some(80.0),
        };
        let response = service.handle(request, &mut page, &NoopExpander).await;
        let Response::Capture(capture) = response else {
            panic!("expected capture response");
        };
        assert!(capture.success, "{:?}", capture.error);
        assert_eq!(service.store().post_count(), 1);
    }

    #[tokio::test]
    async fn test_locator_miss_message() {
        let service = service();
        let mut page = feed_page("https://www.facebook.com/", &[]);
        let request = CaptureRequest::AddPost {
            click_x: Some(10.0),
            click_y: Some(10.0),
        };
        let Response::Capture(capture) =
            service.handle(request, &mut page, &NoopExpander).await
        else {
            panic!("expected capture response");
        };
        assert!(!capture.success);
        assert_eq!(capture.error.as_deref(), Some(MSG_NO_POST));
    }

    #[tokio::test]
    async fn test_media_viewer_miss_message() {
        let service = service();
        let mut page = PageSnapshot::new(
            "https://www.facebook.com/photo/?fbid=42",
            Viewport::new(1000.0, 800.0),
        );
        let root = page.root();
        page.set_rect(root, Rect::new(0.0, 0.0, 1000.0, 800.0));
        page.push_node(
            root,
            NodeData::new("div")
                .with_attr("role", "dialog")
                .with_rect(Rect::new(0.0, 0.0, 1000.0, 800.0)),
        );
        let request = CaptureRequest::AddPost {
            click_x: Some(500.0),
            click_y: Some(400.0),
        };
        let Response::Capture(capture) =
            service.handle(request, &mut page, &NoopExpander).await
        else {
            panic!("expected capture response");
        };
        assert!(!capture.success);
        assert_eq!(capture.error.as_deref(), Some(MSG_MEDIA_VIEWER));
    }

    #[tokio::test]
    async fn test_insufficient_content_carries_debug() {
        let service = service();
        // Caption below the 10-char gate, no media, no author.
        let mut page = feed_page("https://www.facebook.com/x/posts/2", &["short"]);
        let err = service
            .capture(&mut page, Some(Point::new(500.0, 80.0)), &NoopExpander)
            .await
            .unwrap_err();
        let CaptureError::InsufficientContent { debug } = err else {
            panic!("expected insufficient content");
        };
        assert!(debug.text_preview.contains("short"));
        assert_eq!(debug.image_count, 0);
        assert_eq!(service.store().post_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_url_suppressed() {
        let service = service();
        let mut page = feed_page(
            "https://www.facebook.com/someone/posts/3",
            &["A long enough caption for the content gate"],
        );
        let hint = Some(Point::new(500.0, 80.0));
        service
            .capture(&mut page, hint, &NoopExpander)
            .await
            .unwrap();
        let err = service
            .capture(&mut page, hint, &NoopExpander)
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Duplicate));
        assert_eq!(service.store().post_count(), 1);
    }

    #[tokio::test]
    async fn test_dedup_off_stores_everything() {
        let config = CaptureConfig::new().with_dedup(DedupPolicy::Off);
        let service = CaptureService::new(MemoryStore::new(), config);
        let mut page = feed_page(
            "https://www.facebook.com/someone/posts/4",
            &["A long enough caption for the content gate"],
        );
        let hint = Some(Point::new(500.0, 80.0));
        service
            .capture(&mut page, hint, &NoopExpander)
            .await
            .unwrap();
        service
            .capture(&mut page, hint, &NoopExpander)
            .await
            .unwrap();
        assert_eq!(service.store().post_count(), 2);
    }

    #[tokio::test]
    async fn test_capacity_eviction_drops_oldest() {
        let config = CaptureConfig::new()
            .with_max_saved_posts(2)
            .with_dedup(DedupPolicy::Off);
        let service = CaptureService::new(MemoryStore::new(), config);
        for index in 0..3 {
            let mut page = feed_page(
                &format!("https://www.facebook.com/someone/posts/{index}"),
                &["A long enough caption for the content gate"],
            );
            service
                .capture(&mut page, Some(Point::new(500.0, 80.0)), &NoopExpander)
                .await
                .unwrap();
        }
        let posts = service.store().load_posts().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(
            posts[0].source_url,
            "https://www.facebook.com/someone/posts/1"
        );
    }
}
