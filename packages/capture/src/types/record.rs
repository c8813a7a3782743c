//! The captured post record and its parts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One captured image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,

    /// Cleaned alt text, or `None` when absent or discarded as chrome
    /// or corrupted.
    pub alt: Option<String>,

    /// Rendered width in layout units.
    pub width: u32,

    /// Rendered height in layout units.
    pub height: u32,
}

/// Where a detected video reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VideoKind {
    /// A playing `<video>` element with a direct media source.
    Direct,
    /// An on-site video link (`/video`, `/watch`).
    Facebook,
    /// Synthesized from a serialized `data-store` JSON blob.
    FacebookData,
    /// Synthesized from a bare `data-video-id` attribute.
    FacebookId,
    Youtube,
    Vimeo,
    Tiktok,
    /// A video-shaped link that matched no known host.
    Link,
}

impl VideoKind {
    /// On-site video kinds (all three detection paths).
    pub fn is_facebook(self) -> bool {
        matches!(
            self,
            VideoKind::Facebook | VideoKind::FacebookData | VideoKind::FacebookId
        )
    }

    /// Known external hosting platforms.
    pub fn is_external(self) -> bool {
        matches!(self, VideoKind::Youtube | VideoKind::Vimeo | VideoKind::Tiktok)
    }
}

/// One captured video reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub url: String,

    /// Poster/thumbnail URL if one was found.
    pub poster: Option<String>,

    #[serde(rename = "type")]
    pub kind: VideoKind,

    /// Duration in seconds, only known for direct media elements or
    /// serialized video metadata.
    pub duration: Option<f64>,
}

/// Classification derived from the final caption/image/video presence.
/// Always set once extraction completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostType {
    Empty,
    Text,
    Image,
    MultiImage,
    Video,
    VideoWithImages,
    FacebookVideo,
    FacebookVideoWithImages,
    ExternalVideo,
    ExternalVideoWithImages,
    VideoLink,
    VideoLinkWithImages,
}

/// Whether the caption text looks like content or mostly UI chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionQuality {
    Good,
    Low,
}

/// Overall record quality: `poor` when every field came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordQuality {
    Good,
    Poor,
}

/// Diagnostics recorded alongside every extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub images_found: usize,
    pub videos_found: usize,
    pub has_engagement_data: bool,
    pub extracted_at: DateTime<Utc>,
}

/// The unit of output: one captured post. Constructed fresh per capture,
/// fully populated before hand-off, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Page URL at capture time.
    pub source_url: String,

    /// Capture instant.
    pub captured_at: DateTime<Utc>,

    pub author: Option<String>,
    pub author_profile_url: Option<String>,

    pub caption: Option<String>,
    pub caption_quality: Option<CaptionQuality>,

    /// Captured images, no two entries with the same URL.
    pub images: Vec<ImageRef>,

    /// Captured video references, no two entries with the same URL.
    pub videos: Vec<VideoRef>,

    /// Normalized engagement counts (K/M suffixes expanded).
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub shares: Option<u64>,

    pub post_type: PostType,
    pub quality: RecordQuality,
    pub extraction_metadata: ExtractionMetadata,
}

impl PostRecord {
    /// A fresh, empty record for a capture starting now.
    pub fn new(source_url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            source_url: source_url.into(),
            captured_at: now,
            author: None,
            author_profile_url: None,
            caption: None,
            caption_quality: None,
            images: Vec::new(),
            videos: Vec::new(),
            likes: None,
            comments: None,
            shares: None,
            post_type: PostType::Empty,
            quality: RecordQuality::Poor,
            extraction_metadata: ExtractionMetadata {
                images_found: 0,
                videos_found: 0,
                has_engagement_data: false,
                extracted_at: now,
            },
        }
    }

    /// True when every content field came back empty.
    pub fn is_empty(&self) -> bool {
        self.author.as_deref().map_or(true, str::is_empty)
            && self.caption.as_deref().map_or(true, str::is_empty)
            && self.images.is_empty()
            && self.videos.is_empty()
    }

    pub fn has_engagement(&self) -> bool {
        self.likes.is_some() || self.comments.is_some() || self.shares.is_some()
    }
}
