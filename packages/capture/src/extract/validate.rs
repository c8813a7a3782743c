//! Post-hoc validation and cleanup of an assembled record.
//!
//! Invalid entries are dropped or nulled, never stored; the record
//! itself is never rejected here.

use tracing::debug;
use url::Url;

use crate::phrases;
use crate::types::record::{CaptionQuality, PostRecord, RecordQuality};

/// Engagement counts above this are artifacts, not counts.
const MAX_COUNT: u64 = 100_000_000;

/// Rendered dimensions at or above this are layout artifacts.
const MAX_DIMENSION: u32 = 10_000;

/// Captions are truncated beyond this many characters.
const MAX_CAPTION_CHARS: usize = 10_000;

/// Caption-quality scoring only runs on captions with more tokens.
const QUALITY_MIN_TOKENS: usize = 10;

pub(crate) fn validate_record(record: &mut PostRecord) {
    if record
        .author_profile_url
        .as_deref()
        .is_some_and(|u| !is_http_url(u))
    {
        record.author_profile_url = None;
    }

    let before_images = record.images.len();
    record.images.retain(|img| {
        is_http_url(&img.url)
            && img.width > 0
            && img.height > 0
            && img.width < MAX_DIMENSION
            && img.height < MAX_DIMENSION
    });
    let before_videos = record.videos.len();
    record.videos.retain(|video| is_http_url(&video.url));
    if record.images.len() < before_images || record.videos.len() < before_videos {
        debug!(
            images_dropped = before_images - record.images.len(),
            videos_dropped = before_videos - record.videos.len(),
            "dropped invalid media entries"
        );
    }

    for count in [&mut record.likes, &mut record.comments, &mut record.shares] {
        if count.is_some_and(|c| c > MAX_COUNT) {
            *count = None;
        }
    }

    if let Some(caption) = record.caption.take() {
        let truncated = truncate_caption(&caption);
        record.caption_quality = Some(score_caption(&truncated));
        record.caption = Some(truncated);
    } else {
        record.caption_quality = None;
    }

    record.quality = if record.is_empty() {
        RecordQuality::Poor
    } else {
        RecordQuality::Good
    };
}

fn truncate_caption(caption: &str) -> String {
    if caption.chars().count() <= MAX_CAPTION_CHARS {
        return caption.to_string();
    }
    let mut truncated: String = caption.chars().take(MAX_CAPTION_CHARS).collect();
    truncated.push('…');
    truncated
}

/// A caption is low quality when more than half its tokens carry a
/// chrome substring. Short captions are not scored.
fn score_caption(caption: &str) -> CaptionQuality {
    let tokens: Vec<&str> = caption.split_whitespace().collect();
    if tokens.len() <= QUALITY_MIN_TOKENS {
        return CaptionQuality::Good;
    }
    let chrome_tokens = tokens
        .iter()
        .filter(|token| {
            let lower = token.to_lowercase();
            phrases::CHROME_SUBSTRINGS.iter().any(|c| lower.contains(c))
        })
        .count();
    if chrome_tokens * 2 > tokens.len() {
        CaptionQuality::Low
    } else {
        CaptionQuality::Good
    }
}

fn is_http_url(s: &str) -> bool {
    Url::parse(s)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
