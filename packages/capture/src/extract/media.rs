//! Image and video extraction.
//!
//! Images are matched by CDN-path substrings and rendered size; alt
//! text goes through a chrome/corruption hygiene pass. Videos come from
//! the union of three independent detectors: direct media elements,
//! links to known video hosts, and serialized internal video metadata.

use indexmap::IndexSet;
use serde_json::Value;
use tracing::debug;

use crate::dom::{NodeId, PageSnapshot};
use crate::phrases;
use crate::types::record::{ImageRef, VideoKind, VideoRef};

/// URL-path fragments indicating a content-delivery image.
const IMAGE_CDN_MARKERS: &[&str] = &["scontent", "fbcdn"];

/// Path fragments for images that are never post content.
const IMAGE_EXCLUDE_MARKERS: &[&str] = &["emoji", "static", "safe_image"];

/// Minimum rendered dimension for a content image.
const MIN_IMAGE_DIM: f64 = 100.0;

/// Alt text longer than this is a transcription artifact, not alt text.
const MAX_ALT_LEN: usize = 150;

/// Above this length, alt text must be mostly letters to survive.
const ALT_RATIO_LEN: usize = 30;
const MIN_ALPHA_RATIO: f64 = 0.4;

/// Href fragments that mark a link as video-shaped.
const VIDEO_LINK_MARKERS: &[&str] = &[
    "/video",
    "/watch",
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "tiktok.com",
];

pub(crate) fn extract_images(page: &PageSnapshot, post: NodeId) -> Vec<ImageRef> {
    let mut seen = IndexSet::new();
    let mut images = Vec::new();

    for img in page.descendants_with_tag(post, "img") {
        let Some(src) = page.attr(img, "src") else {
            continue;
        };
        if !IMAGE_CDN_MARKERS.iter().any(|m| src.contains(m)) {
            continue;
        }
        if IMAGE_EXCLUDE_MARKERS.iter().any(|m| src.contains(m)) {
            continue;
        }
        let Some(rect) = page.node(img).map(|n| n.rect) else {
            continue;
        };
        if rect.width <= MIN_IMAGE_DIM || rect.height <= MIN_IMAGE_DIM {
            continue;
        }
        if !seen.insert(src.to_string()) {
            continue;
        }
        images.push(ImageRef {
            url: src.to_string(),
            alt: page.attr(img, "alt").and_then(clean_alt),
            width: rect.width.round() as u32,
            height: rect.height.round() as u32,
        });
    }

    debug!(count = images.len(), "images extracted");
    images
}

/// Clean alt text against the chrome blocklist, then discard it when it
/// still looks corrupted or content-free.
fn clean_alt(raw: &str) -> Option<String> {
    let cleaned = phrases::strip_alt_chrome(raw);
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.is_empty() || phrases::is_symbols_only(&cleaned) {
        return None;
    }
    if cleaned.chars().count() > MAX_ALT_LEN {
        return None;
    }
    if cleaned.chars().count() > ALT_RATIO_LEN && alpha_ratio(&cleaned) < MIN_ALPHA_RATIO {
        return None;
    }
    if phrases::has_corruption_signature(&cleaned) {
        return None;
    }
    Some(cleaned)
}

fn alpha_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let alpha = text.chars().filter(|c| c.is_alphabetic()).count();
    alpha as f64 / total as f64
}

pub(crate) fn extract_videos(page: &PageSnapshot, post: NodeId) -> Vec<VideoRef> {
    let mut videos: Vec<VideoRef> = Vec::new();
    let mut push = |videos: &mut Vec<VideoRef>, video: VideoRef| {
        if !videos.iter().any(|v| v.url == video.url) {
            videos.push(video);
        }
    };

    // Detector 1: direct media elements.
    for video in page.descendants_with_tag(post, "video") {
        let Some(src) = page.attr(video, "src") else {
            continue;
        };
        push(
            &mut videos,
            VideoRef {
                url: src.to_string(),
                poster: page.attr(video, "poster").map(str::to_string),
                kind: VideoKind::Direct,
                duration: page
                    .attr(video, "duration")
                    .and_then(|d| d.trim().parse().ok()),
            },
        );
    }

    // Detector 2: anchors to known video hosts.
    for link in page.descendants_with_tag(post, "a") {
        let Some(href) = page.attr(link, "href") else {
            continue;
        };
        if !VIDEO_LINK_MARKERS.iter().any(|m| href.contains(m)) {
            continue;
        }
        if href.contains('#') || href.contains("?comment_id=") {
            continue;
        }
        let poster = page
            .descendants_with_tag(link, "img")
            .into_iter()
            .find_map(|img| page.attr(img, "src").map(str::to_string));
        push(
            &mut videos,
            VideoRef {
                url: href.to_string(),
                poster,
                kind: classify_video_link(href),
                duration: None,
            },
        );
    }

    // Detector 3: serialized internal video metadata.
    for container in data_attr_candidates(page, post) {
        if let Some(store) = page.attr(container, "data-store") {
            if let Some(video) = video_from_data_store(store) {
                push(&mut videos, video);
            }
        } else if let Some(id) = page.attr(container, "data-video-id") {
            push(
                &mut videos,
                VideoRef {
                    url: synthesized_video_url(id),
                    poster: None,
                    kind: VideoKind::FacebookId,
                    duration: None,
                },
            );
        }
    }

    debug!(count = videos.len(), "videos extracted");
    videos
}

/// Nodes carrying serialized video metadata: a `data-store` blob that
/// mentions video, or a bare `data-video-id`.
fn data_attr_candidates(page: &PageSnapshot, post: NodeId) -> Vec<NodeId> {
    page.descendants(post)
        .into_iter()
        .filter(|&node| {
            page.attr(node, "data-store").is_some_and(|v| v.contains("video"))
                || page.attr(node, "data-video-id").is_some()
                || page.attr(node, "data-sigil").is_some_and(|v| v.contains("video"))
        })
        .collect()
}

fn classify_video_link(href: &str) -> VideoKind {
    if href.contains("youtube.com") || href.contains("youtu.be") {
        VideoKind::Youtube
    } else if href.contains("vimeo.com") {
        VideoKind::Vimeo
    } else if href.contains("tiktok.com") {
        VideoKind::Tiktok
    } else if href.contains("/video") {
        VideoKind::Facebook
    } else {
        VideoKind::Link
    }
}

/// Parse a `data-store` JSON blob defensively; any parse failure is
/// ignored.
fn video_from_data_store(store: &str) -> Option<VideoRef> {
    let value: Value = serde_json::from_str(store).ok()?;
    let id = value
        .get("videoID")
        .or_else(|| value.get("video_id"))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })?;
    Some(VideoRef {
        url: synthesized_video_url(&id),
        poster: value
            .get("thumbnailImage")
            .and_then(Value::as_str)
            .map(str::to_string),
        kind: VideoKind::FacebookData,
        duration: value.get("duration").and_then(Value::as_f64),
    })
}

fn synthesized_video_url(id: &str) -> String {
    format!("https://www.facebook.com/video/{id}")
}
