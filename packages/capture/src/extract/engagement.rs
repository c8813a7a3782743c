//! Engagement count extraction and normalization.
//!
//! Each of likes/comments/shares runs its own cascade: accessibility
//! labels on descendants, then section-text patterns, then a whole-text
//! regex fallback. The fallback guards against minute-timestamp shapes
//! ("5m ago") by inspecting the characters preceding a match; the
//! `regex` crate has no lookbehind, so the guard is explicit.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::dom::{NodeId, PageSnapshot};

/// Displayed count: digits with optional thousands separators, decimal
/// part and K/M suffix.
const COUNT: &str = r"\d+(?:,\d+)*(?:\.\d+)?[KkM]?";

macro_rules! count_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(&$pattern.replace("{COUNT}", COUNT)).unwrap());
    };
}

// Accessibility-label patterns.
count_regex!(RE_ARIA_LIKES, r"(?i)({COUNT})\s*(?:people\s+)?(?:likes?|reactions?|ถูกใจ)");
count_regex!(RE_ARIA_COMMENTS, r"(?i)({COUNT})\s*(?:comments?|ความคิดเห็น)");
count_regex!(RE_ARIA_SHARES, r"(?i)({COUNT})\s*(?:shares?|การแชร์|แชร์)");

// Engagement-section patterns, English and Thai forms.
count_regex!(
    RE_SECTION_LIKES,
    r"(?i)(?:All reactions|การแสดงความรู้สึกทั้งหมด):?\s*({COUNT})"
);
count_regex!(
    RE_SECTION_COMMENTS,
    r"(?i)(?:View all|ดูความคิดเห็นทั้งหมด)\s*({COUNT})\s*(?:comments?|รายการ)"
);
count_regex!(
    RE_SECTION_SHARES,
    r"(?i)(?:Shared|แชร์)\s*({COUNT})\s*(?:times?|ครั้ง)"
);

// Whole-text fallback patterns.
count_regex!(RE_TEXT_LIKES, r"(?i)({COUNT})\s+(?:likes?|reactions?|people like this|ถูกใจ)");
count_regex!(RE_TEXT_COMMENTS, r"(?i)({COUNT})\s+(?:comments?|ความคิดเห็น)");
count_regex!(RE_TEXT_SHARES, r"(?i)({COUNT})\s+(?:shares?|การแชร์)");

/// Normalized engagement counts for one post.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct EngagementCounts {
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub shares: Option<u64>,
}

pub(crate) fn extract_engagement(page: &PageSnapshot, post: NodeId) -> EngagementCounts {
    let labels: Vec<String> = page
        .descendants_with_attr(post, "aria-label")
        .into_iter()
        .filter_map(|node| page.attr(node, "aria-label").map(str::to_string))
        .collect();
    let text = page.inner_text(post);

    let counts = EngagementCounts {
        likes: extract_metric(&labels, &text, &RE_ARIA_LIKES, &RE_SECTION_LIKES, &RE_TEXT_LIKES),
        comments: extract_metric(
            &labels,
            &text,
            &RE_ARIA_COMMENTS,
            &RE_SECTION_COMMENTS,
            &RE_TEXT_COMMENTS,
        ),
        shares: extract_metric(
            &labels,
            &text,
            &RE_ARIA_SHARES,
            &RE_SECTION_SHARES,
            &RE_TEXT_SHARES,
        ),
    };
    debug!(
        likes = ?counts.likes,
        comments = ?counts.comments,
        shares = ?counts.shares,
        "engagement extracted"
    );
    counts
}

fn extract_metric(
    labels: &[String],
    text: &str,
    aria: &Regex,
    section: &Regex,
    fallback: &Regex,
) -> Option<u64> {
    labels
        .iter()
        .find_map(|label| capture_count(aria, label))
        .or_else(|| capture_count(section, text))
        .or_else(|| capture_count_guarded(fallback, text))
}

fn capture_count(pattern: &Regex, text: &str) -> Option<u64> {
    pattern
        .captures(text)
        .and_then(|caps| normalize_count(caps.get(1)?.as_str()))
}

/// Like [`capture_count`] but skips matches immediately preceded by a
/// minute-timestamp shape (digit, `m`, whitespace), e.g. the "5" in
/// "posted 5m 5 comments" is fine but "5m 30" must not read "30" as a
/// count belonging to the timestamp. Mirrors a negative lookbehind.
fn capture_count_guarded(pattern: &Regex, text: &str) -> Option<u64> {
    for caps in pattern.captures_iter(text) {
        let full = caps.get(0)?;
        if preceded_by_minute_timestamp(text, full.start()) {
            continue;
        }
        if let Some(count) = normalize_count(caps.get(1)?.as_str()) {
            return Some(count);
        }
    }
    None
}

fn preceded_by_minute_timestamp(text: &str, start: usize) -> bool {
    let prefix = &text[..start];
    let mut chars = prefix.chars().rev();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(ws), Some('m'), Some(digit)) if ws.is_whitespace() && digit.is_ascii_digit()
    )
}

/// Expand a displayed count: strip separators, apply the K/M suffix
/// (lowercase `m` is minutes, never millions), round to an integer.
pub fn normalize_count(raw: &str) -> Option<u64> {
    let cleaned = raw.trim().replace(',', "");
    let (digits, multiplier) = if let Some(rest) = cleaned.strip_suffix(['K', 'k']) {
        (rest, 1_000.0)
    } else if let Some(rest) = cleaned.strip_suffix('M') {
        (rest, 1_000_000.0)
    } else {
        (cleaned.as_str(), 1.0)
    };
    let value: f64 = digits.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier).round() as u64)
}
