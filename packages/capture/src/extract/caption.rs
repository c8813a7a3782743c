//! Caption extraction.
//!
//! Hybrid approach: an active in-post text selection is authoritative
//! and short-circuits everything else. Otherwise the page is classified
//! as full-post or feed view, truncated text is expanded through the
//! `Expander` collaborator (bounded attempts, fixed waits), and a
//! cascade of known selectors, comprehensive traversal and a whole-text
//! fallback takes the first non-empty result.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use crate::dom::{NodeId, PageSnapshot};
use crate::phrases;
use crate::traits::Expander;
use crate::types::config::CaptureConfig;

/// Attribute selectors known to wrap the caption body, tried in order.
const CAPTION_SELECTORS: &[(&str, &str)] = &[
    ("data-ad-comet-preview", "message"),
    ("data-ad-preview", "message"),
    ("data-ad-rendering-role", "body"),
    ("data-ad-rendering-role", "message"),
];

/// URL shapes that indicate a single-post view.
const FULL_VIEW_URL_MARKERS: &[&str] = &["/posts/", "/permalink/", "/photo/"];

/// Fragments shorter than this are noise, not caption pieces.
const MIN_FRAGMENT_LEN: usize = 3;

static RE_BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());
static RE_SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

pub(crate) async fn extract_caption(
    page: &mut PageSnapshot,
    post: NodeId,
    expander: &dyn Expander,
    config: &CaptureConfig,
) -> Option<String> {
    // Stage 0: a selection wholly inside the post is authoritative.
    if let Some(selected) = from_selection(page, post) {
        debug!(len = selected.len(), "using user selection as caption");
        return clean_caption(&selected);
    }

    let full_view = is_full_post_view(page);
    if !full_view {
        expand_truncated_text(page, post, expander, config).await;
    }

    let raw = from_known_selectors(page, post)
        .or_else(|| from_comprehensive_traversal(page, post))
        .or_else(|| from_whole_text(page, post))?;
    clean_caption(&raw)
}

/// Stage 0: the user's selection, if its anchor sits inside the post.
fn from_selection(page: &PageSnapshot, post: NodeId) -> Option<String> {
    let selection = page.selection.as_ref()?;
    let text = selection.text.trim();
    if text.is_empty() || !page.contains(post, selection.anchor) {
        return None;
    }
    Some(text.to_string())
}

/// Full-post view shows one article and needs no expansion; feed view
/// truncates and needs "see more" activation.
fn is_full_post_view(page: &PageSnapshot) -> bool {
    if FULL_VIEW_URL_MARKERS.iter().any(|m| page.url.contains(m)) {
        return true;
    }
    page.descendants_with_attr_eq(page.root(), "role", "article").len() == 1
}

/// Find and activate the expansion control, up to the configured number
/// of rounds, waiting a fixed interval after each activation. Proceeds
/// regardless of whether expansion visibly completed.
async fn expand_truncated_text(
    page: &mut PageSnapshot,
    post: NodeId,
    expander: &dyn Expander,
    config: &CaptureConfig,
) {
    for attempt in 0..config.expand_attempts {
        let Some(control) = find_see_more_control(page, post) else {
            break;
        };
        debug!(attempt, control = control.index(), "activating expansion control");
        let changed = expander.activate(page, control).await;
        tokio::time::sleep(Duration::from_millis(config.expand_wait_ms)).await;
        if !changed {
            break;
        }
    }
}

fn find_see_more_control(page: &PageSnapshot, post: NodeId) -> Option<NodeId> {
    page.descendants_with_attr_eq(post, "role", "button")
        .into_iter()
        .chain(page.descendants_with_tag(post, "button"))
        .find(|&button| phrases::is_see_more_label(&page.text_of(button)))
}

/// Stage 1: known caption-container selectors, first non-empty match.
fn from_known_selectors(page: &PageSnapshot, post: NodeId) -> Option<String> {
    for (attr, value) in CAPTION_SELECTORS {
        if let Some(found) = page
            .descendants_with_attr_eq(post, attr, value)
            .into_iter()
            .map(|node| page.text_of(node))
            .find(|text| !text.is_empty())
        {
            debug!(selector = %format!("[{attr}={value}]"), "caption via known selector");
            return Some(found);
        }
    }
    None
}

/// Stage 2: collect all distinct text-bearing fragments, drop noise and
/// chrome, dedup substrings keeping the longer, sort by vertical
/// position, and join with blank lines.
fn from_comprehensive_traversal(page: &PageSnapshot, post: NodeId) -> Option<String> {
    let mut fragments: Vec<(String, f64)> = Vec::new();
    let mut candidates = page.descendants_with_attr_eq(post, "dir", "auto");
    candidates.extend(page.descendants_with_tag(post, "p"));
    candidates.sort();
    candidates.dedup();

    for node in candidates {
        let text = page.text_of(node);
        if text.len() < MIN_FRAGMENT_LEN {
            continue;
        }
        if phrases::is_ui_only(&text)
            || phrases::is_chrome_phrase(&text)
            || phrases::is_engagement_line(&text)
            || phrases::is_timestamp_shaped(&text)
        {
            continue;
        }
        if in_comments_subtree(page, node, post) {
            continue;
        }
        let top = page.node(node).map(|n| n.rect.top()).unwrap_or(0.0);
        fragments.push((text, top));
    }

    // Keep the longer of any substring pair: nested containers repeat
    // their parents' text.
    let mut keep = vec![true; fragments.len()];
    for i in 0..fragments.len() {
        for j in 0..fragments.len() {
            if i == j || !keep[i] {
                continue;
            }
            let (a, _) = &fragments[i];
            let (b, _) = &fragments[j];
            if a != b && b.contains(a.as_str()) {
                keep[i] = false;
            } else if a == b && i > j {
                keep[i] = false;
            }
        }
    }
    let mut survivors: Vec<(String, f64)> = fragments
        .into_iter()
        .zip(keep)
        .filter_map(|(fragment, keep)| keep.then_some(fragment))
        .collect();
    survivors.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if survivors.is_empty() {
        return None;
    }
    debug!(fragments = survivors.len(), "caption via comprehensive traversal");
    Some(
        survivors
            .into_iter()
            .map(|(text, _)| text)
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}

/// Is this node inside a detected comments subtree?
fn in_comments_subtree(page: &PageSnapshot, node: NodeId, post: NodeId) -> bool {
    page.ancestors(node)
        .into_iter()
        .take_while(|&ancestor| ancestor != post)
        .any(|ancestor| {
            page.attr(ancestor, "aria-label").is_some_and(|label| {
                let lower = label.to_lowercase();
                lower.contains("comment") || label.contains("ความคิดเห็น")
            })
        })
}

/// Stage 3 (ultimate fallback): the whole post's visible text, minus
/// unambiguous chrome/engagement/timestamp lines.
fn from_whole_text(page: &PageSnapshot, post: NodeId) -> Option<String> {
    let text = page.inner_text(post);
    let kept: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            !phrases::is_ui_only(line)
                && !phrases::is_chrome_phrase(line)
                && !phrases::is_engagement_line(line)
                && !phrases::is_timestamp_shaped(line)
        })
        .collect();
    if kept.is_empty() {
        return None;
    }
    debug!(lines = kept.len(), "caption via whole-text fallback");
    Some(kept.join("\n"))
}

/// Final cleanup, applied regardless of which stage produced the text.
pub(crate) fn clean_caption(raw: &str) -> Option<String> {
    let mut text = phrases::strip_see_more_suffix(raw);
    text = phrases::strip_leading_chrome(&text);
    text = RE_SPACE_RUNS.replace_all(&text, " ").into_owned();
    text = RE_BLANK_RUNS.replace_all(&text, "\n\n").into_owned();
    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
