//! Author extraction: label-reference resolution, then a positional
//! link scan over the post header.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::dom::{NodeId, PageSnapshot};
use crate::phrases;

/// Author names are short; anything longer is chrome or body text.
const MAX_AUTHOR_LEN: usize = 150;

/// Links within this many layout units of the post top are header links.
const HEADER_BAND: f64 = 150.0;

static RE_FOLLOW_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*·\s*(?:Follow|ติดตาม)\s*$").unwrap());

static RE_DOT_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+·\s+").unwrap());

/// An extracted author with an optional profile URL.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AuthorField {
    pub name: String,
    pub profile_url: Option<String>,
}

pub(crate) fn extract_author(page: &PageSnapshot, post: NodeId) -> Option<AuthorField> {
    let found = via_label_reference(page, post).or_else(|| via_link_scan(page, post))?;
    let name = clean_author_name(&found.name);
    if name.is_empty() {
        return None;
    }
    debug!(author = %name, "author extracted");
    Some(AuthorField { name, ..found })
}

/// Stage 1: resolve the post's label-reference attribute and accept the
/// first referenced element whose text is name-sized and which wraps or
/// sits next to a profile link.
fn via_label_reference(page: &PageSnapshot, post: NodeId) -> Option<AuthorField> {
    let labelled_by = page.attr(post, "aria-labelledby")?.to_string();
    for label_id in labelled_by.split_whitespace() {
        let Some(label) = page.element_by_id(label_id) else {
            continue;
        };
        let text = page.text_of(label);
        if text.is_empty() || text.len() >= MAX_AUTHOR_LEN {
            continue;
        }
        let link = link_within(page, label).or_else(|| link_around(page, label));
        if let Some(href) = link {
            return Some(AuthorField {
                name: text,
                profile_url: Some(strip_query(&href)),
            });
        }
    }
    None
}

/// Stage 2: scan same-domain links inside the post, skipping chrome and
/// media sub-resource links, and accept the first one in the header
/// band at the top of the post.
fn via_link_scan(page: &PageSnapshot, post: NodeId) -> Option<AuthorField> {
    let post_top = page.node(post)?.rect.top();
    for link in page.descendants_with_tag(post, "a") {
        let Some(href) = page.attr(link, "href") else {
            continue;
        };
        if !is_same_domain(&page.url, href) {
            continue;
        }
        if href.contains("/photo") || href.contains("/video") {
            continue;
        }
        let href = href.to_string();
        let text = page.text_of(link);
        if text.is_empty() || text.len() > MAX_AUTHOR_LEN {
            continue;
        }
        if phrases::contains_chrome_phrase(&text) {
            continue;
        }
        let link_top = page.node(link)?.rect.top();
        if link_top - post_top < HEADER_BAND {
            return Some(AuthorField {
                name: text,
                profile_url: Some(strip_query(&href)),
            });
        }
    }
    None
}

/// Profile URL is the href with its query stripped.
fn strip_query(href: &str) -> String {
    href.split('?').next().unwrap_or(href).to_string()
}

/// First link inside the label element.
fn link_within(page: &PageSnapshot, label: NodeId) -> Option<String> {
    page.descendants_with_tag(label, "a")
        .into_iter()
        .find_map(|a| page.attr(a, "href").map(str::to_string))
}

/// Nearest enclosing link around the label element.
fn link_around(page: &PageSnapshot, label: NodeId) -> Option<String> {
    page.ancestors(label)
        .into_iter()
        .filter(|&node| page.tag(node) == "a")
        .find_map(|a| page.attr(a, "href").map(str::to_string))
}

/// Same-domain test for profile links. Falls back to a substring check
/// for relative or unparseable hrefs.
fn is_same_domain(page_url: &str, href: &str) -> bool {
    let page_host = Url::parse(page_url).ok().and_then(|u| u.host_str().map(str::to_string));
    match (page_host, Url::parse(href)) {
        (Some(host), Ok(link)) => link
            .host_str()
            .is_some_and(|h| h == host || h.ends_with(host.trim_start_matches("www."))),
        (Some(host), Err(_)) => {
            // Relative links stay on the page's domain.
            href.starts_with('/') || href.contains(host.trim_start_matches("www."))
        }
        _ => href.contains("facebook.com"),
    }
}

/// Strip trailing follow-chrome and collapse interior dot separators.
fn clean_author_name(raw: &str) -> String {
    let stripped = RE_FOLLOW_SUFFIX.replace(raw, "");
    RE_DOT_SEPARATOR.replace_all(&stripped, " : ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NodeData, Rect, Viewport};

    fn base_page() -> (PageSnapshot, NodeId) {
        let mut page = PageSnapshot::new(
            "https://www.facebook.com/feed",
            Viewport::new(1000.0, 800.0),
        );
        let root = page.root();
        page.set_rect(root, Rect::new(0.0, 0.0, 1000.0, 800.0));
        let post = page.push_node(
            root,
            NodeData::new("div")
                .with_attr("role", "article")
                .with_rect(Rect::new(0.0, 0.0, 1000.0, 600.0)),
        );
        (page, post)
    }

    #[test]
    fn test_label_reference_resolution() {
        let (mut page, post) = base_page();
        // aria-labelledby on the post pointing at a header span.
        let header = page.push_node(
            post,
            NodeData::new("h2")
                .with_attr("id", "label-1")
                .with_rect(Rect::new(0.0, 0.0, 400.0, 24.0)),
        );
        page.push_node(
            header,
            NodeData::new("a")
                .with_attr("href", "https://www.facebook.com/somepage?ref=feed")
                .with_text("Community Kitchen · Follow")
                .with_rect(Rect::new(0.0, 0.0, 200.0, 20.0)),
        );
        page.set_attr(post, "aria-labelledby", "label-1");

        let author = extract_author(&page, post).unwrap();
        assert_eq!(author.name, "Community Kitchen");
        assert_eq!(
            author.profile_url.as_deref(),
            Some("https://www.facebook.com/somepage")
        );
    }

    #[test]
    fn test_link_scan_skips_chrome_and_media_links() {
        let (mut page, post) = base_page();
        // Chrome link first, then a photo link, then the real author.
        for (href, text, y) in [
            ("https://www.facebook.com/help", "Like", 10.0),
            ("https://www.facebook.com/photo/?fbid=9", "gallery", 20.0),
            ("https://www.facebook.com/someone?__cft__=x", "Some One", 30.0),
        ] {
            page.push_node(
                post,
                NodeData::new("a")
                    .with_attr("href", href)
                    .with_text(text)
                    .with_rect(Rect::new(0.0, y, 200.0, 18.0)),
            );
        }
        let author = extract_author(&page, post).unwrap();
        assert_eq!(author.name, "Some One");
        assert_eq!(
            author.profile_url.as_deref(),
            Some("https://www.facebook.com/someone")
        );
    }

    #[test]
    fn test_link_below_header_band_rejected() {
        let (mut page, post) = base_page();
        page.push_node(
            post,
            NodeData::new("a")
                .with_attr("href", "https://www.facebook.com/other")
                .with_text("Mentioned Page")
                .with_rect(Rect::new(0.0, 400.0, 200.0, 18.0)),
        );
        assert!(extract_author(&page, post).is_none());
    }

    #[test]
    fn test_dot_separator_collapse() {
        assert_eq!(
            clean_author_name("Somewhere Cafe · Bangkok"),
            "Somewhere Cafe : Bangkok"
        );
        assert_eq!(clean_author_name("ครัวชุมชน · ติดตาม"), "ครัวชุมชน");
    }
}
