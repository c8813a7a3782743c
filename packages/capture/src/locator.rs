//! Post locator: find the container of a single self-contained post
//! from an imprecise interaction point.
//!
//! A cascade of structural heuristics, each a fallback for the one
//! before it. The locator is read-only and holds no state between
//! calls; the "last interaction point" is host state threaded in as
//! the hint.

use tracing::debug;

use crate::dom::{NodeId, PageSnapshot, Point};

/// Legacy class-name markers that still identify a post container on
/// older markup.
const LEGACY_CLASS_MARKERS: &[&str] = &["userContentWrapper", "_5pcr"];

/// CDN-path substring marking a content image.
const CDN_MARKER: &str = "scontent";

/// URL fragments identifying the photo viewer overlay.
const PHOTO_URL_MARKERS: &[&str] = &["/photo/", "/photo.php", "photo_id="];

/// Locates post containers in a page snapshot.
#[derive(Debug, Clone)]
pub struct PostLocator {
    max_hops: usize,
}

impl Default for PostLocator {
    fn default() -> Self {
        Self { max_hops: 50 }
    }
}

impl PostLocator {
    pub fn new(max_hops: usize) -> Self {
        Self { max_hops }
    }

    /// Locate the post container for an optional interaction hint.
    ///
    /// Returns `None` only when every strategy failed; callers must
    /// treat that as a definitive miss, not retry.
    pub fn locate(&self, page: &PageSnapshot, hint: Option<Point>) -> Option<NodeId> {
        match hint.filter(Point::is_valid_hint) {
            Some(point) => {
                if let Some(hit) = page.element_from_point(point) {
                    if let Some(post) = self.walk_to_container(page, hit) {
                        debug!(node = hit.index(), "post found via ancestor walk");
                        return Some(post);
                    }
                }
                let scanned = self.scan_by_vertical_position(page, point.y);
                if scanned.is_some() {
                    debug!(y = point.y, "post found via document scan");
                }
                scanned
            }
            None => {
                debug!("no usable hint coordinates, using visible-first scan");
                self.scan_visible_first(page)
            }
        }
    }

    /// Did the interaction land inside a photo viewer overlay?
    ///
    /// True when an ancestor-or-self is a dialog while the page URL
    /// carries a photo identifier. A dialog without the photo URL shape
    /// is the full-post view and extraction proceeds normally.
    pub fn media_viewer_hit(&self, page: &PageSnapshot, hint: Point) -> bool {
        if !hint.is_valid_hint() {
            return false;
        }
        if !PHOTO_URL_MARKERS.iter().any(|m| page.url.contains(m)) {
            return false;
        }
        let Some(hit) = page.element_from_point(hint) else {
            return false;
        };
        std::iter::once(hit)
            .chain(page.ancestors(hit))
            .any(|node| page.attr(node, "role") == Some("dialog"))
    }

    /// Walk the ancestor chain (bounded) looking for a container.
    fn walk_to_container(&self, page: &PageSnapshot, start: NodeId) -> Option<NodeId> {
        std::iter::once(start)
            .chain(page.ancestors(start))
            .take(self.max_hops)
            .find(|&node| self.is_post_container(page, node))
    }

    /// All container candidates in document order.
    fn candidates(&self, page: &PageSnapshot) -> Vec<NodeId> {
        page.all_nodes()
            .filter(|&node| node != page.root() && self.is_post_container(page, node))
            .collect()
    }

    /// Strategy 3: candidate whose vertical range contains the hint Y,
    /// ties broken by minimal distance from the hint to the top edge.
    fn scan_by_vertical_position(&self, page: &PageSnapshot, y: f64) -> Option<NodeId> {
        self.candidates(page)
            .into_iter()
            .filter_map(|node| {
                let rect = page.node(node)?.rect;
                rect.vertical_range_contains(y)
                    .then(|| (node, (y - rect.top()).abs()))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(node, _)| node)
    }

    /// Strategy 4: first candidate fully inside the viewport, else the
    /// first candidate at all.
    fn scan_visible_first(&self, page: &PageSnapshot) -> Option<NodeId> {
        let candidates = self.candidates(page);
        candidates
            .iter()
            .copied()
            .find(|&node| {
                page.node(node)
                    .is_some_and(|n| page.viewport.fully_contains(&n.rect))
            })
            .or_else(|| candidates.first().copied())
    }

    /// Container predicates, in check order: structural role markers,
    /// label reference with substantial content, legacy class markers.
    fn is_post_container(&self, page: &PageSnapshot, node: NodeId) -> bool {
        if page.attr(node, "role") == Some("article") {
            return true;
        }
        if page.attr(node, "data-store").is_some() {
            return true;
        }
        if page
            .attr(node, "aria-labelledby")
            .is_some_and(|v| !v.is_empty())
            && self.has_substantial_content(page, node)
        {
            return true;
        }
        page.attr(node, "class").is_some_and(|class| {
            LEGACY_CLASS_MARKERS.iter().any(|marker| class.contains(marker))
        })
    }

    /// A label-referenced container only counts when it wraps real
    /// content: a CDN image or directional text.
    fn has_substantial_content(&self, page: &PageSnapshot, node: NodeId) -> bool {
        let has_cdn_image = !page
            .descendants_with_attr_containing(node, "src", CDN_MARKER)
            .is_empty();
        has_cdn_image || !page.descendants_with_attr(node, "dir").is_empty()
    }
}
