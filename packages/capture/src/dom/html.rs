//! Build a [`PageSnapshot`] from raw HTML.
//!
//! Raw markup carries no layout, so this ingestion synthesizes a
//! deterministic vertical-flow layout: elements stack top to bottom in
//! document order, text-bearing elements take one line each, and media
//! elements take their declared `width`/`height` attributes as rendered
//! dimensions. Good enough for fixtures and offline runs; hosts with a
//! real renderer should ship real rectangles in the wire snapshot.

use scraper::{ElementRef, Html};

use super::{NodeData, NodeId, PageSnapshot, Rect, Viewport};

/// Synthesized height of one text line.
const LINE_HEIGHT: f64 = 20.0;

/// Tags that never contribute content.
const SKIP_TAGS: &[&str] = &["script", "style", "head", "meta", "link", "title", "noscript"];

/// Parse an HTML document into a snapshot with synthesized layout.
pub fn snapshot_from_html(html: &str, url: &str, viewport: Viewport) -> PageSnapshot {
    let document = Html::parse_document(html);
    let mut page = PageSnapshot::new(url, viewport);
    let root = page.root();

    let body = document
        .root_element()
        .child_elements()
        .find(|el| el.value().name() == "body");

    let mut cursor = 0.0;
    match body {
        Some(body) => {
            for child in body.child_elements() {
                add_element(&mut page, root, child, &mut cursor);
            }
        }
        None => {
            add_element(&mut page, root, document.root_element(), &mut cursor);
        }
    }

    let extent = cursor.max(viewport.height);
    page.set_rect(root, Rect::new(0.0, 0.0, viewport.width, extent));
    page
}

fn add_element(page: &mut PageSnapshot, parent: NodeId, element: ElementRef, cursor: &mut f64) {
    let tag = element.value().name().to_string();
    if SKIP_TAGS.contains(&tag.as_str()) {
        return;
    }

    let mut data = NodeData::new(tag.clone());
    for (name, value) in element.value().attrs() {
        data = data.with_attr(name, value);
    }

    let direct_text = element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| t.text.to_string()))
        .collect::<Vec<_>>()
        .join(" ");
    let direct_text = direct_text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !direct_text.is_empty() {
        data = data.with_text(direct_text.clone());
    }

    let start = *cursor;
    let id = page.push_node(parent, data);

    if !direct_text.is_empty() {
        *cursor += LINE_HEIGHT;
    }

    let media_dims = if tag == "img" || tag == "video" {
        let width = attr_f64(&element, "width").unwrap_or(0.0);
        let height = attr_f64(&element, "height").unwrap_or(0.0);
        *cursor += height;
        Some((width, height))
    } else {
        None
    };

    for child in element.child_elements() {
        add_element(page, id, child, cursor);
    }

    let rect = match media_dims {
        Some((width, height)) => Rect::new(0.0, start, width, height),
        None => Rect::new(0.0, start, page.viewport.width, *cursor - start),
    };
    page.set_rect(id, rect);
}

fn attr_f64(element: &ElementRef, name: &str) -> Option<f64> {
    element.value().attr(name)?.trim().parse().ok()
}
