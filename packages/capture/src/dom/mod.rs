//! Rendered-page snapshot model.
//!
//! The engine does not run against a live browser DOM. The host (a
//! content script, a headless browser, a test harness) serializes the
//! rendered page into a [`PageSnapshot`]: a flat node arena with tag,
//! attributes, direct text, and layout rectangle per node. All locator
//! and extractor queries run read-only against this snapshot; the only
//! mutation path is the [`crate::traits::Expander`] collaborator, which
//! rewrites node text when an expansion control is activated.

pub mod html;
mod node;
mod page;

pub use html::snapshot_from_html;
pub use node::{NodeData, NodeId};
pub use page::{PageSnapshot, Selection};

use serde::{Deserialize, Serialize};

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A hint point is usable only when both coordinates are finite and
    /// non-negative.
    pub fn is_valid_hint(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x >= 0.0 && self.y >= 0.0
    }
}

/// An axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.bottom()
    }

    /// Does this rectangle's vertical range contain the given Y?
    pub fn vertical_range_contains(&self, y: f64) -> bool {
        y >= self.top() && y <= self.bottom()
    }
}

/// The visible viewport at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Is the rectangle fully inside the viewport?
    pub fn fully_contains(&self, rect: &Rect) -> bool {
        rect.x >= 0.0
            && rect.y >= 0.0
            && rect.x + rect.width <= self.width
            && rect.bottom() <= self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_validity() {
        assert!(Point::new(10.0, 20.0).is_valid_hint());
        assert!(!Point::new(-1.0, 20.0).is_valid_hint());
        assert!(!Point::new(f64::NAN, 20.0).is_valid_hint());
        assert!(!Point::new(10.0, f64::INFINITY).is_valid_hint());
    }

    #[test]
    fn test_rect_containment() {
        let r = Rect::new(0.0, 100.0, 500.0, 200.0);
        assert!(r.contains(Point::new(250.0, 150.0)));
        assert!(!r.contains(Point::new(250.0, 50.0)));
        assert!(r.vertical_range_contains(300.0));
        assert!(!r.vertical_range_contains(301.0));
    }

    #[test]
    fn test_viewport_containment() {
        let vp = Viewport::new(1000.0, 800.0);
        assert!(vp.fully_contains(&Rect::new(0.0, 0.0, 500.0, 400.0)));
        assert!(!vp.fully_contains(&Rect::new(0.0, 600.0, 500.0, 400.0)));
    }
}
