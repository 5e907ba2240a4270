//! Layout geometry: viewport and element boxes in document coordinates.

use serde::{Deserialize, Serialize};

/// Viewport size and scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportInfo {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    #[serde(default = "default_pixel_ratio")]
    pub device_pixel_ratio: f64,
    #[serde(default)]
    pub scroll_x: f64,
    #[serde(default)]
    pub scroll_y: f64,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

impl Default for ViewportInfo {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_pixel_ratio: default_pixel_ratio(),
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl ViewportInfo {
    /// Scroll so that `target` sits in the middle of the viewport.
    pub fn center_on(&mut self, target: &BoundingBox) {
        let (cx, cy) = target.center();
        self.scroll_x = (cx - self.width as f64 / 2.0).max(0.0);
        self.scroll_y = (cy - self.height as f64 / 2.0).max(0.0);
    }

    /// The visible region in document coordinates.
    pub fn visible_region(&self) -> BoundingBox {
        BoundingBox {
            x: self.scroll_x,
            y: self.scroll_y,
            width: self.width as f64,
            height: self.height as f64,
        }
    }
}

/// Border box of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Get the center point of this bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when the box has no area on either axis.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if this box intersects with another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}
