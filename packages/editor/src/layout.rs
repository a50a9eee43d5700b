//! # Layout index
//!
//! Rendered geometry, pushed into the core by the external renderer
//! after layout. The drop predictor reads child midpoints from here;
//! the core never measures anything itself.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pointer position in editor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Rendered bounding box of one element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Vertical midpoint, the quantity the drop predictor compares
    /// against the pointer.
    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Element id → rendered bounds. Stale entries are harmless: an id with
/// no geometry just predicts end-of-list insertion.
#[derive(Debug, Clone, Default)]
pub struct LayoutIndex {
    rects: HashMap<String, Rect>,
}

impl LayoutIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: impl Into<String>, rect: Rect) {
        self.rects.insert(id.into(), rect);
    }

    pub fn get(&self, id: &str) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    pub fn remove(&mut self, id: &str) {
        self.rects.remove(id);
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_y() {
        let rect = Rect::new(0.0, 100.0, 50.0, 100.0);
        assert_eq!(rect.mid_y(), 150.0);
    }

    #[test]
    fn test_layout_index_lookup() {
        let mut layout = LayoutIndex::new();
        layout.set("b-1", Rect::new(0.0, 0.0, 10.0, 100.0));

        assert_eq!(layout.get("b-1").unwrap().mid_y(), 50.0);
        assert!(layout.get("b-2").is_none());

        layout.remove("b-1");
        assert!(layout.get("b-1").is_none());
    }

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
    }
}
