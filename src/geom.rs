//! 2D geometry primitives shared by the collision code
//!
//! Everything is axis-aligned; the games never rotate anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, stored as min corner + size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Point-in-rect test (inclusive of the min edge, exclusive of max)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max().x && p.y >= self.min.y && p.y < self.max().y
    }
}

/// Circle, used for balls and the obstacle-dodging bird
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// Axis-aligned rect-rect overlap (separating-axis test)
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max().x && b.min.x < a.max().x && a.min.y < b.max().y && b.min.y < a.max().y
}

/// Circle-rect overlap via the closest-point distance test
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.min, rect.max());
    (center - closest).length_squared() < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let r = Rect::from_xywh(10.0, 20.0, 30.0, 40.0);
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(25.0, 45.0)));
        assert!(!r.contains(Vec2::new(40.0, 45.0)));
        assert!(!r.contains(Vec2::new(5.0, 25.0)));
    }

    #[test]
    fn test_rects_overlap() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(5.0, 5.0, 10.0, 10.0);
        let c = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);
        assert!(rects_overlap(&a, &b));
        // Touching edges do not overlap
        assert!(!rects_overlap(&a, &c));
    }

    #[test]
    fn test_circle_rect_overlap() {
        let r = Rect::from_xywh(100.0, 100.0, 50.0, 20.0);

        // Center inside
        assert!(circle_rect_overlap(Vec2::new(120.0, 110.0), 5.0, &r));
        // Near an edge, overlapping
        assert!(circle_rect_overlap(Vec2::new(96.0, 110.0), 5.0, &r));
        // Near a corner the axis-aligned gap matters, not the bounding box
        assert!(!circle_rect_overlap(Vec2::new(96.0, 96.0), 5.0, &r));
        // Clearly outside
        assert!(!circle_rect_overlap(Vec2::new(0.0, 0.0), 5.0, &r));
    }
}
