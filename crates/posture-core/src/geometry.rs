//! Geometric utilities for image-space keypoint computations.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// 2D position in image coordinates (pixels, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::from_nalgebra(nalgebra::center(&self.to_nalgebra(), &other.to_nalgebra()))
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        nalgebra::distance(&self.to_nalgebra(), &other.to_nalgebra())
    }

    /// Signed horizontal offset `self.x - other.x`
    pub fn horizontal_offset(&self, other: &Self) -> f64 {
        self.x - other.x
    }

    /// Absolute vertical distance between the two positions
    pub fn vertical_gap(&self, other: &Self) -> f64 {
        (self.y - other.y).abs()
    }

    /// Rescale by independent x/y factors (e.g. detector frame to canvas)
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        let v = self.to_nalgebra().coords.component_mul(&Vector2::new(sx, sy));
        Self::new(v.x, v.y)
    }
}

/// Straight segment between two positions, used for skeleton overlays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Position2D,
    pub to: Position2D,
}

impl Segment {
    pub fn new(from: Position2D, to: Position2D) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f64 {
        self.from.distance_to(&self.to)
    }

    /// Map a segment from a `source` frame size onto a `target` frame size
    pub fn rescale(&self, source: (f64, f64), target: (f64, f64)) -> Self {
        let sx = if source.0 > 0.0 { target.0 / source.0 } else { 1.0 };
        let sy = if source.1 > 0.0 { target.1 / source.1 } else { 1.0 };
        Self::new(self.from.scaled(sx, sy), self.to.scaled(sx, sy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        let a = Position2D::new(100.0, 40.0);
        let b = Position2D::new(200.0, 60.0);
        let m = a.midpoint(&b);
        assert!((m.x - 150.0).abs() < 1e-10);
        assert!((m.y - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_offsets() {
        let a = Position2D::new(10.0, 5.0);
        let b = Position2D::new(35.0, 12.0);
        assert!((a.horizontal_offset(&b) + 25.0).abs() < 1e-10);
        assert!((a.vertical_gap(&b) - 7.0).abs() < 1e-10);
        assert!((a.distance_to(&Position2D::new(13.0, 9.0)) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_segment_rescale() {
        let seg = Segment::new(Position2D::new(320.0, 240.0), Position2D::new(640.0, 480.0));
        let scaled = seg.rescale((640.0, 480.0), (1280.0, 960.0));
        assert_eq!(scaled.from, Position2D::new(640.0, 480.0));
        assert_eq!(scaled.to, Position2D::new(1280.0, 960.0));

        // Degenerate source size leaves coordinates untouched
        let same = seg.rescale((0.0, 0.0), (100.0, 100.0));
        assert_eq!(same, seg);
    }
}
