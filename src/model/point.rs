//! Point types carried through the geometry pipeline.

use serde::{Deserialize, Serialize};

/// Plain 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Contour point as read from an AK/IK line.
///
/// `k` describes the edge leaving this point: zero for a straight edge,
/// otherwise an arc of radius `|k|`, counter-clockwise when positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurvaturePoint {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl CurvaturePoint {
    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Create a point with a straight outgoing edge.
    pub fn straight(x: f64, y: f64) -> Self {
        Self { x, y, k: 0.0 }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Polyline vertex with the bulge of the segment leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    /// tan(θ/4) of the signed included angle; 0 for a straight segment.
    pub bulge: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64, bulge: f64) -> Self {
        Self { x, y, bulge }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if the segment leaving this vertex is an arc.
    pub fn is_arc(&self) -> bool {
        self.bulge != 0.0
    }

    /// Signed included angle (radians) of the segment leaving this vertex.
    pub fn included_angle(&self) -> f64 {
        4.0 * self.bulge.atan()
    }
}
