//! Bulge computation for AK/IK contours.
//!
//! Each contour point carries the signed radius `k` of the edge leaving it.
//! For an arc of radius `r` over a chord `d` the included angle is
//! `θ = 2·asin(d / 2r)` and the polyline bulge is `tan(θ/4)`, positive for
//! counter-clockwise arcs.

use crate::config::float_cmp::approx_zero;
use crate::model::{CurvaturePoint, Vertex};

/// Bulge of an arc with radius `radius` spanning a chord of length `chord`.
///
/// The arcsine argument is clamped to [-1, 1], so a chord slightly longer
/// than the diameter gives a half circle. A radius below `EPS` gives 0.
pub fn bulge_from_chord(chord: f64, radius: f64, ccw: bool) -> f64 {
    if radius < crate::config::EPS {
        return 0.0;
    }

    let ratio = (chord / (2.0 * radius)).clamp(-1.0, 1.0);
    let theta = 2.0 * ratio.asin();
    let bulge = (theta / 4.0).tan();

    if ccw {
        bulge
    } else {
        -bulge
    }
}

/// Bulge of the edge from `from` to `to`, using the curvature of `from`.
pub fn edge_bulge(from: &CurvaturePoint, to: &CurvaturePoint) -> f64 {
    if approx_zero(from.k) {
        return 0.0;
    }

    let chord = from.position().distance(&to.position());
    bulge_from_chord(chord, from.k.abs(), from.k > 0.0)
}

/// Convert a closed contour into polyline vertices.
///
/// The last point connects back to the first. Coordinates are copied as-is;
/// contours with fewer than two points give no vertices.
pub fn build_vertices(points: &[CurvaturePoint]) -> Vec<Vertex> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let next = &points[(i + 1) % n];
            Vertex::new(point.x, point.y, edge_bulge(point, next))
        })
        .collect()
}
