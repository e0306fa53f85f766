//! Slot (capsule) outlines and bore primitives.
//!
//! A slot is given by two semicircle centers and a width. Drawings have no
//! capsule entity, so the outline is written as a closed polyline of two
//! straight sides and two half circles (bulge 1).

use crate::config::EPS;
use crate::model::{BoreRecord, Point, Primitive, Vertex};

/// Bulge of a counter-clockwise half circle (tan(π/4)).
const HALF_CIRCLE_BULGE: f64 = 1.0;

/// Synthesized slot geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotShape {
    /// Counter-clockwise outline P0 → P1 → P2 → P3.
    Capsule([Vertex; 4]),
    /// Centers coincide: the slot is a round hole.
    Hole { center: Point, radius: f64 },
}

/// Build the outline of a slot between `center1` and `center2`.
pub fn synthesize_slot(center1: Point, center2: Point, diameter: f64) -> SlotShape {
    let r = diameter / 2.0;
    let dx = center2.x - center1.x;
    let dy = center2.y - center1.y;
    let length = dx.hypot(dy);

    if length < EPS {
        return SlotShape::Hole {
            center: center1,
            radius: r,
        };
    }

    // Unit axis rotated +90° points to the left side of c1 → c2.
    let (vx, vy) = (dx / length, dy / length);
    let (nx, ny) = (-vy, vx);

    SlotShape::Capsule([
        Vertex::new(center1.x - nx * r, center1.y - ny * r, 0.0),
        Vertex::new(center2.x - nx * r, center2.y - ny * r, HALF_CIRCLE_BULGE),
        Vertex::new(center2.x + nx * r, center2.y + ny * r, 0.0),
        Vertex::new(center1.x + nx * r, center1.y + ny * r, HALF_CIRCLE_BULGE),
    ])
}

fn circle(center: Point, radius: f64) -> Option<Primitive> {
    (radius > 0.0).then_some(Primitive::Circle { center, radius })
}

/// Convert a bore into a drawing primitive.
///
/// Holes (and slots with coincident centers) become circles; a non-positive
/// radius produces nothing.
pub fn bore_primitive(bore: &BoreRecord) -> Option<Primitive> {
    match *bore {
        BoreRecord::Hole { center, .. } => circle(center, bore.radius()),
        BoreRecord::Slot {
            center1,
            center2,
            diameter,
        } => match synthesize_slot(center1, center2, diameter) {
            SlotShape::Capsule(vertices) => Some(Primitive::ClosedPolyline(vertices.to_vec())),
            SlotShape::Hole { center, radius } => circle(center, radius),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TOL: f64 = 1e-9;

    fn capsule(shape: SlotShape) -> [Vertex; 4] {
        match shape {
            SlotShape::Capsule(v) => v,
            SlotShape::Hole { .. } => panic!("expected capsule"),
        }
    }

    /// Signed area of the straight-edged polygon through the four vertices.
    fn signed_area(vertices: &[Vertex; 4]) -> f64 {
        let n = vertices.len();
        (0..n)
            .map(|i| {
                let a = vertices[i];
                let b = vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }

    // ==================== Capsule outline ====================

    #[test]
    fn test_horizontal_slot_example() {
        let shape = synthesize_slot(Point::new(100.0, 50.0), Point::new(140.0, 50.0), 20.0);
        assert_eq!(
            capsule(shape),
            [
                Vertex::new(100.0, 40.0, 0.0),
                Vertex::new(140.0, 40.0, 1.0),
                Vertex::new(140.0, 60.0, 0.0),
                Vertex::new(100.0, 60.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_capsule_dimensions_and_winding() {
        let cases = [
            (Point::new(0.0, 0.0), Point::new(0.0, 30.0), 8.0),
            (Point::new(5.0, 5.0), Point::new(-20.0, 12.0), 14.0),
            (Point::new(-3.5, 7.25), Point::new(10.0, -40.0), 0.5),
        ];

        for (c1, c2, d) in cases {
            let v = capsule(synthesize_slot(c1, c2, d));
            let length = c1.distance(&c2);

            // Straight sides run parallel to the axis with the slot length.
            assert!((v[0].position().distance(&v[1].position()) - length).abs() < TOL);
            assert!((v[2].position().distance(&v[3].position()) - length).abs() < TOL);
            // Ends span the full width.
            assert!((v[1].position().distance(&v[2].position()) - d).abs() < TOL);
            assert!((v[3].position().distance(&v[0].position()) - d).abs() < TOL);
            // Counter-clockwise.
            assert!(signed_area(&v) > 0.0);
            assert_eq!([v[0].bulge, v[1].bulge, v[2].bulge, v[3].bulge], [0.0, 1.0, 0.0, 1.0]);
        }
    }

    // ==================== Degenerate slots ====================

    #[test]
    fn test_coincident_centers_become_hole() {
        let c = Point::new(12.0, 8.0);
        let shape = synthesize_slot(c, Point::new(12.0, 8.0 + 1e-12), 10.0);
        assert_eq!(
            shape,
            SlotShape::Hole {
                center: c,
                radius: 5.0
            }
        );
    }

    #[test]
    fn test_degenerate_slot_primitive_is_circle() {
        let bore = BoreRecord::slot(3.0, 4.0, 6.0, 0.0, 0.0);
        assert_eq!(
            bore_primitive(&bore),
            Some(Primitive::Circle {
                center: Point::new(3.0, 4.0),
                radius: 3.0
            })
        );
    }

    // ==================== bore_primitive ====================

    #[test]
    fn test_hole_primitive() {
        assert_eq!(
            bore_primitive(&BoreRecord::hole(5.0, 5.0, 12.0)),
            Some(Primitive::Circle {
                center: Point::new(5.0, 5.0),
                radius: 6.0
            })
        );
    }

    #[test]
    fn test_zero_diameter_hole_is_dropped() {
        assert_eq!(bore_primitive(&BoreRecord::hole(5.0, 5.0, 0.0)), None);
        assert_eq!(bore_primitive(&BoreRecord::slot(5.0, 5.0, 0.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_slot_primitive_is_polyline() {
        let bore = BoreRecord::slot(100.0, 50.0, 20.0, 40.0, 0.0);
        match bore_primitive(&bore) {
            Some(Primitive::ClosedPolyline(vertices)) => assert_eq!(vertices.len(), 4),
            other => panic!("unexpected primitive: {:?}", other),
        }
    }
}
