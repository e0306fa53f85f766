//! Drawing assembly: contours and bores into layered primitives.

use super::bulge::build_vertices;
use super::slot::bore_primitive;
use crate::model::{BoreRecord, CurvaturePoint, Drawing, Part, Primitive};
use tracing::debug;

/// Assemble a drawing from contour points and bores.
///
/// The outer contour goes to the outer layer; inner contours and then bores
/// go to the cutout layer in the order given. Contours with fewer than two
/// points and bores with no area are left out.
pub fn assemble(
    outer: Option<&[CurvaturePoint]>,
    inner: &[Vec<CurvaturePoint>],
    bores: &[BoreRecord],
) -> Drawing {
    let mut drawing = Drawing::new();

    if let Some(points) = outer {
        let vertices = build_vertices(points);
        if !vertices.is_empty() {
            drawing.outer = Some(vertices);
        }
    }

    for points in inner {
        let vertices = build_vertices(points);
        if !vertices.is_empty() {
            drawing.cutouts.push(Primitive::ClosedPolyline(vertices));
        }
    }

    let slots = bores.iter().filter(|b| b.is_slot()).count();
    debug!("{} hole(s), {} slot(s)", bores.len() - slots, slots);

    let before = drawing.cutouts.len();
    drawing.cutouts.extend(bores.iter().filter_map(bore_primitive));
    let skipped = bores.len() - (drawing.cutouts.len() - before);
    if skipped > 0 {
        debug!("Skipped {} bore(s) without area", skipped);
    }

    drawing
}

/// Assemble the drawing of a parsed part.
pub fn assemble_drawing(part: &Part) -> Drawing {
    assemble(part.outer.as_deref(), &part.inner, &part.bores)
}
