//! Assembled drawing and the sink interface it is emitted through.

use super::{Point, Vertex};
use crate::config::{LAYER_CUTOUT, LAYER_OUTER};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Target layer of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Outer boundary of the part.
    Outer,
    /// Inner contours and bores.
    Cutout,
}

impl Layer {
    /// Layer name as written to the drawing.
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Outer => LAYER_OUTER,
            Layer::Cutout => LAYER_CUTOUT,
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Closed polyline; the last vertex connects back to the first.
    ClosedPolyline(Vec<Vertex>),
    /// Circle.
    Circle { center: Point, radius: f64 },
}

/// Receiver of drawing primitives.
///
/// Implementations decide the on-disk encoding; the assembler only knows
/// layers, vertices and circles.
pub trait PrimitiveSink {
    fn emit_closed_polyline(&mut self, layer: Layer, vertices: &[Vertex]) -> Result<()>;

    fn emit_circle(&mut self, layer: Layer, center: Point, radius: f64) -> Result<()>;
}

/// One converted part: the outer contour plus cutouts in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    /// Outer contour vertices, if the part has one.
    pub outer: Option<Vec<Vertex>>,
    /// Inner contours first, then bores.
    pub cutouts: Vec<Primitive>,
}

impl Drawing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if nothing would be emitted.
    pub fn is_empty(&self) -> bool {
        self.outer.is_none() && self.cutouts.is_empty()
    }

    /// Number of primitives across both layers.
    pub fn primitive_count(&self) -> usize {
        self.cutouts.len() + usize::from(self.outer.is_some())
    }

    /// All primitives with their layers, in emission order.
    pub fn primitives(&self) -> impl Iterator<Item = (Layer, Primitive)> + '_ {
        let outer = self
            .outer
            .iter()
            .map(|v| (Layer::Outer, Primitive::ClosedPolyline(v.clone())));
        let cutouts = self.cutouts.iter().map(|p| (Layer::Cutout, p.clone()));
        outer.chain(cutouts)
    }

    /// Forward every primitive to a sink, outer layer first.
    pub fn emit<S: PrimitiveSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        if let Some(vertices) = &self.outer {
            sink.emit_closed_polyline(Layer::Outer, vertices)?;
        }

        for primitive in &self.cutouts {
            match primitive {
                Primitive::ClosedPolyline(vertices) => {
                    sink.emit_closed_polyline(Layer::Cutout, vertices)?
                }
                Primitive::Circle { center, radius } => {
                    sink.emit_circle(Layer::Cutout, *center, *radius)?
                }
            }
        }

        Ok(())
    }
}
