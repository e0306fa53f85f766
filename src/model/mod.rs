//! Data model types for NC1 to DXF conversion.

mod bore;
mod drawing;
mod part;
mod point;

pub use bore::BoreRecord;
pub use drawing::{Drawing, Layer, Primitive, PrimitiveSink};
pub use part::{sanitize, Part, PartHeader, NOT_AVAILABLE};
pub use point::{CurvaturePoint, Point, Vertex};
