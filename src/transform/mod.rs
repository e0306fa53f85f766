//! Geometry reconstruction from NC1 records.

mod assemble;
mod bulge;
mod slot;

pub use assemble::{assemble, assemble_drawing};
pub use bulge::{build_vertices, bulge_from_chord, edge_bulge};
pub use slot::{bore_primitive, synthesize_slot, SlotShape};
