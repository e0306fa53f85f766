//! Output generators.

pub mod dxf;

pub use dxf::{format_float, generate_dxf, write_dxf_file, DrawingMetadata, DxfWriter};
