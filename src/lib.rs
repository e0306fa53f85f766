//! nc1-dxf - Conversion of DSTV/NC1 plate programs to DXF drawings.
//!
//! The library splits NC1 text into tagged blocks, rebuilds the outer and
//! inner contours with their arcs (as polyline bulges), turns holes and slots
//! into circles and capsule outlines, and writes the result as a DXF R12
//! drawing with an `OUTER` and a `cutout` layer.
//!
//! # Example
//!
//! ```no_run
//! use nc1_dxf::{convert_file, convert_text};
//! use std::path::Path;
//!
//! let drawing = convert_text("AK\n0 0\n100 0\n100 50\n0 50\nEN\n");
//! assert_eq!(drawing.outer.map(|v| v.len()), Some(4));
//!
//! convert_file(Path::new("plate.nc1"), Path::new("plate.dxf"), None).unwrap();
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod generator;
pub mod license;
pub mod model;
pub mod parser;
pub mod transform;

// Re-exports for convenience
pub use batch::{collect_candidates, run_batch, BatchReport, FailureStage, FileFailure};
pub use config::BatchConfig;
pub use error::{ConvertError, ErrorCode, Result};
pub use generator::{generate_dxf, write_dxf_file, DrawingMetadata};
pub use license::{
    canonical_bytes, machine_fingerprint, FileLicenseGate, LicenseGate, LicensePayload, OpenGate,
    SignatureVerifier,
};
pub use model::{BoreRecord, CurvaturePoint, Drawing, Layer, Part, Primitive, PrimitiveSink, Vertex};
pub use parser::{parse_nc1, read_nc1_file, tokenize_blocks};
pub use transform::{assemble, assemble_drawing, build_vertices, synthesize_slot};

use std::path::Path;

/// Stem used to name parts parsed from text without a file.
const TEXT_STEM: &str = "part";

/// Convert NC1 text into a drawing.
pub fn convert_text(text: &str) -> Drawing {
    let part = parse_nc1(text, TEXT_STEM);
    assemble_drawing(&part)
}

/// Convert one NC1 file and write its drawing to `output`.
///
/// Returns the drawing that was written.
pub fn convert_file(
    input: &Path,
    output: &Path,
    metadata: Option<&DrawingMetadata>,
) -> Result<Drawing> {
    let text = read_nc1_file(input)?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| TEXT_STEM.to_string());

    let part = parse_nc1(&text, &stem);
    let drawing = assemble_drawing(&part);
    write_dxf_file(output, &drawing, metadata)?;

    tracing::debug!(
        "Converted {} -> {} ({} entities)",
        input.display(),
        output.display(),
        drawing.primitive_count()
    );
    Ok(drawing)
}
