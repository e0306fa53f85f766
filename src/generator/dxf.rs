//! DXF (Drawing Exchange Format) writer for converted parts.
//!
//! Writes ASCII DXF R12 (AC1009) with two layers, `OUTER` and `cutout`.
//! Closed polylines become `POLYLINE`/`VERTEX`/`SEQEND` sequences with the
//! bulge in group 42; circles become `CIRCLE` entities.

use crate::config::{
    COLOR_CUTOUT, COLOR_OUTER, LAYER_CUTOUT, LAYER_OUTER, PROGRAM_NAME, PROGRAM_OWNER,
    PROGRAM_VERSION,
};
use crate::error::{ConvertError, Result};
use crate::license::LicensePayload;
use crate::model::{Drawing, Layer, Point, PrimitiveSink, Vertex};
use std::fmt::Write;
use std::path::Path;

/// Provenance written at the top of each generated drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingMetadata {
    pub program: String,
    pub owner: String,
    pub version: String,
    pub license_to: String,
    pub license_fp: String,
    /// Expiry date, or `unlimited`.
    pub license_expires: String,
    /// UTC timestamp, ISO 8601.
    pub generated: String,
}

impl DrawingMetadata {
    /// Build metadata for a license, stamped with the current time.
    pub fn new(license: &LicensePayload) -> Self {
        let generated = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        Self::with_timestamp(license, generated)
    }

    /// Build metadata with an explicit timestamp.
    pub fn with_timestamp(license: &LicensePayload, generated: impl Into<String>) -> Self {
        Self {
            program: PROGRAM_NAME.to_string(),
            owner: PROGRAM_OWNER.to_string(),
            version: PROGRAM_VERSION.to_string(),
            license_to: license.name.clone(),
            license_fp: license.fp.clone(),
            license_expires: license
                .expires
                .clone()
                .unwrap_or_else(|| "unlimited".to_string()),
            generated: generated.into(),
        }
    }

    fn entries(&self) -> [(&'static str, String); 8] {
        [
            (
                "last_saved_by",
                format!("{} / {}", self.owner, self.program),
            ),
            ("program", self.program.clone()),
            ("owner", self.owner.clone()),
            ("version", self.version.clone()),
            ("license_to", self.license_to.clone()),
            ("license_fp", self.license_fp.clone()),
            ("license_expires", self.license_expires.clone()),
            ("generated", self.generated.clone()),
        ]
    }
}

/// DXF writer for converted parts.
pub struct DxfWriter {
    output: String,
}

impl Default for DxfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DxfWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Get the generated DXF content.
    pub fn into_string(self) -> String {
        self.output
    }

    /// Write a DXF group code and value.
    fn write_group(&mut self, code: i32, value: &str) {
        // Group codes are right-aligned in three columns.
        let _ = writeln!(self.output, "{:>3}", code);
        let _ = writeln!(self.output, "{}", value);
    }

    /// Write a DXF group code with integer value (right-aligned in 6 chars).
    fn write_group_int(&mut self, code: i32, value: i32) {
        let _ = writeln!(self.output, "{:>3}", code);
        let _ = writeln!(self.output, "{:>6}", value);
    }

    /// Write a coordinate or length.
    ///
    /// Uses the shortest representation that reads back to the same `f64`, so
    /// input coordinates survive the round trip bit for bit.
    fn write_group_float(&mut self, code: i32, value: f64) {
        self.write_group(code, &format_float(value));
    }

    /// Write provenance as comment groups.
    pub fn write_metadata(&mut self, metadata: &DrawingMetadata) {
        for (key, value) in metadata.entries() {
            // A group value must stay on one line.
            let value = value.replace(|c: char| c == '\r' || c == '\n', " ");
            self.write_group(999, &format!("{}={}", key, value));
        }
    }

    /// Write the DXF header section.
    pub fn write_header(&mut self) {
        self.write_group(0, "SECTION");
        self.write_group(2, "HEADER");

        self.write_group(9, "$ACADVER");
        self.write_group(1, "AC1009");

        self.write_group(0, "ENDSEC");
    }

    /// Write the tables section with layer definitions.
    pub fn write_tables(&mut self, layers: &[(&str, i32)]) {
        self.write_group(0, "SECTION");
        self.write_group(2, "TABLES");

        // Line type table
        self.write_group(0, "TABLE");
        self.write_group(2, "LTYPE");
        self.write_group_int(70, 1);

        self.write_group(0, "LTYPE");
        self.write_group(2, "CONTINUOUS");
        self.write_group_int(70, 64);
        self.write_group(3, "Solid line");
        self.write_group_int(72, 65);
        self.write_group_int(73, 0);
        self.write_group(40, "0.0");

        self.write_group(0, "ENDTAB");

        // Layer table
        self.write_group(0, "TABLE");
        self.write_group(2, "LAYER");
        self.write_group_int(70, layers.len() as i32);

        for (name, color) in layers {
            self.write_layer(name, *color);
        }

        self.write_group(0, "ENDTAB");
        self.write_group(0, "ENDSEC");

        // Blocks section (empty)
        self.write_group(0, "SECTION");
        self.write_group(2, "BLOCKS");
        self.write_group(0, "ENDSEC");
    }

    /// Write a layer definition.
    fn write_layer(&mut self, name: &str, color: i32) {
        self.write_group(0, "LAYER");
        self.write_group(2, name);
        self.write_group_int(70, 0);
        self.write_group_int(62, color);
        self.write_group(6, "CONTINUOUS");
    }

    /// Begin the entities section.
    pub fn begin_entities(&mut self) {
        self.write_group(0, "SECTION");
        self.write_group(2, "ENTITIES");
    }

    /// End the entities section and write EOF.
    pub fn end_entities(&mut self) {
        self.write_group(0, "ENDSEC");
        self.write_group(0, "EOF");
    }

    /// Write a closed POLYLINE with its vertices.
    pub fn write_polyline_entity(&mut self, layer: &str, vertices: &[Vertex]) {
        self.write_group(0, "POLYLINE");
        self.write_group(8, layer);
        self.write_group_int(66, 1);
        self.write_group_float(10, 0.0);
        self.write_group_float(20, 0.0);
        self.write_group_float(30, 0.0);
        // 1 = closed
        self.write_group_int(70, 1);

        for vertex in vertices {
            self.write_group(0, "VERTEX");
            self.write_group(8, layer);
            self.write_group_float(10, vertex.x);
            self.write_group_float(20, vertex.y);
            self.write_group_float(30, 0.0);
            if vertex.is_arc() {
                self.write_group_float(42, vertex.bulge);
            }
        }

        self.write_group(0, "SEQEND");
        self.write_group(8, layer);
    }

    /// Write a CIRCLE entity.
    pub fn write_circle_entity(&mut self, layer: &str, cx: f64, cy: f64, radius: f64) {
        self.write_group(0, "CIRCLE");
        self.write_group(8, layer);
        self.write_group_float(10, cx);
        self.write_group_float(20, cy);
        self.write_group_float(30, 0.0);
        self.write_group_float(40, radius);
    }
}

impl PrimitiveSink for DxfWriter {
    fn emit_closed_polyline(&mut self, layer: Layer, vertices: &[Vertex]) -> Result<()> {
        self.write_polyline_entity(layer.name(), vertices);
        Ok(())
    }

    fn emit_circle(&mut self, layer: Layer, center: Point, radius: f64) -> Result<()> {
        self.write_circle_entity(layer.name(), center.x, center.y, radius);
        Ok(())
    }
}

/// Format a float so that parsing it back yields the same value.
pub fn format_float(value: f64) -> String {
    let text = value.to_string();
    if text.contains(|c: char| c == '.' || c == 'e') || !value.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Generate a complete DXF document for a drawing.
pub fn generate_dxf(drawing: &Drawing, metadata: Option<&DrawingMetadata>) -> Result<String> {
    let mut dxf = DxfWriter::new();

    if let Some(metadata) = metadata {
        dxf.write_metadata(metadata);
    }

    dxf.write_header();
    dxf.write_tables(&[(LAYER_OUTER, COLOR_OUTER), (LAYER_CUTOUT, COLOR_CUTOUT)]);
    dxf.begin_entities();
    drawing.emit(&mut dxf)?;
    dxf.end_entities();

    Ok(dxf.into_string())
}

/// Write a drawing to a DXF file, replacing any existing file.
pub fn write_dxf_file(
    path: &Path,
    drawing: &Drawing,
    metadata: Option<&DrawingMetadata>,
) -> Result<()> {
    let content = generate_dxf(drawing, metadata)?;
    std::fs::write(path, content).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}
