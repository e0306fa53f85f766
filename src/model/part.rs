//! Parsed NC1 part: header metadata plus the geometry blocks.

use super::{BoreRecord, CurvaturePoint};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Placeholder for missing name fields.
pub const NOT_AVAILABLE: &str = "NA";

/// Replace characters that are not allowed in file names.
///
/// Runs of forbidden characters collapse into a single `_`; an empty value
/// becomes `NA`.
pub fn sanitize(text: &str) -> String {
    static FORBIDDEN: OnceLock<Regex> = OnceLock::new();
    let forbidden = FORBIDDEN
        .get_or_init(|| Regex::new(r#"[\\/:*?"<>|\r\n]+"#).expect("invalid sanitize pattern"));

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    forbidden.replace_all(trimmed, "_").into_owned()
}

/// Header fields used to name the part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartHeader {
    /// Order/project identifier (first header line).
    pub id: String,
    /// Profile type code (6 for plates).
    pub type_code: String,
    /// Piece mark, or the file stem when the header has none.
    pub name: String,
    /// Assembly mark.
    pub assembly: String,
    /// Steel grade, `NA` when unknown.
    pub grade: String,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// Profile designation (e.g. `BL20`).
    pub profile: String,
    /// Plate thickness from the `B` block, trailing zeros removed.
    pub thickness: Option<String>,
}

impl PartHeader {
    /// Base file name: `{grade}-{thickness}-({name})-{qty}`.
    pub fn output_stem(&self) -> String {
        let thickness = self.thickness.as_deref().unwrap_or(NOT_AVAILABLE);
        sanitize(&format!(
            "{}-{}-({})-{}",
            sanitize(&self.grade),
            sanitize(thickness),
            sanitize(&self.name),
            self.quantity
        ))
    }

    /// File name with the given extension (including its dot).
    pub fn output_file_name(&self, target_ext: &str) -> String {
        format!("{}{}", self.output_stem(), target_ext)
    }
}

/// Everything read from one NC1 file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub header: PartHeader,
    /// Outer contour points (AK); the last AK block wins.
    pub outer: Option<Vec<CurvaturePoint>>,
    /// Non-empty inner contours (IK) in file order.
    pub inner: Vec<Vec<CurvaturePoint>>,
    /// Bores (BO) in file order.
    pub bores: Vec<BoreRecord>,
}

impl Part {
    /// Check if the part carries any geometry.
    pub fn has_geometry(&self) -> bool {
        self.outer.as_ref().is_some_and(|p| !p.is_empty())
            || !self.inner.is_empty()
            || !self.bores.is_empty()
    }
}
