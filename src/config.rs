//! Configuration constants and settings for the converter.

/// Curvature and chord lengths below this are treated as zero.
pub const EPS: f64 = 1e-9;

/// Layer receiving the outer contour (AK).
pub const LAYER_OUTER: &str = "OUTER";

/// Layer receiving inner contours (IK) and bores (BO).
pub const LAYER_CUTOUT: &str = "cutout";

/// AutoCAD color index for the outer layer (white/black).
pub const COLOR_OUTER: i32 = 7;

/// AutoCAD color index for the cutout layer (cyan).
pub const COLOR_CUTOUT: i32 = 4;

/// Program identity written into generated drawings.
pub const PROGRAM_NAME: &str = "nctodxf";
pub const PROGRAM_OWNER: &str = "PRIMES sp. z o.o.";
pub const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extension given to renamed NC files.
pub const DEFAULT_TARGET_EXT: &str = ".nc1";

/// Input extensions picked up by a batch scan (compared case-insensitively).
pub const INPUT_EXTENSIONS: [&str; 3] = ["nc", "nc1", "dstv"];

/// License file name, looked up next to the executable.
pub const LICENSE_FILE_NAME: &str = "program.lic";

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Extension for renamed files, including the leading dot.
    pub target_ext: String,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Rename inputs after their header metadata.
    pub rename: bool,
    /// Write a DXF next to each input.
    pub write_dxf: bool,
    /// Accepted input extensions, without the dot.
    pub extensions: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            target_ext: DEFAULT_TARGET_EXT.to_string(),
            recursive: false,
            rename: true,
            write_dxf: true,
            extensions: INPUT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl BatchConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recursive scan flag.
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set the target extension; a missing leading dot is added.
    pub fn with_target_ext(mut self, ext: &str) -> Self {
        let ext = ext.trim();
        self.target_ext = if ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{}", ext)
        };
        self
    }

    /// Check whether a file extension is accepted as input.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::EPS;

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < EPS
    }
}
