//! Error types for NC1 to DXF conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for NC1 processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Input could not be read (-2)
    ReadFailed = -2,
    /// Output could not be written (-3)
    WriteFailed = -3,
    /// Rename to the header-derived name failed (-4)
    RenameFailed = -4,
    /// Batch root is not a directory (-5)
    NotADirectory = -5,
    /// License refused (E300)
    LicenseRefused = 300,
    /// License file unreadable or malformed (E301)
    LicenseInvalid = 301,
}

/// Main error type for the converter.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("License file missing: {path} (machine fingerprint: {fingerprint})")]
    LicenseMissing { path: PathBuf, fingerprint: String },

    #[error("Invalid license file format: {message}")]
    LicenseFormat { message: String },

    #[error("License signature is invalid")]
    LicenseSignature,

    #[error("License does not match this machine (license: {licensed}, machine: {actual})")]
    LicenseFingerprint { licensed: String, actual: String },

    #[error("License expired on {expires}")]
    LicenseExpired { expires: chrono::NaiveDate },

    #[error("License does not include feature '{feature}'")]
    LicenseFeature { feature: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConvertError::FileNotFound { .. } => ErrorCode::FileNotFound,
            ConvertError::Read { .. } => ErrorCode::ReadFailed,
            ConvertError::Write { .. } => ErrorCode::WriteFailed,
            ConvertError::Rename { .. } => ErrorCode::RenameFailed,
            ConvertError::NotADirectory { .. } => ErrorCode::NotADirectory,
            ConvertError::LicenseMissing { .. } => ErrorCode::LicenseRefused,
            ConvertError::LicenseFormat { .. } => ErrorCode::LicenseInvalid,
            ConvertError::LicenseSignature => ErrorCode::LicenseRefused,
            ConvertError::LicenseFingerprint { .. } => ErrorCode::LicenseRefused,
            ConvertError::LicenseExpired { .. } => ErrorCode::LicenseRefused,
            ConvertError::LicenseFeature { .. } => ErrorCode::LicenseRefused,
            ConvertError::Io(_) => ErrorCode::ReadFailed,
            ConvertError::Json(_) => ErrorCode::LicenseInvalid,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }

    /// Whether this error is a license refusal rather than a per-file failure.
    pub fn is_license_error(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::LicenseRefused | ErrorCode::LicenseInvalid
        )
    }
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
