//! Offline license checks.
//!
//! A license file (`program.lic`) is a JSON document:
//!
//! ```json
//! {"payload": {"fp": "LIN|…", "name": "…", "expires": "2027-12-31", "features": ["DXF"]},
//!  "sig": "<base64 signature>"}
//! ```
//!
//! The signature covers [`canonical_bytes`] of the payload. Checking it is
//! left to a [`SignatureVerifier`] supplied by the caller.

mod fingerprint;

pub use fingerprint::machine_fingerprint;

use crate::config::LICENSE_FILE_NAME;
use crate::error::{ConvertError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Date format of the `expires` field.
const EXPIRES_FORMAT: &str = "%Y-%m-%d";

/// License terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicensePayload {
    /// Machine fingerprint the license is bound to.
    #[serde(default)]
    pub fp: String,
    /// Licensee.
    #[serde(default)]
    pub name: String,
    /// Last valid day (`YYYY-MM-DD`), or none for unlimited.
    #[serde(default)]
    pub expires: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl LicensePayload {
    /// Payload used when no license is enforced.
    pub fn unlicensed() -> Self {
        Self {
            name: "unlicensed".to_string(),
            ..Default::default()
        }
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f.eq_ignore_ascii_case(feature))
    }

    /// Parsed expiry date. Unparseable dates yield `None`.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        let raw = self.expires.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(raw, EXPIRES_FORMAT) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("Ignoring unparseable license expiry '{}': {}", raw, e);
                None
            }
        }
    }

    /// Human-readable license period.
    pub fn period(&self) -> String {
        match self.expires.as_deref().map(str::trim) {
            Some(exp) if !exp.is_empty() => format!("until {}", exp),
            _ => "unlimited".to_string(),
        }
    }
}

/// On-disk license file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseFile {
    /// Signed payload, kept as raw JSON so the signed bytes are reproduced exactly.
    pub payload: serde_json::Value,
    pub sig: String,
}

impl LicenseFile {
    /// Parse a license file's text.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ConvertError::LicenseFormat {
            message: e.to_string(),
        })
    }

    /// Decode the payload into license terms.
    pub fn terms(&self) -> Result<LicensePayload> {
        serde_json::from_value(self.payload.clone()).map_err(|e| ConvertError::LicenseFormat {
            message: e.to_string(),
        })
    }

    /// Bytes the signature is computed over.
    pub fn signed_bytes(&self) -> Result<Vec<u8>> {
        canonical_bytes(&self.payload)
    }
}

/// Serialize a payload as compact JSON with sorted keys and ASCII-only output.
///
/// Non-ASCII characters (and DEL) are written as `\uXXXX` escapes, with
/// surrogate pairs above the basic plane.
pub fn canonical_bytes(payload: &serde_json::Value) -> Result<Vec<u8>> {
    // serde_json's default map is ordered by key.
    let compact = serde_json::to_string(payload)?;

    let mut out = String::with_capacity(compact.len());
    for c in compact.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    Ok(out.into_bytes())
}

/// Checks a license signature.
pub trait SignatureVerifier {
    /// Return true when `signature` (base64 text from the file) is valid for `message`.
    fn verify(&self, message: &[u8], signature: &str) -> bool;
}

impl<F> SignatureVerifier for F
where
    F: Fn(&[u8], &str) -> bool,
{
    fn verify(&self, message: &[u8], signature: &str) -> bool {
        self(message, signature)
    }
}

/// Decides whether the program may run.
pub trait LicenseGate {
    /// Return the license terms, or the reason for refusal.
    fn authorize(&self) -> Result<LicensePayload>;
}

/// Gate that always admits, with an "unlicensed" payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenGate;

impl LicenseGate for OpenGate {
    fn authorize(&self) -> Result<LicensePayload> {
        Ok(LicensePayload::unlicensed())
    }
}

/// Gate backed by a signed license file.
pub struct FileLicenseGate<V> {
    path: PathBuf,
    verifier: V,
    fingerprint: String,
    required_feature: Option<String>,
    today: Option<NaiveDate>,
}

impl<V: SignatureVerifier> FileLicenseGate<V> {
    /// Gate reading `path`, bound to this machine's fingerprint.
    pub fn new(path: impl Into<PathBuf>, verifier: V) -> Self {
        Self {
            path: path.into(),
            verifier,
            fingerprint: machine_fingerprint(),
            required_feature: None,
            today: None,
        }
    }

    /// Gate reading `program.lic` from the directory of the running executable.
    pub fn beside_executable(verifier: V) -> Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::new(dir.join(LICENSE_FILE_NAME), verifier))
    }

    /// Compare against a given fingerprint instead of this machine's.
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = fingerprint.into().to_uppercase();
        self
    }

    /// Require the license to grant `feature`.
    pub fn with_required_feature(mut self, feature: impl Into<String>) -> Self {
        self.required_feature = Some(feature.into());
        self
    }

    /// Evaluate expiry against a fixed date instead of the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<LicenseFile> {
        if !self.path.exists() {
            return Err(ConvertError::LicenseMissing {
                path: self.path.clone(),
                fingerprint: self.fingerprint.clone(),
            });
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| ConvertError::LicenseFormat {
            message: e.to_string(),
        })?;
        LicenseFile::parse(&text)
    }
}

impl<V: SignatureVerifier> LicenseGate for FileLicenseGate<V> {
    fn authorize(&self) -> Result<LicensePayload> {
        let file = self.load()?;
        let message = file.signed_bytes()?;
        if !self.verifier.verify(&message, &file.sig) {
            return Err(ConvertError::LicenseSignature);
        }

        let terms = file.terms()?;

        if terms.fp.to_uppercase() != self.fingerprint {
            return Err(ConvertError::LicenseFingerprint {
                licensed: terms.fp.clone(),
                actual: self.fingerprint.clone(),
            });
        }

        if let Some(expires) = terms.expiry_date() {
            let today = self
                .today
                .unwrap_or_else(|| chrono::Local::now().date_naive());
            if today > expires {
                return Err(ConvertError::LicenseExpired { expires });
            }
        }

        if let Some(feature) = &self.required_feature {
            if !terms.has_feature(feature) {
                return Err(ConvertError::LicenseFeature {
                    feature: feature.clone(),
                });
            }
        }

        debug!("License accepted for '{}' ({})", terms.name, terms.period());
        Ok(terms)
    }
}
