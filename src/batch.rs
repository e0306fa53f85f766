//! Batch conversion of a directory of NC files.
//!
//! Each file is renamed after its header metadata and gets a DXF drawing
//! written next to it. Failures are recorded per file and never stop the run.

use crate::config::BatchConfig;
use crate::error::{ConvertError, Result};
use crate::generator::{write_dxf_file, DrawingMetadata};
use crate::license::{LicenseGate, LicensePayload};
use crate::model::Part;
use crate::parser::{parse_nc1, read_nc1_file};
use crate::transform::assemble_drawing;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Step at which a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Read,
    Rename,
    Dxf,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureStage::Read => "read",
            FailureStage::Rename => "rename",
            FailureStage::Dxf => "dxf",
        };
        f.write_str(name)
    }
}

/// A file that could not be fully processed.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub stage: FailureStage,
    pub message: String,
}

/// Counts accumulated over a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Candidate files found.
    pub scanned: usize,
    /// Files moved to a new name.
    pub renamed: usize,
    /// Files whose name was already correct.
    pub unchanged: usize,
    /// DXF files written.
    pub converted: usize,
    pub failures: Vec<FileFailure>,
    /// Final path of each processed input, in processing order.
    pub outputs: Vec<PathBuf>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of failures at the given stage.
    pub fn failed_at(&self, stage: FailureStage) -> usize {
        self.failures.iter().filter(|f| f.stage == stage).count()
    }

    fn fail(&mut self, path: &Path, stage: FailureStage, message: impl Into<String>) {
        let message = message.into();
        warn!("{}: {} failed ({})", display_name(path), stage, message);
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            stage,
            message,
        });
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Find input files under `root`, sorted by path.
pub fn collect_candidates(root: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ConvertError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let accepted = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| config.accepts_extension(ext));
        if accepted {
            candidates.push(entry.into_path());
        }
    }

    candidates.sort();
    Ok(candidates)
}

/// Per-run state guarding destination paths.
struct BatchRun<'a> {
    config: &'a BatchConfig,
    license: &'a LicensePayload,
    report: BatchReport,
    /// Inputs not processed yet; never overwritten by a rename.
    pending: HashSet<PathBuf>,
    /// Input paths taken by earlier files of this run.
    claimed: HashSet<PathBuf>,
    /// Drawings written by this run.
    drawings: HashSet<PathBuf>,
}

impl<'a> BatchRun<'a> {
    fn new(config: &'a BatchConfig, license: &'a LicensePayload, candidates: &[PathBuf]) -> Self {
        Self {
            config,
            license,
            report: BatchReport {
                scanned: candidates.len(),
                ..Default::default()
            },
            pending: candidates.iter().cloned().collect(),
            claimed: HashSet::new(),
            drawings: HashSet::new(),
        }
    }

    fn process(&mut self, path: &Path) {
        // The input keeps its name until a rename succeeds, even if it cannot be read.
        self.pending.remove(path);
        self.claimed.insert(path.to_path_buf());

        let text = match read_nc1_file(path) {
            Ok(text) => text,
            Err(e) => {
                self.report.fail(path, FailureStage::Read, e.to_string());
                return;
            }
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let part = parse_nc1(&text, &stem);

        let final_path = if self.config.rename {
            self.rename(path, &part)
        } else {
            path.to_path_buf()
        };
        if final_path != path {
            self.claimed.remove(path);
            self.claimed.insert(final_path.clone());
        }

        if self.config.write_dxf {
            self.write_drawing(&final_path, &part);
        }
        self.report.outputs.push(final_path);
    }

    /// Rename to the header-derived name; returns the path the file ends up at.
    fn rename(&mut self, path: &Path, part: &Part) -> PathBuf {
        let target_name = part.header.output_file_name(&self.config.target_ext);
        let target = path.with_file_name(&target_name);
        let current_name = display_name(path);

        if current_name == target_name {
            info!("= {} (already named)", current_name);
            self.report.unchanged += 1;
            return path.to_path_buf();
        }

        if self.claimed.contains(&target) || self.pending.contains(&target) {
            self.report.fail(
                path,
                FailureStage::Rename,
                format!("{} is already used by another input", target_name),
            );
            return path.to_path_buf();
        }

        // A case-only change may point at this very file.
        let case_only = current_name.eq_ignore_ascii_case(&target_name);
        if target.exists() && !case_only {
            if let Err(e) = std::fs::remove_file(&target) {
                self.report.fail(
                    path,
                    FailureStage::Rename,
                    format!("cannot replace {}: {}", target_name, e),
                );
                return path.to_path_buf();
            }
        }

        match std::fs::rename(path, &target) {
            Ok(()) => {
                info!("{} -> {}", current_name, target_name);
                self.report.renamed += 1;
                target
            }
            Err(source) => {
                let err = ConvertError::Rename {
                    from: path.to_path_buf(),
                    to: target,
                    source,
                };
                self.report
                    .fail(path, FailureStage::Rename, err.to_string());
                path.to_path_buf()
            }
        }
    }

    fn write_drawing(&mut self, nc_path: &Path, part: &Part) {
        let dxf_path = nc_path.with_extension("dxf");
        if !self.drawings.insert(dxf_path.clone()) {
            self.report.fail(
                nc_path,
                FailureStage::Dxf,
                format!("{} was already written by another input", display_name(&dxf_path)),
            );
            return;
        }

        let drawing = assemble_drawing(part);
        if !part.has_geometry() {
            debug!("{}: no geometry blocks", display_name(nc_path));
        } else if drawing.outer.is_none() {
            debug!("{}: no outer contour", display_name(nc_path));
        }
        let metadata = DrawingMetadata::new(self.license);

        match write_dxf_file(&dxf_path, &drawing, Some(&metadata)) {
            Ok(()) => {
                info!(
                    "  DXF: {} ({} entities)",
                    display_name(&dxf_path),
                    drawing.primitive_count()
                );
                self.report.converted += 1;
            }
            Err(e) => self.report.fail(nc_path, FailureStage::Dxf, e.to_string()),
        }
    }
}

/// Rename and convert every NC file under `root`.
///
/// The license is checked first; a refusal is returned as an error and no
/// file is touched. After that, per-file problems are collected in the report.
pub fn run_batch(root: &Path, config: &BatchConfig, gate: &dyn LicenseGate) -> Result<BatchReport> {
    let license = gate.authorize()?;
    info!(
        "License: {} ({})",
        if license.name.is_empty() { "-" } else { license.name.as_str() },
        license.period()
    );

    let candidates = collect_candidates(root, config)?;
    info!("Found {} file(s) in {}", candidates.len(), root.display());

    let mut run = BatchRun::new(config, &license, &candidates);

    for path in &candidates {
        run.process(path);
    }

    let report = run.report;
    info!(
        "Done. Renamed: {}, unchanged: {}, DXF written: {}, failed: {}",
        report.renamed,
        report.unchanged,
        report.converted,
        report.failed()
    );
    Ok(report)
}
