//! nc1-convert - CLI tool to rename DSTV/NC1 files and convert them to DXF.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nc1_dxf::config::{PROGRAM_NAME, PROGRAM_OWNER};
use nc1_dxf::{
    convert_file, machine_fingerprint, parse_nc1, read_nc1_file, run_batch, BatchConfig,
    DrawingMetadata, LicenseGate, OpenGate,
};

/// Rename DSTV/NC1 plate files after their header and write DXF drawings.
#[derive(Parser, Debug)]
#[command(name = "nc1-convert")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory with NC/NC1/DSTV files
    #[arg(
        required_unless_present_any = ["input", "fingerprint"],
        conflicts_with = "input"
    )]
    dir: Option<PathBuf>,

    /// Convert a single file instead of a directory
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output DXF path (single file mode)
    #[arg(short, long, requires = "input")]
    output: Option<PathBuf>,

    /// Scan subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Keep file names
    #[arg(long)]
    no_rename: bool,

    /// Skip DXF output
    #[arg(long)]
    no_dxf: bool,

    /// Extension for renamed files
    #[arg(long, default_value = nc1_dxf::config::DEFAULT_TARGET_EXT)]
    target_ext: String,

    /// Output the parsed part as JSON (single file mode)
    #[arg(long, requires = "input")]
    debug: bool,

    /// Print this machine's license fingerprint and exit
    #[arg(long)]
    fingerprint: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if args.fingerprint {
        println!("{}", machine_fingerprint());
        return Ok(());
    }

    info!("{} - {}", PROGRAM_NAME, PROGRAM_OWNER);

    let gate = OpenGate;

    if let Some(input) = &args.input {
        // Debug output
        if args.debug {
            let text = read_nc1_file(input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let part = parse_nc1(&text, &stem);
            println!("{}", serde_json::to_string_pretty(&part)?);
            return Ok(());
        }

        let license = gate.authorize().context("License check failed")?;
        let metadata = DrawingMetadata::new(&license);

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| input.with_extension("dxf"));

        let drawing = convert_file(input, &output, Some(&metadata))
            .with_context(|| format!("Failed to convert {}", input.display()))?;

        info!(
            "Generated: {} ({} entities)",
            output.display(),
            drawing.primitive_count()
        );
        return Ok(());
    }

    let Some(dir) = &args.dir else {
        anyhow::bail!("No input directory given");
    };

    let mut config = BatchConfig::new()
        .with_recursive(args.recursive)
        .with_target_ext(&args.target_ext);
    config.rename = !args.no_rename;
    config.write_dxf = !args.no_dxf;

    let report = run_batch(dir, &config, &gate)
        .with_context(|| format!("Failed to process {}", dir.display()))?;

    if report.has_failures() {
        for failure in &report.failures {
            error!(
                "{} ({}): {}",
                failure.path.display(),
                failure.stage,
                failure.message
            );
        }
        anyhow::bail!("{} file(s) failed", report.failed());
    }

    Ok(())
}
