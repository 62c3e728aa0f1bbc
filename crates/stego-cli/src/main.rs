//! Stego risk scanner CLI - scores images using an ONNX embedding model.
//!
//! Usage:
//!   stego-scan photo.png --model embedder.onnx
//!   stego-scan ./pictures --model embedder.onnx --sensitivity 3 --format json

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use stego_core::report::{print_report, OutputFormat};
use stego_core::scan::{run_scan, ScanConfig, ScanProgress};
use stego_core::score::Sensitivity;

#[derive(Parser)]
#[command(name = "stego-scan")]
#[command(about = "Image steganography risk scanner")]
struct Cli {
    /// Images or folders to scan (folders are filtered to png/jpg/jpeg)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Path to the ONNX embedding model file
    #[arg(short, long)]
    model: PathBuf,

    /// Detection sensitivity: 1 conservative, 2 balanced, 3 aggressive
    #[arg(short, long, default_value = "2")]
    sensitivity: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let sensitivity = Sensitivity::from_level(cli.sensitivity)
        .context("sensitivity must be 1, 2, or 3")?;

    let config = ScanConfig {
        model_path: cli.model,
        inputs: cli.paths,
        sensitivity,
    };

    let progress = Arc::new(ScanProgress::new());
    let outcome = run_scan(&config, &progress)?;

    let total = progress.total_images.load(Ordering::Relaxed);
    if total == 0 {
        println!("No images to scan.");
        return Ok(());
    }
    info!("scanned {total} images");

    print_report(&outcome, cli.format);

    Ok(())
}
