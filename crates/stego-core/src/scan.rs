//! Scan orchestrator with progress tracking.
//!
//! Images are scored in parallel, but results are collected in input order
//! before being appended to the session log, so the history reads in the
//! same order the inputs were given. Images that fail to decode are skipped:
//! they never enter the log, but each skip is recorded and counted so the
//! exclusion is visible to callers.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::extractor::OnnxExtractor;
use crate::preprocess::load_image;
use crate::score::{explanation, ScoreResult, Scorer, Sensitivity};
use crate::session::{ScanRecord, ScanSource, SessionLog};

/// Extensions accepted during a folder scan, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Configuration for a scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub model_path: PathBuf,
    /// Explicit files count as uploads; directories are folder scans.
    pub inputs: Vec<PathBuf>,
    pub sensitivity: Sensitivity,
}

/// Atomic progress tracking — no Mutex contention with a UI thread.
pub struct ScanProgress {
    pub total_images: AtomicUsize,
    pub scanned_images: AtomicUsize,
    pub risky_count: AtomicUsize,
    pub error_count: AtomicUsize,
    pub cancel: AtomicBool,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self {
            total_images: AtomicUsize::new(0),
            scanned_images: AtomicUsize::new(0),
            risky_count: AtomicUsize::new(0),
            error_count: AtomicUsize::new(0),
            cancel: AtomicBool::new(false),
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// An input that was attempted but never scored.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything a scan run produces.
pub struct ScanOutcome {
    pub log: SessionLog,
    pub skipped: Vec<SkippedImage>,
}

/// Check a path against the accepted image extensions, ignoring case.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Collect image paths from the given inputs, tagging each with its source.
/// Explicit files pass through as uploads; directories are walked and
/// filtered to the accepted extensions.
pub fn collect_images(inputs: &[PathBuf]) -> Vec<(PathBuf, ScanSource)> {
    let mut images = Vec::new();

    for input in inputs {
        if input.is_file() {
            images.push((input.clone(), ScanSource::Upload));
        } else if input.is_dir() {
            for entry in WalkDir::new(input)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .flatten()
            {
                let p = entry.into_path();
                if p.is_file() && is_image_file(&p) {
                    images.push((p, ScanSource::FolderScan));
                }
            }
        }
    }

    images
}

/// Run a full scan with progress tracking. Blocking — call from a background
/// thread if a UI is attached.
pub fn run_scan(config: &ScanConfig, progress: &Arc<ScanProgress>) -> Result<ScanOutcome> {
    let images = collect_images(&config.inputs);
    progress.total_images.store(images.len(), Ordering::Relaxed);

    if images.is_empty() {
        return Ok(ScanOutcome {
            log: SessionLog::new(),
            skipped: Vec::new(),
        });
    }

    info!("loading model from {}", config.model_path.display());
    let extractor = Arc::new(OnnxExtractor::load(&config.model_path)?);
    let scorer = Scorer::new(extractor);

    info!("scanning {} images", images.len());
    Ok(scan_images(&scorer, &images, config.sensitivity, progress))
}

/// Score a collected image list against an already-built scorer. Split out
/// from [`run_scan`] so tests can inject a stub extractor.
pub fn scan_images(
    scorer: &Scorer,
    images: &[(PathBuf, ScanSource)],
    sensitivity: Sensitivity,
    progress: &Arc<ScanProgress>,
) -> ScanOutcome {
    let scored: Vec<Result<ScanRecord, SkippedImage>> = images
        .par_iter()
        .filter_map(|(path, source)| {
            if progress.cancel.load(Ordering::Relaxed) {
                return None;
            }

            let item = match load_image(path).and_then(|img| scorer.score(&img)) {
                Ok(raw_result) => {
                    // Sensitivity only moves the label; the stored
                    // confidence stays what the scorer reported.
                    let result = ScoreResult {
                        label: sensitivity.remap(raw_result.label),
                        confidence: raw_result.confidence,
                    };
                    if result.label.is_risky() {
                        progress.risky_count.fetch_add(1, Ordering::Relaxed);
                    }
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    Ok(ScanRecord::new(
                        name,
                        result,
                        explanation(result.label),
                        *source,
                    ))
                }
                Err(e) => {
                    warn!("skipping {}: {e}", path.display());
                    progress.error_count.fetch_add(1, Ordering::Relaxed);
                    Err(SkippedImage {
                        path: path.clone(),
                        reason: e.to_string(),
                    })
                }
            };

            progress.scanned_images.fetch_add(1, Ordering::Relaxed);
            Some(item)
        })
        .collect();

    // Serialization point: the parallel collect preserved input order, and
    // appends happen here on one thread.
    let mut log = SessionLog::new();
    let mut skipped = Vec::new();
    for item in scored {
        match item {
            Ok(record) => log.append(record),
            Err(skip) => skipped.push(skip),
        }
    }

    ScanOutcome { log, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_extension_filter_is_case_insensitive() {
        assert!(is_image_file(Path::new("a.png")));
        assert!(is_image_file(Path::new("b.JPG")));
        assert!(is_image_file(Path::new("c.Jpeg")));
        assert!(!is_image_file(Path::new("d.gif")));
        assert!(!is_image_file(Path::new("e.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }
}
