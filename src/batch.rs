//! Batch validation of a directory of photos.
//!
//! Pre-flight for an order of uploads: walk a directory, validate every
//! jpg/jpeg/png in parallel, and report per-file results plus a summary.
//! Decode and read failures become invalid entries, not batch failures, so
//! one broken file never hides the rest of the report. Entries come back in
//! path order regardless of which worker finished first.

use crate::imaging::ImageCodec;
use crate::validate::{ImageMetadata, ValidationRequirements, ValidationResult, validate_image};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Extensions the upload domain accepts; everything else is skipped.
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

fn has_photo_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            PHOTO_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// One validated file in a batch.
#[derive(Debug, Serialize)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: ValidationResult,
}

/// Results for a whole directory, in path order.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub passed: usize,
    pub failed: usize,
    pub with_warnings: usize,
}

/// Collect the photo files under `dir`, sorted by path.
pub fn collect_photos(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let mut paths = Vec::new();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_photo_extension(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Validate every photo under `dir` against the same requirements.
///
/// Fails only when the directory itself cannot be walked; per-file problems
/// are reported inside the entries.
pub fn validate_dir(
    codec: &impl ImageCodec,
    dir: &Path,
    requirements: &ValidationRequirements,
) -> Result<BatchReport, BatchError> {
    let paths = collect_photos(dir)?;

    let entries: Vec<BatchEntry> = paths
        .into_par_iter()
        .map(|path| {
            let result = match std::fs::read(&path) {
                Ok(bytes) => validate_image(codec, &bytes, requirements),
                Err(cause) => ValidationResult {
                    is_valid: false,
                    metadata: ImageMetadata::unknown(),
                    errors: vec![format!("Error reading file: {cause}")],
                    warnings: Vec::new(),
                },
            };
            BatchEntry { path, result }
        })
        .collect();

    let passed = entries.iter().filter(|e| e.result.is_valid).count();
    let failed = entries.len() - passed;
    let with_warnings = entries
        .iter()
        .filter(|e| !e.result.warnings.is_empty())
        .count();

    Ok(BatchReport {
        entries,
        passed,
        failed,
        with_warnings,
    })
}
