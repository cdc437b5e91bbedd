//! CLI output formatting for all commands.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! REJECTED photo.jpg
//!     1200 x 1800 px, jpg, 0.84MB, 300 DPI
//!     Error: File too large. Maximum: 1.00MB. Actual: 2.00MB
//!     Warning: Image has no DPI metadata. 300 DPI will be assumed for printing.
//! ```
//!
//! ## Prepare
//!
//! ```text
//! photo.jpg -> photo-print.jpg
//!     1200 x 1800 px at 300 DPI
//!     10.16cm x 15.24cm
//! ```
//!
//! ## Pixels
//!
//! ```text
//! 10cm x 15cm at 300 DPI
//!     1182 x 1772 px minimum (2.09 megapixels)
//!     Recommended: an image of at least 1182x1772 pixels
//! ```
//!
//! ## Batch
//!
//! ```text
//! OK       orders/a.png
//! REJECTED orders/b.jpg
//!     Error: Width too small. Minimum: 1181px. Actual: 400px
//!
//! 2 checked: 1 passed, 1 rejected, 0 with warnings
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::batch::BatchReport;
use crate::prepare::PreparedPhoto;
use crate::units::PixelDimensions;
use crate::validate::{ValidationResult, megabytes};
use std::path::Path;

const INDENT: &str = "    ";

/// Verdict tag for a validation result.
fn verdict(is_valid: bool) -> &'static str {
    if is_valid { "OK" } else { "REJECTED" }
}

/// One-line metadata summary: dimensions, format, size, density.
fn metadata_line(result: &ValidationResult) -> String {
    let m = &result.metadata;
    let dpi = match m.dpi {
        Some(dpi) => format!("{dpi} DPI"),
        None => "no DPI metadata".to_string(),
    };
    format!(
        "{} x {} px, {}, {:.2}MB, {}",
        m.width,
        m.height,
        m.format,
        megabytes(m.size_bytes),
        dpi
    )
}

// ============================================================================
// Check
// ============================================================================

/// Format one validation result, verdict first, findings indented below.
pub fn format_validation(name: &str, result: &ValidationResult) -> Vec<String> {
    let mut lines = vec![format!("{} {}", verdict(result.is_valid), name)];
    lines.push(format!("{INDENT}{}", metadata_line(result)));
    for error in &result.errors {
        lines.push(format!("{INDENT}Error: {error}"));
    }
    for warning in &result.warnings {
        lines.push(format!("{INDENT}Warning: {warning}"));
    }
    lines
}

pub fn print_validation(name: &str, result: &ValidationResult) {
    for line in format_validation(name, result) {
        println!("{}", line);
    }
}

// ============================================================================
// Prepare
// ============================================================================

/// Format a prepared photo: where it went and what it will print as.
pub fn format_prepared(input: &Path, output: &Path, photo: &PreparedPhoto) -> Vec<String> {
    vec![
        format!("{} -> {}", input.display(), output.display()),
        format!(
            "{INDENT}{} x {} px at {} DPI",
            photo.width_px, photo.height_px, photo.dpi
        ),
        format!(
            "{INDENT}{}cm x {}cm",
            photo.physical_width_cm, photo.physical_height_cm
        ),
    ]
}

pub fn print_prepared(input: &Path, output: &Path, photo: &PreparedPhoto) {
    for line in format_prepared(input, output, photo) {
        println!("{}", line);
    }
}

// ============================================================================
// Pixels
// ============================================================================

/// Format the minimum pixel grid for a print size, with the megapixel count
/// and the recommendation line order tooling shows customers.
pub fn format_required_pixels(
    width_cm: f64,
    height_cm: f64,
    dpi: u32,
    px: PixelDimensions,
) -> Vec<String> {
    let megapixels = f64::from(px.width) * f64::from(px.height) / 1_000_000.0;
    vec![
        format!("{width_cm}cm x {height_cm}cm at {dpi} DPI"),
        format!(
            "{INDENT}{} x {} px minimum ({megapixels:.2} megapixels)",
            px.width, px.height
        ),
        format!(
            "{INDENT}Recommended: an image of at least {}x{} pixels",
            px.width, px.height
        ),
    ]
}

pub fn print_required_pixels(width_cm: f64, height_cm: f64, dpi: u32, px: PixelDimensions) {
    for line in format_required_pixels(width_cm, height_cm, dpi, px) {
        println!("{}", line);
    }
}

// ============================================================================
// Batch
// ============================================================================

/// Format a batch report: one verdict line per file, findings indented under
/// the files that have them, then a summary line.
pub fn format_batch_report(report: &BatchReport) -> Vec<String> {
    let mut lines = Vec::new();

    for entry in &report.entries {
        lines.push(format!(
            "{:<8} {}",
            verdict(entry.result.is_valid),
            entry.path.display()
        ));
        for error in &entry.result.errors {
            lines.push(format!("{INDENT}Error: {error}"));
        }
        for warning in &entry.result.warnings {
            lines.push(format!("{INDENT}Warning: {warning}"));
        }
    }

    if !report.entries.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} checked: {} passed, {} rejected, {} with warnings",
        report.entries.len(),
        report.passed,
        report.failed,
        report.with_warnings
    ));

    lines
}

pub fn print_batch_report(report: &BatchReport) {
    for line in format_batch_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
