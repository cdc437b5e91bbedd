//! End-to-end upload pipeline: validate, prepare, store, re-check.
//!
//! Exercises the real codec against real files on disk, the way the CLI
//! drives it. Unit tests cover the individual checks; this suite covers the
//! seams between them.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use printcheck::batch::validate_dir;
use printcheck::imaging::{ImageCodec, RustCodec};
use printcheck::prepare::prepare_for_print;
use printcheck::validate::{ValidationRequirements, validate_image};
use std::path::Path;
use tempfile::TempDir;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

fn write_png(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

/// Requirements for a 10x15cm print order at the stock limits.
fn order_requirements() -> ValidationRequirements {
    ValidationRequirements {
        min_dpi: Some(300.0),
        max_file_size_bytes: Some(10 * 1024 * 1024),
        allowed_formats: Some(vec![
            "jpg".to_string(),
            "jpeg".to_string(),
            "png".to_string(),
        ]),
        expected_width_cm: Some(10.0),
        expected_height_cm: Some(15.0),
        tolerance_cm: Some(0.5),
        ..Default::default()
    }
}

#[test]
fn upload_validate_prepare_recheck() {
    let tmp = TempDir::new().unwrap();
    let upload = tmp.path().join("upload.jpg");
    write_jpeg(&upload, 1182, 1772);

    let codec = RustCodec::new();
    let bytes = std::fs::read(&upload).unwrap();

    // Fresh encodings carry no density: accepted, but the assumption is
    // on the record.
    let result = validate_image(&codec, &bytes, &order_requirements());
    assert!(result.is_valid, "errors: {:?}", result.errors);
    assert_eq!(result.metadata.width, 1182);
    assert_eq!(result.metadata.dpi, None);
    assert_eq!(
        result.warnings,
        vec!["Image has no DPI metadata. 300 DPI will be assumed for printing.".to_string()]
    );

    // Prepare embeds the density and derives the stored size.
    let prepared = prepare_for_print(&codec, &bytes, 300).unwrap();
    assert_eq!(prepared.extension(), "jpg");
    assert_eq!(prepared.width_px, 1182);
    assert_eq!(prepared.height_px, 1772);
    assert_eq!(prepared.physical_width_cm, 10.0);
    assert_eq!(prepared.physical_height_cm, 15.0);

    let stored = tmp.path().join("stored.jpg");
    std::fs::write(&stored, &prepared.buffer).unwrap();

    // The stored file now probes with the embedded density, so a re-check
    // of the same order raises no findings at all.
    let stored_bytes = std::fs::read(&stored).unwrap();
    let probed = codec.probe(&stored_bytes).unwrap();
    assert_eq!(probed.dpi, Some(300.0));

    let recheck = validate_image(&codec, &stored_bytes, &order_requirements());
    assert!(recheck.is_valid);
    assert!(recheck.warnings.is_empty(), "warnings: {:?}", recheck.warnings);
}

#[test]
fn png_upload_stays_png_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let upload = tmp.path().join("upload.png");
    write_png(&upload, 600, 900);

    let codec = RustCodec::new();
    let bytes = std::fs::read(&upload).unwrap();

    let prepared = prepare_for_print(&codec, &bytes, 300).unwrap();
    assert_eq!(prepared.extension(), "png");
    assert_eq!(prepared.content_type(), "image/png");

    let probed = codec.probe(&prepared.buffer).unwrap();
    assert_eq!(probed.format, "png");
    assert_eq!(probed.dpi, Some(300.0));
}

#[test]
fn undersized_upload_is_rejected_with_the_recommended_grid() {
    let tmp = TempDir::new().unwrap();
    let upload = tmp.path().join("small.jpg");
    write_jpeg(&upload, 400, 600);

    let codec = RustCodec::new();
    let bytes = std::fs::read(&upload).unwrap();

    let result = validate_image(&codec, &bytes, &order_requirements());
    // Physical mismatch is a warning, not an error.
    assert!(result.is_valid);
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings[1].contains("1182x1772 pixels"));
}

#[test]
fn corrupt_file_never_aborts_a_batch() {
    let tmp = TempDir::new().unwrap();
    write_jpeg(&tmp.path().join("good.jpg"), 800, 800);
    std::fs::write(tmp.path().join("corrupt.jpg"), b"\xff\xd8\xff\xe0 truncated").unwrap();
    std::fs::write(tmp.path().join("skipped.txt"), "not an image").unwrap();

    let codec = RustCodec::new();
    let report = validate_dir(&codec, tmp.path(), &ValidationRequirements::default()).unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);

    let corrupt = report
        .entries
        .iter()
        .find(|e| e.path.ends_with("corrupt.jpg"))
        .unwrap();
    assert!(corrupt.result.errors[0].starts_with("Error processing image:"));
}
