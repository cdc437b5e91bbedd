//! Shared test utilities for the printcheck test suite.
//!
//! Provides synthetic image fixtures encoded in memory, so tests never
//! depend on binary files checked into the repository.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::{jpeg_bytes, png_bytes};
//!
//! let bytes = jpeg_bytes(1200, 1800);
//! let probed = RustCodec::new().probe(&bytes).unwrap();
//! assert_eq!(probed.width, 1200);
//! ```
//!
//! Fresh encodings carry no usable density metadata, which is exactly the
//! "scanner output" shape most validation tests want. Tests that need a
//! known DPI re-encode through the codec first.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

/// A small gradient so encoders have non-trivial content to compress.
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// A JPEG of the given dimensions, encoded in memory.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// A PNG of the given dimensions, encoded in memory. No `pHYs` chunk.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}
