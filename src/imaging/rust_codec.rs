//! Production codec over the `image` crate — pure Rust, in-memory only.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format detection | `ImageReader::with_guessed_format` |
//! | Dimensions | `ImageReader::into_dimensions` (header-only, no full decode) |
//! | Density read | custom parser ([`density`](super::density)) |
//! | JPEG re-encode | `image::codecs::jpeg::JpegEncoder`, quality 95, density via `PixelDensity` |
//! | PNG re-encode | `image::codecs::png::PngEncoder`, best compression, adaptive filtering, density via [`density::write_png_density`](super::density::write_png_density) |
//!
//! Re-encoding through the `image` crate drops every metadata segment of the
//! source — which is exactly the "strip conflicting density/EXIF" step the
//! embedder contract requires. The corrected density is then written into
//! the fresh encoding.

use super::codec::{CodecError, EncodedImage, ImageCodec, ProbedImage};
use super::density;
use crate::formats::PrintFormat;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// JPEG re-encode quality. Print masters must not visibly degrade on the
/// one re-encode the pipeline performs.
const JPEG_PRINT_QUALITY: u8 = 95;

/// Pure Rust codec using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Format name as decoders conventionally report it.
fn detected_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        other => other.extensions_str().first().copied().unwrap_or("unknown"),
    }
}

fn guessed_reader(bytes: &[u8]) -> Result<(ImageReader<Cursor<&[u8]>>, ImageFormat), CodecError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| CodecError::Decode("unrecognized image format".to_string()))?;
    Ok((reader, format))
}

impl ImageCodec for RustCodec {
    fn probe(&self, bytes: &[u8]) -> Result<ProbedImage, CodecError> {
        let (reader, format) = guessed_reader(bytes)?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        Ok(ProbedImage {
            width,
            height,
            format: detected_name(format).to_string(),
            dpi: density::read_density(bytes),
        })
    }

    fn reencode(&self, bytes: &[u8], target_dpi: u32) -> Result<EncodedImage, CodecError> {
        let (reader, format) = guessed_reader(bytes)?;
        let img = reader
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        match format {
            ImageFormat::Png => {
                let mut buf = Vec::new();
                let encoder = PngEncoder::new_with_quality(
                    &mut buf,
                    CompressionType::Best,
                    FilterType::Adaptive,
                );
                img.write_with_encoder(encoder)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
                Ok(EncodedImage {
                    bytes: density::write_png_density(&buf, target_dpi),
                    format: PrintFormat::Png,
                })
            }
            _ => {
                let mut buf = Vec::new();
                let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_PRINT_QUALITY);
                let dpi = target_dpi.min(u32::from(u16::MAX)) as u16;
                encoder.set_pixel_density(PixelDensity::dpi(dpi));
                img.write_with_encoder(encoder)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
                Ok(EncodedImage {
                    bytes: buf,
                    format: PrintFormat::Jpg,
                })
            }
        }
    }
}
