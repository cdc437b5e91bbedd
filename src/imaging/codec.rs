//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait is the narrow seam between the validation logic
//! and the actual pixel work: two operations, probe and reencode, both over
//! in-memory buffers. The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec); tests use the recording
//! [`MockCodec`](tests::MockCodec) so validator behaviour can be exercised
//! without real image fixtures.

use crate::formats::PrintFormat;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Facts read from an encoded image buffer without modifying it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedImage {
    pub width: u32,
    pub height: u32,
    /// Detected container format as the decoder names it (`"jpeg"`, `"png"`).
    /// Not normalized — see [`crate::formats::normalize_format`].
    pub format: String,
    /// Embedded density, if the format carries one. Absence is normal.
    pub dpi: Option<f64>,
}

/// A re-encoded image with corrected density metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: PrintFormat,
}

/// Decode/encode capability the core consumes.
///
/// Both operations are synchronous, side-effect-free computations over the
/// given buffer; implementations must be safe to call concurrently from many
/// in-flight uploads.
pub trait ImageCodec: Sync {
    /// Read dimensions, format, and embedded density from a buffer.
    fn probe(&self, bytes: &[u8]) -> Result<ProbedImage, CodecError>;

    /// Strip any conflicting density metadata and re-encode the image with
    /// the target DPI embedded. Format-preserving for PNG, JPEG otherwise.
    fn reencode(&self, bytes: &[u8], target_dpi: u32) -> Result<EncodedImage, CodecError>;
}
