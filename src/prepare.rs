//! Upload-side preparation: DPI embedding and final size derivation.
//!
//! Once a photo passes validation, the upload pipeline re-encodes it with
//! the package's print resolution embedded and records the physical size the
//! stored object will actually print at. That recorded size comes from the
//! *re-encoded* image's real pixel dimensions and the target DPI — not from
//! whatever the upload claimed — truncated to two decimals.

use crate::formats::PrintFormat;
use crate::imaging::{CodecError, ImageCodec};
use crate::units;
use serde::Serialize;

/// A photo ready for object storage, with the derived values the order
/// record keeps alongside the stored object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedPhoto {
    /// Corrected bytes to persist. Not part of the serialized report.
    #[serde(skip)]
    pub buffer: Vec<u8>,
    /// Drives the stored object's extension and content-type.
    pub format: PrintFormat,
    pub width_px: u32,
    pub height_px: u32,
    /// Physical print width, truncated to two decimals.
    pub physical_width_cm: f64,
    pub physical_height_cm: f64,
    /// The density embedded in `buffer`.
    pub dpi: u32,
}

impl PreparedPhoto {
    /// Content-type for the storage upload.
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// Extension for the storage key.
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }
}

/// Embed the target DPI and derive the stored photo's final dimensions.
///
/// Fails with [`CodecError`] if the buffer cannot be decoded or re-encoded;
/// that failure is fatal for the upload attempt and must be reported, not
/// defaulted. Callers are expected to have validated the buffer first.
pub fn prepare_for_print(
    codec: &impl ImageCodec,
    bytes: &[u8],
    target_dpi: u32,
) -> Result<PreparedPhoto, CodecError> {
    let embedded = codec.reencode(bytes, target_dpi)?;
    let probed = codec.probe(&embedded.bytes)?;

    let size = units::physical_size(probed.width, probed.height, f64::from(target_dpi));

    Ok(PreparedPhoto {
        buffer: embedded.bytes,
        format: embedded.format,
        width_px: probed.width,
        height_px: probed.height,
        physical_width_cm: units::truncate_cm(size.width_cm),
        physical_height_cm: units::truncate_cm(size.height_cm),
        dpi: target_dpi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::codec::tests::{MockCodec, RecordedOp};
    use crate::imaging::{EncodedImage, ProbedImage};

    fn codec_returning(width: u32, height: u32, format: PrintFormat) -> MockCodec {
        let codec = MockCodec::with_probes(vec![ProbedImage {
            width,
            height,
            format: format.tag().to_string(),
            dpi: Some(300.0),
        }]);
        codec.queue_reencode(EncodedImage {
            bytes: vec![7u8; 64],
            format,
        });
        codec
    }

    #[test]
    fn derives_size_from_reencoded_pixels() {
        let codec = codec_returning(1200, 1800, PrintFormat::Jpg);

        let prepared = prepare_for_print(&codec, &[0u8; 32], 300).unwrap();
        assert_eq!(prepared.width_px, 1200);
        assert_eq!(prepared.height_px, 1800);
        assert_eq!(prepared.physical_width_cm, 10.16);
        assert_eq!(prepared.physical_height_cm, 15.24);
        assert_eq!(prepared.dpi, 300);

        // Reencode first, then probe the corrected buffer (not the upload)
        let ops = codec.get_operations();
        assert_eq!(
            ops,
            vec![
                RecordedOp::Reencode {
                    len: 32,
                    target_dpi: 300
                },
                RecordedOp::Probe { len: 64 },
            ]
        );
    }

    #[test]
    fn physical_size_is_truncated_not_rounded() {
        // 1181px at 300 DPI = 9.99884..cm — must record 9.99, not 10.0
        let codec = codec_returning(1181, 1772, PrintFormat::Jpg);

        let prepared = prepare_for_print(&codec, &[0u8; 16], 300).unwrap();
        assert_eq!(prepared.physical_width_cm, 9.99);
        assert_eq!(prepared.physical_height_cm, 15.0);
    }

    #[test]
    fn format_drives_storage_naming() {
        let codec = codec_returning(500, 500, PrintFormat::Png);

        let prepared = prepare_for_print(&codec, &[0u8; 16], 300).unwrap();
        assert_eq!(prepared.format, PrintFormat::Png);
        assert_eq!(prepared.extension(), "png");
        assert_eq!(prepared.content_type(), "image/png");
    }

    #[test]
    fn reencode_failure_propagates() {
        // No queued reencode result — the mock fails the encode
        let codec = MockCodec::new();
        let result = prepare_for_print(&codec, &[0u8; 16], 300);
        assert!(matches!(result, Err(CodecError::Encode(_))));
    }
}
