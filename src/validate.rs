//! Print-quality validation of uploaded photos.
//!
//! [`validate_image`] is total: it always returns a [`ValidationResult`],
//! never an error — decode failures become a single hard error with zeroed
//! metadata. Hard errors (wrong format, oversize file, insufficient pixels)
//! make the result invalid; quality warnings (missing or low DPI, physical
//! size outside tolerance) never do. Checks run in a fixed order and
//! messages are appended in that order, so results are deterministic for
//! the same input.
//!
//! All physical-size comparisons derive the actual size from *pixel*
//! dimensions at the effective DPI (embedded density, or the assumed
//! [`DEFAULT_PRINT_DPI`] when the image carries none) — never from physical
//! fields already present on the metadata.

use crate::formats::normalize_format;
use crate::imaging::{CodecError, ImageCodec};
use crate::units::{self, DEFAULT_PRINT_DPI};
use serde::Serialize;

/// Allowed physical-size deviation when none is specified, in cm.
pub const DEFAULT_TOLERANCE_CM: f64 = 0.5;

/// Metadata extracted from an uploaded image. Transient — computed fresh per
/// validation call, never persisted by this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<f64>,
    /// Physical width implied by the embedded density. Absent without DPI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_width_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_height_cm: Option<f64>,
}

impl ImageMetadata {
    /// Zero-valued metadata reported when the buffer cannot be decoded.
    pub(crate) fn unknown() -> Self {
        Self {
            format: "unknown".to_string(),
            ..Self::default()
        }
    }
}

/// What an order requires of an uploaded photo. Immutable per call; every
/// field is optional and absent fields skip their check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationRequirements {
    pub min_width_px: Option<u32>,
    pub min_height_px: Option<u32>,
    /// Minimum DPI before a quality warning is raised (typically 300).
    pub min_dpi: Option<f64>,
    pub max_file_size_bytes: Option<u64>,
    /// Accepted format names; compared after `jpeg`→`jpg` normalization.
    pub allowed_formats: Option<Vec<String>>,
    pub expected_width_cm: Option<f64>,
    pub expected_height_cm: Option<f64>,
    /// Physical-size tolerance in cm; `None` means [`DEFAULT_TOLERANCE_CM`].
    pub tolerance_cm: Option<f64>,
}

/// Outcome of a validation call.
///
/// `is_valid` is true exactly when `errors` is empty; warnings never affect
/// validity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub metadata: ImageMetadata,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Decode a buffer and report its metadata, including the physical size
/// implied by the embedded density when one is present.
pub fn extract_metadata(
    codec: &impl ImageCodec,
    bytes: &[u8],
) -> Result<ImageMetadata, CodecError> {
    let probed = codec.probe(bytes)?;

    let (physical_width_cm, physical_height_cm) = match probed.dpi {
        Some(dpi) => (
            Some(units::px_to_cm(probed.width, dpi)),
            Some(units::px_to_cm(probed.height, dpi)),
        ),
        None => (None, None),
    };

    Ok(ImageMetadata {
        width: probed.width,
        height: probed.height,
        format: probed.format,
        size_bytes: bytes.len() as u64,
        dpi: probed.dpi,
        physical_width_cm,
        physical_height_cm,
    })
}

pub(crate) fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

/// Validate an uploaded image against the order's requirements.
///
/// Never fails across this boundary: an undecodable buffer yields an invalid
/// result carrying a single explanatory error.
pub fn validate_image(
    codec: &impl ImageCodec,
    bytes: &[u8],
    requirements: &ValidationRequirements,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let metadata = match extract_metadata(codec, bytes) {
        Ok(metadata) => metadata,
        Err(cause) => {
            return ValidationResult {
                is_valid: false,
                metadata: ImageMetadata::unknown(),
                errors: vec![format!("Error processing image: {cause}")],
                warnings,
            };
        }
    };

    // Format
    if let Some(allowed) = &requirements.allowed_formats {
        let detected = normalize_format(&metadata.format);
        if !allowed.iter().any(|f| normalize_format(f) == detected) {
            errors.push(format!(
                "Format not allowed. Expected: {}. Received: {}",
                allowed.join(", "),
                metadata.format
            ));
        }
    }

    // File size
    if let Some(max_bytes) = requirements.max_file_size_bytes {
        if metadata.size_bytes > max_bytes {
            errors.push(format!(
                "File too large. Maximum: {:.2}MB. Actual: {:.2}MB",
                megabytes(max_bytes),
                megabytes(metadata.size_bytes)
            ));
        }
    }

    // Pixel minimums
    if let Some(min_width) = requirements.min_width_px {
        if metadata.width < min_width {
            errors.push(format!(
                "Width too small. Minimum: {min_width}px. Actual: {}px",
                metadata.width
            ));
        }
    }
    if let Some(min_height) = requirements.min_height_px {
        if metadata.height < min_height {
            errors.push(format!(
                "Height too small. Minimum: {min_height}px. Actual: {}px",
                metadata.height
            ));
        }
    }

    // DPI presence / sufficiency — missing density is never an error, and
    // the two warnings are mutually exclusive
    match metadata.dpi {
        None => warnings.push(format!(
            "Image has no DPI metadata. {DEFAULT_PRINT_DPI} DPI will be assumed for printing."
        )),
        Some(dpi) => {
            if let Some(min_dpi) = requirements.min_dpi {
                if dpi < min_dpi {
                    warnings.push(format!(
                        "DPI too low. Recommended: {min_dpi} DPI. Actual: {dpi} DPI. \
                         The print may not reach the expected quality."
                    ));
                }
            }
        }
    }

    // Physical-size tolerance, both axes independently
    if let (Some(expected_width), Some(expected_height)) = (
        requirements.expected_width_cm,
        requirements.expected_height_cm,
    ) {
        let tolerance = requirements.tolerance_cm.unwrap_or(DEFAULT_TOLERANCE_CM);
        let dpi = metadata.dpi.unwrap_or(f64::from(DEFAULT_PRINT_DPI));

        let actual_width = units::px_to_cm(metadata.width, dpi);
        let actual_height = units::px_to_cm(metadata.height, dpi);

        if (actual_width - expected_width).abs() > tolerance
            || (actual_height - expected_height).abs() > tolerance
        {
            let required = units::required_pixels(expected_width, expected_height, dpi);
            warnings.push(format!(
                "Physical size does not match the expected print size. \
                 Expected: {expected_width:.1}cm x {expected_height:.1}cm. \
                 Actual: {actual_width:.1}cm x {actual_height:.1}cm (at {dpi} DPI). \
                 An image of {}x{} pixels at {dpi} DPI is recommended.",
                required.width, required.height
            ));
        }
    }

    // High-quality print hint, only when the requirement is exactly the
    // standard print resolution and the image falls short of it
    if requirements.min_dpi == Some(f64::from(DEFAULT_PRINT_DPI)) {
        if let Some(dpi) = metadata.dpi {
            let target = f64::from(DEFAULT_PRINT_DPI);
            if dpi < target {
                let min_width = match requirements.expected_width_cm {
                    Some(cm) => units::cm_to_px(cm, target),
                    None => (f64::from(metadata.width) * target / dpi).ceil() as u32,
                };
                let min_height = match requirements.expected_height_cm {
                    Some(cm) => units::cm_to_px(cm, target),
                    None => (f64::from(metadata.height) * target / dpi).ceil() as u32,
                };
                warnings.push(format!(
                    "For high quality printing at {DEFAULT_PRINT_DPI} DPI an image of at \
                     least {min_width}x{min_height} pixels is recommended."
                ));
            }
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        metadata,
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ProbedImage;
    use crate::imaging::codec::tests::MockCodec;

    fn probed(width: u32, height: u32, format: &str, dpi: Option<f64>) -> ProbedImage {
        ProbedImage {
            width,
            height,
            format: format.to_string(),
            dpi,
        }
    }

    #[test]
    fn jpeg_is_accepted_as_jpg() {
        let codec = MockCodec::with_probes(vec![probed(1000, 1000, "jpeg", Some(300.0))]);
        let requirements = ValidationRequirements {
            allowed_formats: Some(vec!["jpg".to_string(), "png".to_string()]),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn disallowed_format_is_a_hard_error() {
        let codec = MockCodec::with_probes(vec![probed(1000, 1000, "webp", Some(300.0))]);
        let requirements = ValidationRequirements {
            allowed_formats: Some(vec!["jpg".to_string(), "png".to_string()]),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0],
            "Format not allowed. Expected: jpg, png. Received: webp"
        );
    }

    #[test]
    fn missing_dpi_alone_is_one_warning_and_valid() {
        let codec = MockCodec::with_probes(vec![probed(800, 600, "jpeg", None)]);

        let result = validate_image(&codec, &[0u8; 100], &ValidationRequirements::default());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(
            result.warnings[0],
            "Image has no DPI metadata. 300 DPI will be assumed for printing."
        );
    }

    #[test]
    fn size_within_tolerance_at_assumed_dpi_is_clean() {
        // 1200x1800px, no density: assumed 300 DPI → 10.16cm x 15.24cm,
        // both within 0.5cm of the expected 10x15
        let codec = MockCodec::with_probes(vec![probed(1200, 1800, "jpeg", None)]);
        let requirements = ValidationRequirements {
            expected_width_cm: Some(10.0),
            expected_height_cm: Some(15.0),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        assert!(result.is_valid);
        // Only the missing-density warning, no size mismatch
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("no DPI metadata"));
    }

    #[test]
    fn size_outside_tolerance_warns_with_required_pixels() {
        // 400x600px at assumed 300 DPI → 3.39cm x 5.08cm, far from 10x15
        let codec = MockCodec::with_probes(vec![probed(400, 600, "jpeg", None)]);
        let requirements = ValidationRequirements {
            expected_width_cm: Some(10.0),
            expected_height_cm: Some(15.0),
            tolerance_cm: Some(0.5),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        assert!(result.is_valid, "size mismatch must stay a warning");

        let mismatch: Vec<_> = result
            .warnings
            .iter()
            .filter(|w| w.contains("Physical size does not match"))
            .collect();
        assert_eq!(mismatch.len(), 1);
        assert!(mismatch[0].contains("Expected: 10.0cm x 15.0cm"));
        assert!(mismatch[0].contains("Actual: 3.4cm x 5.1cm (at 300 DPI)"));
        assert!(mismatch[0].contains("1182x1772 pixels"));
    }

    #[test]
    fn tolerance_uses_embedded_dpi_when_present() {
        // 400x600px at embedded 100 DPI → 10.16cm x 15.24cm, within tolerance
        let codec = MockCodec::with_probes(vec![probed(400, 600, "jpeg", Some(100.0))]);
        let requirements = ValidationRequirements {
            expected_width_cm: Some(10.0),
            expected_height_cm: Some(15.0),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        assert!(
            !result
                .warnings
                .iter()
                .any(|w| w.contains("Physical size does not match")),
            "warnings: {:?}",
            result.warnings
        );
    }

    #[test]
    fn oversize_file_is_exactly_one_error() {
        let codec = MockCodec::with_probes(vec![probed(1000, 1000, "jpeg", Some(300.0))]);
        let requirements = ValidationRequirements {
            max_file_size_bytes: Some(1024 * 1024),
            ..ValidationRequirements::default()
        };

        let bytes = vec![0u8; 2 * 1024 * 1024];
        let result = validate_image(&codec, &bytes, &requirements);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0],
            "File too large. Maximum: 1.00MB. Actual: 2.00MB"
        );
    }

    #[test]
    fn pixel_minimums_name_the_deficient_dimension() {
        let codec = MockCodec::with_probes(vec![probed(400, 600, "jpeg", Some(300.0))]);
        let requirements = ValidationRequirements {
            min_width_px: Some(1000),
            min_height_px: Some(500),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Width too small. Minimum: 1000px. Actual: 400px"]
        );
    }

    #[test]
    fn errors_accumulate_in_check_order() {
        let codec = MockCodec::with_probes(vec![probed(100, 100, "webp", Some(300.0))]);
        let requirements = ValidationRequirements {
            allowed_formats: Some(vec!["jpg".to_string()]),
            max_file_size_bytes: Some(10),
            min_width_px: Some(1000),
            min_height_px: Some(1000),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        assert_eq!(result.errors.len(), 4);
        assert!(result.errors[0].starts_with("Format not allowed"));
        assert!(result.errors[1].starts_with("File too large"));
        assert!(result.errors[2].starts_with("Width too small"));
        assert!(result.errors[3].starts_with("Height too small"));
    }

    #[test]
    fn low_dpi_is_a_warning_not_an_error() {
        let codec = MockCodec::with_probes(vec![probed(800, 600, "jpeg", Some(150.0))]);
        let requirements = ValidationRequirements {
            min_dpi: Some(300.0),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        assert!(result.is_valid);
        // Low-DPI warning plus the 300-DPI print hint, in that order
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].starts_with("DPI too low. Recommended: 300 DPI. Actual: 150 DPI"));
        // Hint upscales current pixels by 300/150
        assert!(result.warnings[1].contains("at least 1600x1200 pixels"));
    }

    #[test]
    fn print_hint_uses_expected_size_when_given() {
        let codec = MockCodec::with_probes(vec![probed(800, 600, "jpeg", Some(150.0))]);
        let requirements = ValidationRequirements {
            min_dpi: Some(300.0),
            expected_width_cm: Some(10.0),
            expected_height_cm: Some(15.0),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        let hint = result
            .warnings
            .iter()
            .find(|w| w.contains("high quality printing"))
            .expect("expected the 300 DPI hint");
        assert!(hint.contains("1182x1772"), "hint was: {hint}");
    }

    #[test]
    fn no_print_hint_when_min_dpi_is_not_300() {
        let codec = MockCodec::with_probes(vec![probed(800, 600, "jpeg", Some(150.0))]);
        let requirements = ValidationRequirements {
            min_dpi: Some(240.0),
            ..ValidationRequirements::default()
        };

        let result = validate_image(&codec, &[0u8; 100], &requirements);
        assert!(
            !result
                .warnings
                .iter()
                .any(|w| w.contains("high quality printing"))
        );
    }

    #[test]
    fn decode_failure_is_total_with_zeroed_metadata() {
        let codec = MockCodec::failing("not an image");

        let result = validate_image(&codec, &[1, 2, 3], &ValidationRequirements::default());
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Error processing image:"));
        assert!(result.warnings.is_empty());
        assert_eq!(result.metadata.width, 0);
        assert_eq!(result.metadata.height, 0);
        assert_eq!(result.metadata.format, "unknown");
        assert_eq!(result.metadata.size_bytes, 0);
        assert_eq!(result.metadata.dpi, None);
    }

    #[test]
    fn extract_metadata_derives_physical_size_from_density() {
        let codec = MockCodec::with_probes(vec![probed(1200, 1800, "jpeg", Some(300.0))]);

        let metadata = extract_metadata(&codec, &[0u8; 42]).unwrap();
        assert_eq!(metadata.size_bytes, 42);
        assert!((metadata.physical_width_cm.unwrap() - 10.16).abs() < 1e-9);
        assert!((metadata.physical_height_cm.unwrap() - 15.24).abs() < 1e-9);
    }

    #[test]
    fn extract_metadata_without_density_has_no_physical_size() {
        let codec = MockCodec::with_probes(vec![probed(1200, 1800, "png", None)]);

        let metadata = extract_metadata(&codec, &[0u8; 10]).unwrap();
        assert_eq!(metadata.physical_width_cm, None);
        assert_eq!(metadata.physical_height_cm, None);
    }
}
