//! Pure conversions between pixel and physical print dimensions.
//!
//! Every conversion in the crate goes through this module so the
//! inch/centimetre constant and the assumed print resolution exist in
//! exactly one place. Two rounding rules apply crate-wide:
//!
//! - **Pixel results round up** ([`cm_to_px`], [`required_pixels`]).
//!   A print that comes out slightly larger than ordered is croppable;
//!   one that comes out short of pixels is not.
//! - **Physical results are not rounded** ([`px_to_cm`], [`physical_size`]).
//!   Callers that persist or display centimetre values truncate to two
//!   decimals via [`truncate_cm`].

use serde::Serialize;

/// The one conversion constant: 1 inch = 2.54 cm, used in both directions.
pub const CM_PER_INCH: f64 = 2.54;

/// Print resolution assumed whenever an image carries no density metadata,
/// and the default target for DPI embedding.
pub const DEFAULT_PRINT_DPI: u32 = 300;

/// Convert a pixel count to centimetres at the given resolution.
///
/// # Panics
///
/// Panics if `dpi` is not positive — calling with a non-positive resolution
/// is a caller bug, not a recoverable condition.
pub fn px_to_cm(px: u32, dpi: f64) -> f64 {
    assert!(dpi > 0.0, "dpi must be positive");
    (f64::from(px) / dpi) * CM_PER_INCH
}

/// Convert centimetres to the pixel count needed at the given resolution.
///
/// Rounds up: the result is the smallest pixel count that covers `cm`.
///
/// # Panics
///
/// Panics if `dpi` is not positive.
pub fn cm_to_px(cm: f64, dpi: f64) -> u32 {
    assert!(dpi > 0.0, "dpi must be positive");
    ((cm / CM_PER_INCH) * dpi).ceil() as u32
}

/// Pixel dimensions of an image or a pixel requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelDimensions {
    pub width: u32,
    pub height: u32,
}

/// Physical print size in centimetres. Unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

/// Minimum pixel dimensions for a physical print size, per axis,
/// rounded up independently.
pub fn required_pixels(width_cm: f64, height_cm: f64, dpi: f64) -> PixelDimensions {
    PixelDimensions {
        width: cm_to_px(width_cm, dpi),
        height: cm_to_px(height_cm, dpi),
    }
}

/// Physical size a pixel grid prints at, for the given resolution.
pub fn physical_size(width_px: u32, height_px: u32, dpi: f64) -> PhysicalSize {
    PhysicalSize {
        width_cm: px_to_cm(width_px, dpi),
        height_cm: px_to_cm(height_px, dpi),
    }
}

/// Truncate a centimetre value to two decimals for persistence/display.
pub fn truncate_cm(cm: f64) -> f64 {
    (cm * 100.0).trunc() / 100.0
}
