//! Requirement profiles loaded from TOML.
//!
//! A profile is the CLI-facing form of [`ValidationRequirements`]: the limits
//! a print shop applies to every upload, kept in a `printcheck.toml` next to
//! the order data instead of repeated as flags. Stock defaults match the
//! upload domain — jpg/jpeg/png only, 10 MB cap, 300 DPI, 0.5 cm tolerance.
//!
//! ```toml
//! # All keys are optional - defaults shown below
//! allowed_formats = ["jpg", "jpeg", "png"]
//! max_file_size_mb = 10.0
//! min_dpi = 300.0
//! tolerance_cm = 0.5
//! target_dpi = 300          # density embedded by `prepare`
//!
//! # Unset by default - enable per package
//! # min_width_px = 1181
//! # min_height_px = 1772
//! # expected_width_cm = 10.0
//! # expected_height_cm = 15.0
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::units::DEFAULT_PRINT_DPI;
use crate::validate::{DEFAULT_TOLERANCE_CM, ValidationRequirements};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Profile validation error: {0}")]
    Validation(String),
}

/// Upload requirements for a print shop or a single package.
///
/// All fields have defaults; profile files only specify overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrintProfile {
    /// Accepted upload formats (`jpeg` and `jpg` are equivalent).
    pub allowed_formats: Vec<String>,
    pub max_file_size_mb: f64,
    pub min_dpi: f64,
    pub tolerance_cm: f64,
    /// Density embedded when preparing an accepted upload for storage.
    pub target_dpi: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width_px: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height_px: Option<u32>,
    /// Ordered print width; enables the physical-size tolerance check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_width_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_height_cm: Option<f64>,
}

impl Default for PrintProfile {
    fn default() -> Self {
        Self {
            allowed_formats: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            max_file_size_mb: 10.0,
            min_dpi: f64::from(DEFAULT_PRINT_DPI),
            tolerance_cm: DEFAULT_TOLERANCE_CM,
            target_dpi: DEFAULT_PRINT_DPI,
            min_width_px: None,
            min_height_px: None,
            expected_width_cm: None,
            expected_height_cm: None,
        }
    }
}

impl PrintProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.allowed_formats.is_empty() {
            return Err(ProfileError::Validation(
                "allowed_formats must not be empty".to_string(),
            ));
        }
        if self.max_file_size_mb <= 0.0 {
            return Err(ProfileError::Validation(
                "max_file_size_mb must be positive".to_string(),
            ));
        }
        if self.min_dpi <= 0.0 {
            return Err(ProfileError::Validation(
                "min_dpi must be positive".to_string(),
            ));
        }
        if self.tolerance_cm < 0.0 {
            return Err(ProfileError::Validation(
                "tolerance_cm must not be negative".to_string(),
            ));
        }
        if self.target_dpi == 0 {
            return Err(ProfileError::Validation(
                "target_dpi must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The requirements this profile imposes on a single upload.
    pub fn requirements(&self) -> ValidationRequirements {
        ValidationRequirements {
            min_width_px: self.min_width_px,
            min_height_px: self.min_height_px,
            min_dpi: Some(self.min_dpi),
            max_file_size_bytes: Some((self.max_file_size_mb * 1024.0 * 1024.0) as u64),
            allowed_formats: Some(self.allowed_formats.clone()),
            expected_width_cm: self.expected_width_cm,
            expected_height_cm: self.expected_height_cm,
            tolerance_cm: Some(self.tolerance_cm),
        }
    }
}

/// Load and validate a profile file.
pub fn load_profile(path: &Path) -> Result<PrintProfile, ProfileError> {
    let raw = fs::read_to_string(path)?;
    let profile: PrintProfile = toml::from_str(&raw)?;
    profile.validate()?;
    Ok(profile)
}

/// A documented stock profile, printed by `printcheck gen-profile`.
pub fn stock_profile_toml() -> String {
    let defaults = PrintProfile::default();
    format!(
        r#"# printcheck requirement profile
# All keys are optional - the values below are the defaults.

# Accepted upload formats ("jpeg" and "jpg" are equivalent)
allowed_formats = ["jpg", "jpeg", "png"]

# Reject uploads larger than this
max_file_size_mb = {max_file_size_mb:.1}

# Warn when the embedded DPI is below this
min_dpi = {min_dpi:.1}

# Allowed deviation between ordered and actual print size, in cm
tolerance_cm = {tolerance_cm}

# Density embedded when preparing an accepted upload for storage
target_dpi = {target_dpi}

# Per-package limits - uncomment and adjust as needed
# min_width_px = 1181
# min_height_px = 1772
# expected_width_cm = 10.0
# expected_height_cm = 15.0
"#,
        max_file_size_mb = defaults.max_file_size_mb,
        min_dpi = defaults.min_dpi,
        tolerance_cm = defaults.tolerance_cm,
        target_dpi = defaults.target_dpi,
    )
}
