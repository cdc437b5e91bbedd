//! Canonical image-format naming for the print domain.
//!
//! Decoders report `"jpeg"`, order requirements say `"jpg"`, stored objects
//! need an extension and a content-type. All three must agree, so the
//! `jpeg`→`jpg` mapping lives in one function ([`normalize_format`]) and one
//! enum ([`PrintFormat`]) — the validator's allowed-set comparison and the
//! embedder's stored-format decision both go through here.

use serde::Serialize;
use std::fmt;

/// Normalize a format name for comparison: lower-case, `jpeg` folded to `jpg`.
pub fn normalize_format(format: &str) -> String {
    let lower = format.to_ascii_lowercase();
    if lower == "jpeg" { "jpg".to_string() } else { lower }
}

/// Output format of a print-ready photo. The domain stores jpg or png,
/// nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintFormat {
    Jpg,
    Png,
}

impl PrintFormat {
    /// Classify a detected format name. PNG stays PNG; everything else is
    /// re-encoded as JPEG, matching the embedder's output contract.
    pub fn from_detected(format: &str) -> Self {
        if normalize_format(format) == "png" {
            PrintFormat::Png
        } else {
            PrintFormat::Jpg
        }
    }

    /// Canonical 3-letter tag, used for naming stored objects.
    pub fn tag(self) -> &'static str {
        match self {
            PrintFormat::Jpg => "jpg",
            PrintFormat::Png => "png",
        }
    }

    /// File extension for the stored object.
    pub fn extension(self) -> &'static str {
        self.tag()
    }

    /// Content-type for the stored object.
    pub fn content_type(self) -> &'static str {
        match self {
            PrintFormat::Jpg => "image/jpeg",
            PrintFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for PrintFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
