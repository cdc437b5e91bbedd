//! # printcheck
//!
//! Print-quality validation and physical-dimension derivation for uploaded
//! photos. Given an image buffer and the requirements of a print order,
//! printcheck answers three questions: *can this file be printed at all*,
//! *will it print well at the ordered size*, and *what exact physical size
//! will the stored file produce*.
//!
//! # Architecture: Validate, Then Prepare
//!
//! The upload path runs in two independent stages:
//!
//! ```text
//! 1. Validate   buffer + requirements  →  ValidationResult   (pure report)
//! 2. Prepare    buffer + target DPI    →  PreparedPhoto      (corrected bytes)
//! ```
//!
//! Validation never mutates the upload and never fails — undecodable input
//! becomes an invalid result with an explanatory error, so one bad file in a
//! batch cannot abort the rest. Preparation runs only on accepted uploads:
//! it re-encodes the buffer with the print resolution embedded and derives
//! the physical size the stored object will actually print at.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`units`] | Pixel/centimetre conversion math and the default print resolution |
//! | [`formats`] | Format-name normalization (`jpeg`→`jpg`) and the storable print formats |
//! | [`imaging`] | Decoding, density metadata parsing, and DPI-embedding re-encoders |
//! | [`validate`] | Requirement checks producing errors, warnings, and extracted metadata |
//! | [`prepare`] | Post-acceptance re-encoding and final physical-size derivation |
//! | [`config`] | TOML requirement profiles for print shops and packages |
//! | [`batch`] | Parallel validation of a whole directory of uploads |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Errors Reject, Warnings Inform
//!
//! A result is invalid exactly when it carries errors. Wrong format,
//! oversize file, and insufficient pixels are errors; missing or low DPI and
//! physical-size mismatches are warnings. Print shops routinely accept
//! sub-300-DPI photos with customer consent, so quality findings must not
//! block the upload — but they must be on the record.
//!
//! ## Derived Size Over Declared Size
//!
//! Physical dimensions are always recomputed from pixel counts and density,
//! never trusted from upstream metadata. An image with no embedded density
//! is assumed to print at 300 DPI, and every derived value states the DPI it
//! was computed at.
//!
//! ## Density Metadata Is Parsed By Hand
//!
//! The `image` crate decodes pixels but does not surface JFIF, EXIF, or
//! `pHYs` resolution metadata. [`imaging::density`] walks the raw container
//! bytes for those fields directly, which also keeps probing cheap: reading
//! a density never decodes pixel data.
//!
//! ## The Codec Is a Seam
//!
//! Everything above [`imaging`] consumes the [`imaging::ImageCodec`] trait,
//! not the `image` crate. Validation and preparation logic is tested against
//! a recording mock; only the codec's own tests touch real encoders.

pub mod batch;
pub mod config;
pub mod formats;
pub mod imaging;
pub mod output;
pub mod prepare;
pub mod units;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
