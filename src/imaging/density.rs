//! Minimal density (DPI) metadata reader and writer for JPEG and PNG buffers.
//!
//! The `image` crate decodes and encodes pixels but does not surface or write
//! density, so this module handles the three places print resolution lives:
//!
//! - **JPEG JFIF**: APP0 segment, units byte + X/Y density (per inch or per cm).
//! - **JPEG EXIF**: APP1 segment, TIFF IFD tags 0x011A (XResolution, rational)
//!   and 0x0128 (ResolutionUnit).
//! - **PNG**: `pHYs` chunk, pixels per metre.
//!
//! Reads return dots per inch rounded to two decimals, so integer DPI stored
//! in metre-based units (PNG) survives a write/read round trip exactly.
//! Writing covers PNG only — [`write_png_density`] rebuilds the chunk stream
//! with a fresh `pHYs` chunk (dropping any existing one). JPEG density is
//! written natively by the `image` crate's encoder (`PixelDensity`), so no
//! JPEG writer lives here.
//!
//! Zero external dependencies — pure byte-level parsing.

use crate::units::CM_PER_INCH;

const METRES_PER_INCH: f64 = CM_PER_INCH / 100.0;

const JFIF_ID: &[u8] = b"JFIF\0";
const EXIF_ID: &[u8] = b"Exif\0\0";
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Read the embedded density of a JPEG or PNG buffer, in dots per inch.
/// Returns `None` for any other data or when no density is recorded.
pub fn read_density(bytes: &[u8]) -> Option<f64> {
    if bytes.starts_with(&[0xFF, 0xD8]) {
        jpeg_density(bytes)
    } else if bytes.starts_with(PNG_SIGNATURE) {
        png_density(bytes)
    } else {
        None
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// JPEG
// ---------------------------------------------------------------------------

/// Walk JPEG marker segments until SOS, collecting `(marker, data_start, data_len)`.
///
/// Standalone markers (SOI, EOI, RSTn, TEM) carry no length field; everything
/// else is `length(2) + payload`. Stops at the first sign of corruption.
fn jpeg_segments(data: &[u8]) -> Vec<(u8, usize, usize)> {
    let mut segments = Vec::new();
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return segments;
    }

    let mut pos = 2;
    while pos + 2 <= data.len() {
        if data[pos] != 0xFF {
            break;
        }
        // Fill bytes before a marker are legal
        if pos + 2 <= data.len() && data[pos + 1] == 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        if marker == 0xDA {
            // SOS — entropy-coded data starts, no more metadata segments
            break;
        }
        if marker == 0xD8 || marker == 0xD9 || marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        if pos + 4 > data.len() {
            break;
        }
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if len < 2 || pos + 2 + len > data.len() {
            break;
        }
        segments.push((marker, pos + 4, len - 2));
        pos += 2 + len;
    }
    segments
}

/// Density from a JPEG: JFIF APP0 wins, EXIF APP1 is the fallback.
fn jpeg_density(data: &[u8]) -> Option<f64> {
    let mut exif = None;
    for (marker, start, len) in jpeg_segments(data) {
        let segment = &data[start..start + len];
        match marker {
            0xE0 => {
                if let Some(dpi) = jfif_density(segment) {
                    return Some(dpi);
                }
            }
            0xE1 => {
                if exif.is_none() {
                    exif = exif_density(segment);
                }
            }
            _ => {}
        }
    }
    exif
}

/// Parse density from a JFIF APP0 payload.
///
/// Layout: `"JFIF\0"` (5) + version (2) + units (1) + Xdensity (2) +
/// Ydensity (2) + thumbnail dims (2). Units: 0 = aspect ratio only
/// (no physical density), 1 = dots per inch, 2 = dots per cm.
fn jfif_density(segment: &[u8]) -> Option<f64> {
    if segment.len() < 12 || !segment.starts_with(JFIF_ID) {
        return None;
    }
    let units = segment[7];
    let x_density = u16::from_be_bytes([segment[8], segment[9]]);
    if x_density == 0 {
        return None;
    }
    match units {
        1 => Some(f64::from(x_density)),
        2 => Some(round2(f64::from(x_density) * CM_PER_INCH)),
        _ => None,
    }
}

/// Parse density from an EXIF APP1 payload (TIFF body after `"Exif\0\0"`).
fn exif_density(segment: &[u8]) -> Option<f64> {
    tiff_density(segment.strip_prefix(EXIF_ID)?)
}

const TAG_X_RESOLUTION: u16 = 0x011A;
const TAG_RESOLUTION_UNIT: u16 = 0x0128;

/// Resolution tags live in IFD0; anything deeper is a malformed or hostile
/// chain, so the walk stops rather than following offsets indefinitely.
const MAX_IFDS: usize = 8;

/// Walk a TIFF IFD chain looking for XResolution + ResolutionUnit.
///
/// XResolution is a RATIONAL (the 4-byte value field is an offset to
/// numerator/denominator); ResolutionUnit is an inline SHORT
/// (2 = inches, 3 = centimetres), defaulting to inches per the EXIF spec.
fn tiff_density(data: &[u8]) -> Option<f64> {
    if data.len() < 8 {
        return None;
    }

    let big_endian = match &data[0..2] {
        b"MM" => true,
        b"II" => false,
        _ => return None,
    };

    let read_u16 = |offset: usize| -> u16 {
        if big_endian {
            u16::from_be_bytes([data[offset], data[offset + 1]])
        } else {
            u16::from_le_bytes([data[offset], data[offset + 1]])
        }
    };

    let read_u32 = |offset: usize| -> u32 {
        let b = [
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ];
        if big_endian {
            u32::from_be_bytes(b)
        } else {
            u32::from_le_bytes(b)
        }
    };

    if read_u16(2) != 42 {
        return None;
    }

    let mut ifd_offset = read_u32(4) as usize;
    let mut ifds_walked = 0;
    while ifd_offset > 0 && ifd_offset + 2 <= data.len() && ifds_walked < MAX_IFDS {
        ifds_walked += 1;
        let entry_count = read_u16(ifd_offset) as usize;
        let entries_start = ifd_offset + 2;

        let mut x_resolution = None;
        let mut unit = 2u16;

        for i in 0..entry_count {
            let entry = entries_start + i * 12;
            if entry + 12 > data.len() {
                return None;
            }
            match read_u16(entry) {
                TAG_X_RESOLUTION => {
                    let value_offset = read_u32(entry + 8) as usize;
                    if value_offset + 8 <= data.len() {
                        let numerator = read_u32(value_offset);
                        let denominator = read_u32(value_offset + 4);
                        // A zero resolution means no density, same as JFIF
                        // and pHYs
                        if numerator != 0 && denominator != 0 {
                            x_resolution = Some(f64::from(numerator) / f64::from(denominator));
                        }
                    }
                }
                TAG_RESOLUTION_UNIT => unit = read_u16(entry + 8),
                _ => {}
            }
        }

        if let Some(resolution) = x_resolution {
            return match unit {
                2 => Some(round2(resolution)),
                3 => Some(round2(resolution * CM_PER_INCH)),
                _ => None,
            };
        }

        let next_offset_pos = entries_start + entry_count * 12;
        if next_offset_pos + 4 <= data.len() {
            ifd_offset = read_u32(next_offset_pos) as usize;
        } else {
            break;
        }
    }

    None
}

// ---------------------------------------------------------------------------
// PNG
// ---------------------------------------------------------------------------

/// Density from a PNG `pHYs` chunk. Unit must be metres (1); unit 0 means
/// aspect ratio only and carries no physical density.
fn png_density(data: &[u8]) -> Option<f64> {
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= data.len() {
        let len = u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
            as usize;
        let chunk_type = &data[pos + 4..pos + 8];
        let chunk_start = pos + 8;
        if chunk_start + len + 4 > data.len() {
            break;
        }
        if chunk_type == b"pHYs" && len >= 9 {
            let pixels_per_metre = u32::from_be_bytes([
                data[chunk_start],
                data[chunk_start + 1],
                data[chunk_start + 2],
                data[chunk_start + 3],
            ]);
            let unit = data[chunk_start + 8];
            if unit == 1 && pixels_per_metre > 0 {
                return Some(round2(f64::from(pixels_per_metre) * METRES_PER_INCH));
            }
            return None;
        }
        if chunk_type == b"IDAT" {
            // pHYs must precede image data
            break;
        }
        pos = chunk_start + len + 4;
    }
    None
}

/// Set the density of an encoded PNG by rebuilding its chunk stream with a
/// `pHYs` chunk before the image data, dropping any existing one.
pub fn write_png_density(bytes: &[u8], dpi: u32) -> Vec<u8> {
    if !bytes.starts_with(PNG_SIGNATURE) {
        return bytes.to_vec();
    }

    let pixels_per_metre = (f64::from(dpi) / METRES_PER_INCH).round() as u32;
    let mut phys_data = Vec::with_capacity(9);
    phys_data.extend_from_slice(&pixels_per_metre.to_be_bytes());
    phys_data.extend_from_slice(&pixels_per_metre.to_be_bytes());
    phys_data.push(1); // unit: metre

    let mut out = Vec::with_capacity(bytes.len() + 21);
    out.extend_from_slice(PNG_SIGNATURE);

    let mut pos = PNG_SIGNATURE.len();
    let mut inserted = false;
    while pos + 8 <= bytes.len() {
        let len = u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
            as usize;
        let total = 8 + len + 4;
        if pos + total > bytes.len() {
            break;
        }
        let chunk_type = &bytes[pos + 4..pos + 8];
        if chunk_type == b"pHYs" {
            pos += total;
            continue;
        }
        if !inserted && (chunk_type == b"IDAT" || chunk_type == b"IEND") {
            append_chunk(&mut out, b"pHYs", &phys_data);
            inserted = true;
        }
        out.extend_from_slice(&bytes[pos..pos + total]);
        pos += total;
    }
    out.extend_from_slice(&bytes[pos..]);
    out
}

fn append_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc32(chunk_type, data).to_be_bytes());
}

/// CRC-32 (IEEE) over chunk type + data, as PNG requires.
fn crc32(chunk_type: &[u8], data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in chunk_type.iter().chain(data) {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xEDB8_8320
            } else {
                crc >> 1
            };
        }
    }
    !crc
}
