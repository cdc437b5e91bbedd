//! Image decoding, density metadata, and re-encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** (dimensions, format) | `image::ImageReader` |
//! | **Density read** | custom parser (JPEG JFIF/EXIF + PNG `pHYs`) |
//! | **Re-encode with DPI** | `image` encoders + `pHYs` writer |
//!
//! The module is split into:
//! - **Codec**: [`ImageCodec`] trait + shared types — the narrow seam the
//!   validator and embedder consume, mockable in tests
//! - **Density**: byte-level density metadata parsing and writing
//! - **RustCodec**: the production `image`-crate implementation

pub mod codec;
pub mod density;
pub mod rust_codec;

pub use codec::{CodecError, EncodedImage, ImageCodec, ProbedImage};
pub use rust_codec::RustCodec;
