//! Image codec trait and shared error type.
//!
//! The [`ImageCodec`] trait defines the two operations every codec must
//! support: decode bytes into a [`RasterImage`] and encode one back out.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec), pure Rust, statically
//! linked. Tests swap in `MockCodec` to observe what the gallery asks for
//! without paying for real compression.

use super::params::EncodeSettings;
use super::raster::RasterImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for image codecs.
///
/// Both operations are pure: no I/O beyond the in-memory buffers, no shared
/// state.
pub trait ImageCodec: Sync {
    /// Decode PNG/JPEG (or any other compiled-in format) bytes.
    ///
    /// Fails with [`CodecError::Decode`] on unrecognized, truncated or
    /// zero-sized input.
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, CodecError>;

    /// Encode an image. Quality only affects lossy formats.
    fn encode(&self, image: &RasterImage, settings: EncodeSettings)
    -> Result<Vec<u8>, CodecError>;
}
