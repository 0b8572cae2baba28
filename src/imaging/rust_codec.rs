//! Pure Rust codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format | `image::ImageReader::with_guessed_format` (magic bytes) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless, keeps alpha) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (alpha dropped, quality 1–100) |

use super::codec::{CodecError, ImageCodec};
use super::params::{EncodeFormat, EncodeSettings};
use super::raster::RasterImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Production codec. Stateless; construct freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl ImageCodec for RustCodec {
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, CodecError> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let Some(format) = reader.format() else {
            return Err(CodecError::Decode("unrecognized image format".into()));
        };
        let decoded = reader
            .decode()
            .map_err(|e| CodecError::Decode(format!("{format:?}: {e}")))?;
        log::debug!(
            "decoded {format:?} {}x{} ({} bytes)",
            decoded.width(),
            decoded.height(),
            bytes.len()
        );
        RasterImage::with_encoded(decoded.to_rgba8(), bytes.to_vec())
            .ok_or_else(|| CodecError::Decode("image has zero width or height".into()))
    }

    fn encode(
        &self,
        image: &RasterImage,
        settings: EncodeSettings,
    ) -> Result<Vec<u8>, CodecError> {
        let mut bytes = Vec::new();
        match settings.format {
            EncodeFormat::Png => image
                .pixels()
                .write_with_encoder(PngEncoder::new(&mut bytes))
                .map_err(|e| CodecError::Encode(format!("PNG encode failed: {e}")))?,
            EncodeFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(image.pixels().clone()).to_rgb8();
                let encoder = JpegEncoder::new_with_quality(&mut bytes, settings.quality.percent());
                rgb.write_with_encoder(encoder)
                    .map_err(|e| CodecError::Encode(format!("JPEG encode failed: {e}")))?
            }
        }
        log::debug!(
            "encoded {}x{} as {:?} ({} bytes)",
            image.width(),
            image.height(),
            settings.format,
            bytes.len()
        );
        Ok(bytes)
    }
}
