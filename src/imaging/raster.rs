//! The image value every stage passes around.
//!
//! A [`RasterImage`] is an immutable RGBA8 pixel buffer. Decoding keeps the
//! bytes it was decoded from so callers can re-export an untouched photo
//! without recompressing it; every derived image (composited, generated)
//! starts without an encoded form.

use image::RgbaImage;

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Immutable RGBA8 image, always at least 1×1.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixels: RgbaImage,
    encoded: Option<Vec<u8>>,
}

impl RasterImage {
    /// Wrap a pixel buffer. Returns `None` for a zero-sized buffer.
    pub fn new(pixels: RgbaImage) -> Option<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return None;
        }
        Some(Self {
            pixels,
            encoded: None,
        })
    }

    /// Wrap a decoded buffer together with the bytes it came from.
    pub(crate) fn with_encoded(pixels: RgbaImage, encoded: Vec<u8>) -> Option<Self> {
        let mut image = Self::new(pixels)?;
        image.encoded = Some(encoded);
        Some(image)
    }

    /// A new image derived from this one's pixels. Dimensions are inherited,
    /// so the non-zero invariant holds without re-checking.
    pub(crate) fn derive(&self, pixels: RgbaImage) -> Self {
        debug_assert_eq!(pixels.dimensions(), self.pixels.dimensions());
        Self {
            pixels,
            encoded: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// The bytes this image was decoded from, if it was decoded at all.
    pub fn encoded(&self) -> Option<&[u8]> {
        self.encoded.as_deref()
    }

    /// Pixel-level equality, ignoring any attached encoded form.
    pub fn same_pixels(&self, other: &RasterImage) -> bool {
        self.pixels.dimensions() == other.pixels.dimensions()
            && self.pixels.as_raw() == other.pixels.as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn zero_sized_buffer_is_rejected() {
        assert!(RasterImage::new(RgbaImage::new(0, 10)).is_none());
        assert!(RasterImage::new(RgbaImage::new(10, 0)).is_none());
    }

    #[test]
    fn same_pixels_ignores_encoded_form() {
        let pixels = RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255]));
        let plain = RasterImage::new(pixels.clone()).unwrap();
        let decoded = RasterImage::with_encoded(pixels, vec![0xde, 0xad]).unwrap();

        assert!(plain.same_pixels(&decoded));
        assert_eq!(plain.encoded(), None);
        assert_eq!(decoded.encoded(), Some(&[0xde, 0xad][..]));
    }

    #[test]
    fn derived_image_drops_encoded_form() {
        let pixels = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let decoded = RasterImage::with_encoded(pixels.clone(), vec![1, 2, 3]).unwrap();
        let derived = decoded.derive(pixels);

        assert_eq!(derived.encoded(), None);
        assert_eq!(
            derived.dimensions(),
            Dimensions {
                width: 2,
                height: 2
            }
        );
    }
}
