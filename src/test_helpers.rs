//! Shared test utilities for the markmaker test suite.
//!
//! Synthetic image builders and pixel-diff helpers, so tests never need
//! fixture files on disk.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let base = solid(1000, 1000, WHITE);
//! let out = compositor.compose(&base, &request);
//! assert_eq!(diff_bounds(&base, &out), Some((375, 700, 625, 950)));
//! ```

use crate::imaging::RasterImage;
use image::{Rgba, RgbaImage};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

// =========================================================================
// Builders
// =========================================================================

/// Uniformly filled image.
pub fn solid(width: u32, height: u32, fill: Rgba<u8>) -> RasterImage {
    RasterImage::new(RgbaImage::from_pixel(width, height, fill)).unwrap()
}

/// Smooth gradient with distinct values in every channel, so lossless
/// round trips are actually checked.
pub fn gradient(width: u32, height: u32) -> RasterImage {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    });
    RasterImage::new(pixels).unwrap()
}

/// Black/white checkerboard with `cell`-sized squares, a stand-in logo.
pub fn checker(width: u32, height: u32, cell: u32) -> RasterImage {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { BLACK } else { WHITE }
    });
    RasterImage::new(pixels).unwrap()
}

// =========================================================================
// Pixel assertions
// =========================================================================

/// Bounding box `(x0, y0, x1, y1)` (exclusive ends) of every pixel that
/// differs between two same-sized images. `None` when identical.
pub fn diff_bounds(a: &RasterImage, b: &RasterImage) -> Option<(u32, u32, u32, u32)> {
    assert_eq!(a.dimensions(), b.dimensions(), "images differ in size");
    let mut out: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in a.pixels().enumerate_pixels() {
        if p != b.pixels().get_pixel(x, y) {
            out = Some(match out {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
    }
    out
}

/// Number of pixels exactly equal to `color`.
pub fn count_pixels(image: &RasterImage, color: Rgba<u8>) -> usize {
    image.pixels().pixels().filter(|p| **p == color).count()
}
