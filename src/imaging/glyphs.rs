//! Single-line text rendering with an embedded font.
//!
//! Glyphs are rasterized with fontdue and blended as coverage masks, so the
//! edges are antialiased but the output is fully deterministic.

use super::calculations::centered_origin;
use super::paint::blend_pixel;
use super::params::{Color, Point};
use super::raster::Dimensions;
use fontdue::{Font, FontSettings};
use image::RgbaImage;
use std::sync::OnceLock;

/// Largest font size, in pixels, that text is drawn at.
pub const MAX_FONT_SIZE: f32 = 2048.0;

static FONT: OnceLock<Font> = OnceLock::new();

fn font() -> &'static Font {
    FONT.get_or_init(|| {
        let bytes = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
        Font::from_bytes(bytes as &[u8], FontSettings::default())
            .expect("embedded DejaVuSans.ttf is a valid font")
    })
}

/// Measured extent of a line of text at a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    /// Sum of advances plus kerning.
    pub width: f32,
    /// Distance from the top of the line box to the baseline.
    pub ascent: f32,
    /// Line box height (ascent plus descent).
    pub height: f32,
}

/// Measure `text` as a single line at `px` pixels.
pub fn measure(text: &str, px: f32) -> TextExtent {
    let font = font();
    let (ascent, descent) = match font.horizontal_line_metrics(px) {
        Some(m) => (m.ascent, m.descent),
        None => (px, 0.0),
    };
    let mut width = 0.0;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(p) = prev {
            width += font.horizontal_kern(p, ch, px).unwrap_or(0.0);
        }
        width += font.metrics(ch, px).advance_width;
        prev = Some(ch);
    }
    TextExtent {
        width,
        ascent,
        height: ascent - descent,
    }
}

/// Draw `text` centered on the canvas, returning the top-left of its line
/// box. Sizes that are not finite, not positive, or above `MAX_FONT_SIZE`
/// draw nothing.
pub fn draw_centered(canvas: &mut RgbaImage, text: &str, px: f32, color: Color) -> Option<Point> {
    if !px.is_finite() || px <= 0.0 || px > MAX_FONT_SIZE || text.is_empty() {
        return None;
    }
    let extent = measure(text, px);
    let target = Dimensions {
        width: canvas.width(),
        height: canvas.height(),
    };
    let origin = centered_origin(target, extent.width, extent.height);
    draw_line(canvas, text, px, color, origin, extent.ascent);
    Some(origin)
}

fn draw_line(canvas: &mut RgbaImage, text: &str, px: f32, color: Color, origin: Point, ascent: f32) {
    let font = font();
    let baseline = (origin.y + ascent).round() as i64;
    let mut pen = origin.x;
    let mut prev: Option<char> = None;

    for ch in text.chars() {
        if let Some(p) = prev {
            pen += font.horizontal_kern(p, ch, px).unwrap_or(0.0);
        }
        let (metrics, coverage) = font.rasterize(ch, px);
        // ymin is the bitmap's bottom edge relative to the baseline, up positive
        let left = pen.round() as i64 + i64::from(metrics.xmin);
        let top = baseline - i64::from(metrics.ymin) - metrics.height as i64;

        for (i, &c) in coverage.iter().enumerate() {
            let gx = (i % metrics.width) as i64;
            let gy = (i / metrics.width) as i64;
            blend_pixel(canvas, left + gx, top + gy, color, c);
        }
        pen += metrics.advance_width;
        prev = Some(ch);
    }
}
