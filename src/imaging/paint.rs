//! Pixel painting primitives: source-over blending, overlays and straight
//! strokes.
//!
//! Blending is integer source-over on straight alpha, rounded to nearest, so
//! an opaque destination stays exactly opaque under any partial coverage.
//!
//! Strokes are aliased and use a half-open fill rule (a pixel is painted
//! when its center falls in `[edge, edge + extent)`), so a 5-wide stroke
//! paints exactly 5 rows and repeated draws are bit-identical.

use super::params::{Color, Point};
use image::{Rgba, RgbaImage};

/// Composite straight-alpha `src` over `dst` in place.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let a_s = u32::from(src[3]);
    if a_s == 0 {
        return;
    }
    if a_s == 255 {
        *dst = src;
        return;
    }
    let a_d = u32::from(dst[3]);
    // output alpha scaled by 255
    let a_out = a_s * 255 + a_d * (255 - a_s);
    for c in 0..3 {
        let num = u32::from(src[c]) * a_s * 255 + u32::from(dst[c]) * a_d * (255 - a_s);
        dst[c] = ((num + a_out / 2) / a_out) as u8;
    }
    dst[3] = ((a_out + 127) / 255) as u8;
}

/// Blend every pixel of `top` onto `canvas` with its top-left at `(x, y)`.
/// Parts that fall off the canvas are clipped.
pub fn overlay(canvas: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(top.width())).min(cw);
    let y1 = (y + i64::from(top.height())).min(ch);
    for cy in y0..y1 {
        for cx in x0..x1 {
            let src = *top.get_pixel((cx - x) as u32, (cy - y) as u32);
            blend_over(canvas.get_pixel_mut(cx as u32, cy as u32), src);
        }
    }
}

/// Source-over blend `color` at `coverage` onto pixel `(x, y)`. Out-of-bounds
/// coordinates are ignored.
pub fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Color, coverage: u8) {
    if coverage == 0 || x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u64, y as u64);
    if x >= u64::from(canvas.width()) || y >= u64::from(canvas.height()) {
        return;
    }
    blend_over(
        canvas.get_pixel_mut(x as u32, y as u32),
        color.with_coverage(coverage),
    );
}

/// Stroke the segment `from → to` with butt caps.
///
/// A pixel is painted when its center projects onto the segment within
/// `[0, length)` and lies within `[-width/2, width/2)` of it. Zero-length
/// segments and non-positive widths paint nothing.
pub fn stroke_segment(canvas: &mut RgbaImage, from: Point, to: Point, width: f32, color: Color) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = (dx * dx + dy * dy).sqrt();
    if !length.is_finite() || !width.is_finite() || length <= 0.0 || width <= 0.0 {
        return;
    }
    let half = width / 2.0;
    // unit direction and normal
    let (ux, uy) = (dx / length, dy / length);
    let (nx, ny) = (-uy, ux);

    let min_x = (from.x.min(to.x) - half).floor().max(0.0) as i64;
    let min_y = (from.y.min(to.y) - half).floor().max(0.0) as i64;
    let max_x = ((from.x.max(to.x) + half).ceil() as i64).min(i64::from(canvas.width()));
    let max_y = ((from.y.max(to.y) + half).ceil() as i64).min(i64::from(canvas.height()));

    for y in min_y..max_y {
        for x in min_x..max_x {
            let (px, py) = (x as f32 + 0.5 - from.x, y as f32 + 0.5 - from.y);
            let along = px * ux + py * uy;
            let across = px * nx + py * ny;
            if (0.0..length).contains(&along) && (-half..half).contains(&across) {
                blend_pixel(canvas, x, y, color, 255);
            }
        }
    }
}
