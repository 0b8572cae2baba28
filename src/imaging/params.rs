//! Parameter types for image operations.
//!
//! These structs describe *what* to draw or encode, not *how*. They are the
//! interface between callers (the compositor, the gallery, the CLI) and the
//! pixel-level code in [`codec`](super::codec), [`paint`](super::paint) and
//! [`glyphs`](super::glyphs).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality as a fraction in `[0, 1]`. Clamped on construction.
//! - [`EncodeFormat`] / [`EncodeSettings`]: Output container plus quality.
//! - [`Color`]: Straight-alpha RGBA color, parsed from `#rrggbb` / `#rrggbbaa`.
//! - [`Point`]: A position in image pixel space.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Quality setting for lossy encoding, `0.0` (worst) to `1.0` (best).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality(f32);

impl Quality {
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// The 1–100 scale JPEG encoders expect.
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    /// Full quality, matching what the app used for photo saves.
    fn default() -> Self {
        Self(1.0)
    }
}

/// Output container for [`ImageCodec::encode`](super::ImageCodec::encode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeFormat {
    #[default]
    Png,
    Jpeg,
}

impl EncodeFormat {
    /// Pick a format from a file extension; anything that isn't JPEG is PNG.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => EncodeFormat::Jpeg,
            _ => EncodeFormat::Png,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            EncodeFormat::Png => "png",
            EncodeFormat::Jpeg => "jpg",
        }
    }
}

/// Format plus quality. Quality is ignored for PNG.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EncodeSettings {
    pub format: EncodeFormat,
    pub quality: Quality,
}

impl EncodeSettings {
    pub fn png() -> Self {
        Self {
            format: EncodeFormat::Png,
            quality: Quality::default(),
        }
    }

    pub fn jpeg(quality: Quality) -> Self {
        Self {
            format: EncodeFormat::Jpeg,
            quality,
        }
    }
}

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    #[cfg(test)]
    pub(crate) fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// This color with its alpha scaled by an 8-bit coverage value.
    pub fn with_coverage(self, coverage: u8) -> Rgba<u8> {
        let a = (u16::from(self.a) * u16::from(coverage) + 127) / 255;
        Rgba([self.r, self.g, self.b, a as u8])
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// A position in image pixel space. `(0, 0)` is the top-left corner of the
/// top-left pixel; pixel `(x, y)` has its center at `(x + 0.5, y + 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
