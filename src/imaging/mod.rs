//! Image processing: pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from magic bytes) |
//! | **Encode** | `PngEncoder` / `JpegEncoder` |
//! | **Logo resize** | `image::imageops::resize` with Lanczos3 |
//! | **Logo overlay** | `image::imageops::overlay` (clips to the canvas) |
//! | **Text** | `fontdue` rasterizer + embedded DejaVu Sans |
//! | **Strokes** | [`paint::stroke_segment`], aliased, half-open fill |
//!
//! The module is split into:
//! - **Raster**: [`RasterImage`], the immutable value passed between stages
//! - **Calculations**: Pure placement math (unit testable)
//! - **Parameters**: Colors, points, encode settings
//! - **Codec**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Paint / Glyphs**: Pixel-level drawing used by the compositor

pub mod codec;
mod calculations;
pub mod glyphs;
pub mod paint;
mod params;
mod raster;
pub mod rust_codec;

pub use calculations::{Placement, centered_origin, logo_placement, marker_segment};
pub use codec::{CodecError, ImageCodec};
pub use params::{Color, EncodeFormat, EncodeSettings, Point, Quality};
pub use raster::{Dimensions, RasterImage};
pub use rust_codec::RustCodec;
