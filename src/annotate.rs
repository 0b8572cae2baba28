//! Annotation compositing: draw one layer onto a base image.
//!
//! Three layers are supported, one per [`AnnotationRequest`] variant:
//!
//! | Request | Placement | Drawing |
//! |---|---|---|
//! | `Logo` | fixed box, centered, `bottom_margin` above the bottom edge | Lanczos3 resize + source-over blend |
//! | `Text` | single line centered over the whole base | fontdue coverage blend |
//! | `Arrow` | explicit endpoints (see [`Compositor::marker_request`]) | solid stroke, butt caps |
//!
//! Overlays never shrink to fit: a logo box larger than the base hangs off
//! the canvas and is clipped, and long text is clipped at the edges. The
//! "arrow" is a plain line with no head.
//!
//! Compositing never touches the base; every call returns a new
//! [`RasterImage`].

use crate::imaging::{
    CodecError, Color, Dimensions, ImageCodec, Point, RasterImage, glyphs, logo_placement,
    marker_segment, paint,
};
use image::imageops::{self, FilterType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("base image could not be decoded: {0}")]
    Base(#[source] CodecError),
    #[error("overlay image could not be decoded: {0}")]
    Overlay(#[source] CodecError),
}

/// Sizes, colors and spans used when a request doesn't say otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationPolicy {
    pub logo_size: u32,
    pub logo_bottom_margin: u32,
    pub font_size: f32,
    pub text_color: Color,
    pub arrow_color: Color,
    pub arrow_width: f32,
    /// Horizontal span of the marker line as fractions of the base width.
    pub arrow_start: f32,
    pub arrow_end: f32,
}

impl Default for AnnotationPolicy {
    fn default() -> Self {
        Self {
            logo_size: 250,
            logo_bottom_margin: 50,
            font_size: 80.0,
            text_color: Color::RED,
            arrow_color: Color::BLUE,
            arrow_width: 5.0,
            arrow_start: 0.25,
            arrow_end: 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub text: String,
    pub color: Color,
    pub font_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowRequest {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub width: f32,
}

/// One layer to draw.
#[derive(Debug, Clone)]
pub enum AnnotationRequest {
    Logo(RasterImage),
    Text(TextRequest),
    Arrow(ArrowRequest),
}

impl AnnotationRequest {
    /// A logo request from encoded overlay bytes.
    pub fn logo_from_bytes(codec: &impl ImageCodec, bytes: &[u8]) -> Result<Self, CompositionError> {
        codec
            .decode(bytes)
            .map(AnnotationRequest::Logo)
            .map_err(CompositionError::Overlay)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnnotationRequest::Logo(_) => "logo",
            AnnotationRequest::Text(_) => "text",
            AnnotationRequest::Arrow(_) => "arrow",
        }
    }
}

/// Draws annotation requests according to an [`AnnotationPolicy`].
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    policy: AnnotationPolicy,
}

impl Compositor {
    pub fn new(policy: AnnotationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AnnotationPolicy {
        &self.policy
    }

    /// A text request in the policy's default size and color.
    pub fn text_request(&self, text: impl Into<String>) -> AnnotationRequest {
        AnnotationRequest::Text(TextRequest {
            text: text.into(),
            color: self.policy.text_color,
            font_size: self.policy.font_size,
        })
    }

    /// The horizontal marker line for a base of the given size.
    pub fn marker_request(&self, target: Dimensions) -> AnnotationRequest {
        let (from, to) = marker_segment(target, self.policy.arrow_start, self.policy.arrow_end);
        AnnotationRequest::Arrow(ArrowRequest {
            from,
            to,
            color: self.policy.arrow_color,
            width: self.policy.arrow_width,
        })
    }

    /// Draw `request` onto a copy of `base`.
    pub fn compose(&self, base: &RasterImage, request: &AnnotationRequest) -> RasterImage {
        let mut canvas = base.pixels().clone();
        match request {
            AnnotationRequest::Logo(overlay) => self.draw_logo(&mut canvas, overlay),
            AnnotationRequest::Text(req) => {
                glyphs::draw_centered(&mut canvas, &req.text, req.font_size, req.color);
            }
            AnnotationRequest::Arrow(req) => {
                paint::stroke_segment(&mut canvas, req.from, req.to, req.width, req.color);
            }
        }
        log::debug!(
            "composed {} onto {}x{}",
            request.kind(),
            base.width(),
            base.height()
        );
        base.derive(canvas)
    }

    /// Decode `base_bytes` and draw `request` onto it.
    pub fn compose_encoded(
        &self,
        codec: &impl ImageCodec,
        base_bytes: &[u8],
        request: &AnnotationRequest,
    ) -> Result<RasterImage, CompositionError> {
        let base = codec.decode(base_bytes).map_err(CompositionError::Base)?;
        Ok(self.compose(&base, request))
    }

    fn draw_logo(&self, canvas: &mut image::RgbaImage, overlay: &RasterImage) {
        let size = self.policy.logo_size;
        if size == 0 {
            return;
        }
        let target = Dimensions {
            width: canvas.width(),
            height: canvas.height(),
        };
        let placement = logo_placement(target, size, self.policy.logo_bottom_margin);
        if placement.visible_in(target).is_none() {
            log::debug!("logo box {placement:?} lies entirely off a {target:?} canvas");
            return;
        }
        let scaled = imageops::resize(overlay.pixels(), size, size, FilterType::Lanczos3);
        paint::overlay(canvas, &scaled, placement.x, placement.y);
    }
}
