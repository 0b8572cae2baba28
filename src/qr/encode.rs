//! Text to QR raster.

use super::{QrCodec, QrError};
use crate::imaging::RasterImage;
use image::{Rgba, RgbaImage};
use qrcode::{Color, QrCode};

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Largest rendered side, in pixels.
pub const MAX_SIDE: u32 = 16_384;

pub(super) fn render(text: &str, settings: &QrCodec) -> Result<RasterImage, QrError> {
    if text.is_empty() {
        return Err(QrError::EmptyInput);
    }
    let code = QrCode::with_error_correction_level(text.as_bytes(), settings.error_correction.ec_level())
        .map_err(|e| QrError::Encode(e.to_string()))?;
    let modules = code.to_colors();
    let width = code.width();

    let scale = settings.module_scale.max(1);
    let quiet = settings.quiet_zone;
    let side = quiet
        .checked_mul(2)
        .and_then(|q| q.checked_add(width as u32))
        .and_then(|modules| modules.checked_mul(scale))
        .filter(|&side| side <= MAX_SIDE)
        .ok_or_else(|| {
            QrError::Encode(format!(
                "{width}-module symbol at scale {scale} with quiet zone {quiet} exceeds {MAX_SIDE}px"
            ))
        })?;

    let pixels = RgbaImage::from_fn(side, side, |x, y| {
        let mx = (x / scale).checked_sub(quiet).map(|v| v as usize);
        let my = (y / scale).checked_sub(quiet).map(|v| v as usize);
        match (mx, my) {
            (Some(mx), Some(my)) if mx < width && my < width => {
                if modules[my * width + mx] == Color::Dark {
                    DARK
                } else {
                    LIGHT
                }
            }
            _ => LIGHT,
        }
    });
    log::debug!(
        "encoded {} bytes as a {width}x{width} QR code ({side}px)",
        text.len()
    );
    RasterImage::new(pixels).ok_or_else(|| QrError::Encode("empty symbol".into()))
}
