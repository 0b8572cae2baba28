//! QR code generation and reading.
//!
//! | Direction | Implementation |
//! |---|---|
//! | Text → image | `qrcode` crate builds the module matrix; [`encode`] scales it up with a quiet zone |
//! | Image → text | [`detect`] finds finder patterns, [`decode`] samples the grid and parses segments |
//!
//! Reading handles one axis-aligned symbol per image. When several symbols
//! are present, the one whose finder patterns come first in top-to-bottom,
//! left-to-right scan order wins. Format information is matched against
//! its BCH code words (up to 3 bit errors); data codewords are checked with
//! their Reed–Solomon syndromes but never corrected.

mod decode;
mod detect;
mod encode;
mod tables;

use crate::imaging::RasterImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QrError {
    #[error("nothing to encode: QR payload is empty")]
    EmptyInput,
    #[error("QR encode failed: {0}")]
    Encode(String),
    #[error("no readable QR code found")]
    NotFound,
}

/// Error-correction level. Higher levels survive more damage at the cost of
/// a larger symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrection {
    pub(crate) fn ordinal(self) -> usize {
        match self {
            ErrorCorrection::L => 0,
            ErrorCorrection::M => 1,
            ErrorCorrection::Q => 2,
            ErrorCorrection::H => 3,
        }
    }

    /// The two-bit level indicator stored in format information.
    pub(crate) fn format_bits(self) -> u32 {
        match self {
            ErrorCorrection::L => 1,
            ErrorCorrection::M => 0,
            ErrorCorrection::Q => 3,
            ErrorCorrection::H => 2,
        }
    }

    fn ec_level(self) -> qrcode::EcLevel {
        match self {
            ErrorCorrection::L => qrcode::EcLevel::L,
            ErrorCorrection::M => qrcode::EcLevel::M,
            ErrorCorrection::Q => qrcode::EcLevel::Q,
            ErrorCorrection::H => qrcode::EcLevel::H,
        }
    }
}

/// QR generation settings plus the reader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrCodec {
    /// Pixels per module, applied to both axes.
    pub module_scale: u32,
    /// Light border width in modules.
    pub quiet_zone: u32,
    pub error_correction: ErrorCorrection,
}

impl Default for QrCodec {
    fn default() -> Self {
        Self {
            module_scale: 10,
            quiet_zone: 4,
            error_correction: ErrorCorrection::M,
        }
    }
}

impl QrCodec {
    /// Render `text` as a black-on-white QR code.
    pub fn encode(&self, text: &str) -> Result<RasterImage, QrError> {
        encode::render(text, self)
    }

    /// Read the first QR code in `image`. Independent of this codec's
    /// generation settings.
    pub fn decode(&self, image: &RasterImage) -> Result<String, QrError> {
        read(image)
    }
}

/// Read the first QR code in `image`.
pub fn read(image: &RasterImage) -> Result<String, QrError> {
    let Some(matrix) = detect::BitMatrix::from_image(image.pixels()) else {
        log::debug!("image has too little contrast for a QR code");
        return Err(QrError::NotFound);
    };
    let finders = detect::find_finders(&matrix);
    log::debug!("found {} finder pattern candidates", finders.len());
    for triple in detect::candidate_triples(&finders) {
        if let Some(text) = decode::decode_symbol(&matrix, &triple) {
            return Ok(text);
        }
    }
    Err(QrError::NotFound)
}
