//! Handing finished images to the host.
//!
//! Clipboard, share sheet and photo library belong to the host platform.
//! The core only calls them through [`ExportGateway`] and reports what
//! happened as an [`ExportReport`] carrying the message the user sees.
//! Host failures are opaque: a gateway returns [`ExportStatus::Failed`]
//! and logs its own reason.
//!
//! [`LibraryFolder`] is the gateway the CLI uses: "photo library" is a
//! directory, and clipboard and share sheet are unavailable.

use crate::imaging::{EncodeSettings, ImageCodec, RasterImage, RustCodec};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of a host capability call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    Copy,
    Share,
    SaveToLibrary,
}

impl fmt::Display for ExportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportAction::Copy => "copy",
            ExportAction::Share => "share",
            ExportAction::SaveToLibrary => "save to library",
        };
        f.write_str(name)
    }
}

/// Host capabilities the core can invoke but doesn't implement.
pub trait ExportGateway {
    fn copy_to_clipboard(&mut self, image: &RasterImage) -> ExportStatus;
    fn present_share_sheet(&mut self, image: &RasterImage) -> ExportStatus;
    fn save_to_photo_library(&mut self, image: &RasterImage) -> ExportStatus;
}

/// What an export did, with the message to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub action: ExportAction,
    pub status: ExportStatus,
    pub message: &'static str,
}

pub const NO_IMAGE_MESSAGE: &str = "Please select an image first.";

fn message(action: ExportAction, status: ExportStatus) -> &'static str {
    match (action, status) {
        (ExportAction::Copy, ExportStatus::Completed) => "Image copied to clipboard.",
        (ExportAction::Share, ExportStatus::Completed) => "Share sheet opened.",
        (ExportAction::SaveToLibrary, ExportStatus::Completed) => "Image Downloaded to Photos.",
        (ExportAction::Copy, ExportStatus::Failed) => "Image could not be copied.",
        (ExportAction::Share, ExportStatus::Failed) => "Image could not be shared.",
        (ExportAction::SaveToLibrary, ExportStatus::Failed) => "Image could not be saved to Photos.",
    }
}

/// Run `action` through `gateway`. With no image the gateway isn't called
/// and the report asks the user to pick one.
pub fn perform(
    gateway: &mut impl ExportGateway,
    action: ExportAction,
    image: Option<&RasterImage>,
) -> ExportReport {
    let Some(image) = image else {
        return ExportReport {
            action,
            status: ExportStatus::Failed,
            message: NO_IMAGE_MESSAGE,
        };
    };
    let status = match action {
        ExportAction::Copy => gateway.copy_to_clipboard(image),
        ExportAction::Share => gateway.present_share_sheet(image),
        ExportAction::SaveToLibrary => gateway.save_to_photo_library(image),
    };
    if status == ExportStatus::Failed {
        log::warn!("{action} failed for {}x{} image", image.width(), image.height());
    }
    ExportReport {
        action,
        status,
        message: message(action, status),
    }
}

/// Photo library backed by a directory.
///
/// Files are named after a SHA-256 of their encoded bytes, so saving the
/// same image twice leaves a single file.
pub struct LibraryFolder<C = RustCodec> {
    dir: PathBuf,
    codec: C,
    settings: EncodeSettings,
    last_saved: Option<PathBuf>,
}

impl LibraryFolder<RustCodec> {
    pub fn new(dir: impl Into<PathBuf>, settings: EncodeSettings) -> Self {
        Self::with_codec(dir, settings, RustCodec::new())
    }
}

impl<C: ImageCodec> LibraryFolder<C> {
    pub fn with_codec(dir: impl Into<PathBuf>, settings: EncodeSettings, codec: C) -> Self {
        Self {
            dir: dir.into(),
            codec,
            settings,
            last_saved: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recent successful save.
    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }

    fn save(&mut self, image: &RasterImage) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let bytes = self.codec.encode(image, self.settings)?;
        let digest = format!("{:x}", Sha256::digest(&bytes));
        let path = self.dir.join(format!(
            "IMG-{}.{}",
            &digest[..12],
            self.settings.format.extension()
        ));
        if path.exists() {
            log::debug!("{} already in library", path.display());
        } else {
            std::fs::create_dir_all(&self.dir)?;
            std::fs::write(&path, &bytes)?;
            log::info!("saved {} ({} bytes)", path.display(), bytes.len());
        }
        Ok(path)
    }
}

impl<C: ImageCodec> ExportGateway for LibraryFolder<C> {
    fn copy_to_clipboard(&mut self, _image: &RasterImage) -> ExportStatus {
        log::warn!("no clipboard available to a command-line host");
        ExportStatus::Failed
    }

    fn present_share_sheet(&mut self, _image: &RasterImage) -> ExportStatus {
        log::warn!("no share sheet available to a command-line host");
        ExportStatus::Failed
    }

    fn save_to_photo_library(&mut self, image: &RasterImage) -> ExportStatus {
        match self.save(image) {
            Ok(path) => {
                self.last_saved = Some(path);
                ExportStatus::Completed
            }
            Err(e) => {
                log::warn!("saving into {} failed: {e}", self.dir.display());
                ExportStatus::Failed
            }
        }
    }
}
