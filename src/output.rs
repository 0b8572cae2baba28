//! CLI output formatting.
//!
//! # Messages First
//!
//! Every command leads with the same short confirmation the app showed in
//! its alert ("Logo added to image.", "Image has been saved!"), then adds
//! indented context lines: where the file went and how big it is.
//!
//! ```text
//! Logo added to image.
//!     Output: marked.png (1000x1000)
//!     Saved to gallery as 003
//! ```
//!
//! ## Gallery
//!
//! ```text
//! Gallery (2 images)
//! 001 1000x750
//! 002 290x290
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::annotate::AnnotationRequest;
use crate::config::MarkConfig;
use crate::export::{ExportReport, ExportStatus};
use crate::gallery::GalleryEntry;
use crate::imaging::Dimensions;
use std::path::Path;

pub const SAVED_MESSAGE: &str = "Image has been saved!";
pub const DELETED_MESSAGE: &str = "Image deleted.";
pub const QR_GENERATED_MESSAGE: &str = "QR Code generated.";

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn size(dimensions: Dimensions) -> String {
    format!("{}x{}", dimensions.width, dimensions.height)
}

/// Confirmation shown after an annotation is drawn.
pub fn annotation_message(request: &AnnotationRequest) -> &'static str {
    match request {
        AnnotationRequest::Logo(_) => "Logo added to image.",
        AnnotationRequest::Text(_) => "Text added to image.",
        AnnotationRequest::Arrow(_) => "Arrow added to image.",
    }
}

/// Output of a command that wrote an image.
///
/// `gallery_position` is the 1-based position when `--save` appended it.
pub fn format_written(
    message: &str,
    output: &Path,
    dimensions: Dimensions,
    gallery_position: Option<usize>,
) -> Vec<String> {
    let mut lines = vec![
        message.to_string(),
        format!("{}Output: {} ({})", indent(1), output.display(), size(dimensions)),
    ];
    if let Some(pos) = gallery_position {
        lines.push(format!("{}Saved to gallery as {}", indent(1), format_index(pos)));
    }
    lines
}

pub fn print_written(
    message: &str,
    output: &Path,
    dimensions: Dimensions,
    gallery_position: Option<usize>,
) {
    for line in format_written(message, output, dimensions, gallery_position) {
        println!("{}", line);
    }
}

/// Gallery listing: a header with the count, then one line per entry.
pub fn format_gallery(entries: &[GalleryEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No images available".to_string()];
    }
    let noun = if entries.len() == 1 { "image" } else { "images" };
    let mut lines = vec![format!("Gallery ({} {})", entries.len(), noun)];
    for entry in entries {
        lines.push(format!(
            "{} {}",
            format_index(entry.index + 1),
            size(entry.image.dimensions())
        ));
    }
    lines
}

pub fn print_gallery(entries: &[GalleryEntry]) {
    for line in format_gallery(entries) {
        println!("{}", line);
    }
}

/// Output after a gallery entry was added, from a file or a command.
pub fn format_gallery_added(position: usize, dimensions: Dimensions) -> Vec<String> {
    vec![
        SAVED_MESSAGE.to_string(),
        format!("{}{} {}", indent(1), format_index(position), size(dimensions)),
    ]
}

pub fn print_gallery_added(position: usize, dimensions: Dimensions) {
    for line in format_gallery_added(position, dimensions) {
        println!("{}", line);
    }
}

/// Output after `gallery remove`. `position` is 1-based.
pub fn format_gallery_removed(position: usize, removed: Dimensions, remaining: usize) -> Vec<String> {
    vec![
        DELETED_MESSAGE.to_string(),
        format!("{}Removed {} ({})", indent(1), format_index(position), size(removed)),
        format!("{}{} remaining", indent(1), remaining),
    ]
}

pub fn print_gallery_removed(position: usize, removed: Dimensions, remaining: usize) {
    for line in format_gallery_removed(position, removed, remaining) {
        println!("{}", line);
    }
}

pub fn format_qr_decoded(text: &str) -> Vec<String> {
    vec![format!("Scanned QR Code: {}", text)]
}

/// Export outcome. `saved_to` is the library file when one was written.
pub fn format_export(report: &ExportReport, saved_to: Option<&Path>) -> Vec<String> {
    let mut lines = vec![report.message.to_string()];
    if report.status == ExportStatus::Completed {
        if let Some(path) = saved_to {
            lines.push(format!("{}Library: {}", indent(1), path.display()));
        }
    }
    lines
}

pub fn print_export(report: &ExportReport, saved_to: Option<&Path>) {
    for line in format_export(report, saved_to) {
        println!("{}", line);
    }
}

/// Summary of the resolved configuration, for `check-config`.
pub fn format_config_summary(config: &MarkConfig, root: &Path) -> Vec<String> {
    vec![
        "Config".to_string(),
        format!(
            "{}Logo: {}px box, {}px from bottom",
            indent(1),
            config.logo.size,
            config.logo.bottom_margin
        ),
        format!(
            "{}Text: {}px {}",
            indent(1),
            config.text.font_size,
            config.text.color
        ),
        format!(
            "{}Arrow: {} {}px from {} to {}",
            indent(1),
            config.arrow.color,
            config.arrow.width,
            config.arrow.start,
            config.arrow.end
        ),
        format!(
            "{}QR: {}px modules, quiet zone {}, level {:?}",
            indent(1),
            config.qr.module_scale,
            config.qr.quiet_zone,
            config.qr.error_correction
        ),
        format!(
            "{}Gallery: {} [{}] as {}",
            indent(1),
            config.gallery_path(root).display(),
            config.gallery.slot,
            config.gallery.format.extension()
        ),
        format!(
            "{}Library: {} as {}",
            indent(1),
            config.library_dir(root).display(),
            config.export.format.extension()
        ),
    ]
}

pub fn print_config_summary(config: &MarkConfig, root: &Path) {
    for line in format_config_summary(config, root) {
        println!("{}", line);
    }
}
