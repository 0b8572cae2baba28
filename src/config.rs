//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! are the values the original app hard-coded; a user config file only
//! overrides what it names.
//!
//! ## Config File Location
//!
//! `config.toml` is read from the working directory (`--dir` on the CLI).
//! Relative paths inside it (`gallery.path`, `export.library_dir`) resolve
//! against that same directory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [logo]
//! size = 250                # Side of the square logo box, in pixels
//! bottom_margin = 50        # Gap between the box and the bottom edge
//!
//! [text]
//! font_size = 80.0
//! color = "#ff0000"
//!
//! [arrow]
//! color = "#0000ff"
//! width = 5.0
//! start = 0.25              # Fractions of the image width
//! end = 0.75
//!
//! [qr]
//! module_scale = 10         # Pixels per module
//! quiet_zone = 4            # Light border, in modules
//! error_correction = "M"    # L, M, Q or H
//!
//! [gallery]
//! path = "gallery.json"
//! slot = "SavedImages"
//! format = "png"            # png or jpeg
//! quality = 1.0             # 0.0 - 1.0, JPEG only
//!
//! [export]
//! library_dir = "library"
//! format = "png"
//! quality = 1.0
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::annotate::AnnotationPolicy;
use crate::gallery::DEFAULT_SLOT;
use crate::imaging::glyphs::MAX_FONT_SIZE;
use crate::imaging::{Color, EncodeFormat, EncodeSettings, Quality};
use crate::qr::{ErrorCorrection, QrCodec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkConfig {
    pub logo: LogoConfig,
    pub text: TextConfig,
    pub arrow: ArrowConfig,
    pub qr: QrConfig,
    pub gallery: GalleryConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoConfig {
    /// Side length of the square box the logo is scaled into.
    pub size: u32,
    /// Distance from the bottom of the box to the bottom edge of the image.
    pub bottom_margin: u32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            size: 250,
            bottom_margin: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub font_size: f32,
    pub color: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: 80.0,
            color: "#ff0000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrowConfig {
    pub color: String,
    pub width: f32,
    pub start: f32,
    pub end: f32,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            color: "#0000ff".to_string(),
            width: 5.0,
            start: 0.25,
            end: 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QrConfig {
    pub module_scale: u32,
    pub quiet_zone: u32,
    pub error_correction: ErrorCorrection,
}

impl Default for QrConfig {
    fn default() -> Self {
        let codec = QrCodec::default();
        Self {
            module_scale: codec.module_scale,
            quiet_zone: codec.quiet_zone,
            error_correction: codec.error_correction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// JSON file holding the gallery, relative to the config directory.
    pub path: String,
    pub slot: String,
    pub format: EncodeFormat,
    pub quality: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            path: "gallery.json".to_string(),
            slot: DEFAULT_SLOT.to_string(),
            format: EncodeFormat::Png,
            quality: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory standing in for the photo library.
    pub library_dir: String,
    pub format: EncodeFormat,
    pub quality: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            library_dir: "library".to_string(),
            format: EncodeFormat::Png,
            quality: 1.0,
        }
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, ConfigError> {
    Color::from_hex(value).ok_or_else(|| {
        ConfigError::Validation(format!("{field} must be #rrggbb or #rrggbbaa, got {value:?}"))
    })
}

fn check_fraction(field: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{field} must be 0.0-1.0")))
    }
}

/// Largest logo box side and stroke width, in pixels.
pub const MAX_OVERLAY_SIZE: u32 = 8192;
/// Largest QR module size, in pixels.
pub const MAX_MODULE_SCALE: u32 = 100;
/// Widest QR quiet zone, in modules.
pub const MAX_QUIET_ZONE: u32 = 40;

fn check_positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{field} must be positive")))
    }
}

fn check_at_most(field: &str, value: f64, max: f64) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{field} must be at most {max}")))
    }
}

/// Check a text size given in the config or on the command line.
pub fn check_font_size(field: &str, value: f32) -> Result<(), ConfigError> {
    check_positive(field, value)?;
    check_at_most(field, f64::from(value), f64::from(MAX_FONT_SIZE))
}

impl MarkConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logo.size == 0 {
            return Err(ConfigError::Validation("logo.size must be non-zero".into()));
        }
        check_at_most("logo.size", f64::from(self.logo.size), f64::from(MAX_OVERLAY_SIZE))?;
        check_font_size("text.font_size", self.text.font_size)?;
        parse_color("text.color", &self.text.color)?;
        parse_color("arrow.color", &self.arrow.color)?;
        check_positive("arrow.width", self.arrow.width)?;
        check_at_most("arrow.width", f64::from(self.arrow.width), f64::from(MAX_OVERLAY_SIZE))?;
        check_fraction("arrow.start", self.arrow.start)?;
        check_fraction("arrow.end", self.arrow.end)?;
        if self.arrow.start > self.arrow.end {
            return Err(ConfigError::Validation(
                "arrow.start must not be greater than arrow.end".into(),
            ));
        }
        if self.qr.module_scale == 0 {
            return Err(ConfigError::Validation(
                "qr.module_scale must be non-zero".into(),
            ));
        }
        check_at_most("qr.module_scale", f64::from(self.qr.module_scale), f64::from(MAX_MODULE_SCALE))?;
        check_at_most("qr.quiet_zone", f64::from(self.qr.quiet_zone), f64::from(MAX_QUIET_ZONE))?;
        if self.gallery.path.is_empty() || self.gallery.slot.is_empty() {
            return Err(ConfigError::Validation(
                "gallery.path and gallery.slot must not be empty".into(),
            ));
        }
        check_fraction("gallery.quality", self.gallery.quality)?;
        if self.export.library_dir.is_empty() {
            return Err(ConfigError::Validation(
                "export.library_dir must not be empty".into(),
            ));
        }
        check_fraction("export.quality", self.export.quality)?;
        Ok(())
    }

    /// Compositor policy from the `[logo]`, `[text]` and `[arrow]` sections.
    pub fn annotation_policy(&self) -> Result<AnnotationPolicy, ConfigError> {
        Ok(AnnotationPolicy {
            logo_size: self.logo.size,
            logo_bottom_margin: self.logo.bottom_margin,
            font_size: self.text.font_size,
            text_color: parse_color("text.color", &self.text.color)?,
            arrow_color: parse_color("arrow.color", &self.arrow.color)?,
            arrow_width: self.arrow.width,
            arrow_start: self.arrow.start,
            arrow_end: self.arrow.end,
        })
    }

    pub fn qr_codec(&self) -> QrCodec {
        QrCodec {
            module_scale: self.qr.module_scale,
            quiet_zone: self.qr.quiet_zone,
            error_correction: self.qr.error_correction,
        }
    }

    pub fn gallery_settings(&self) -> EncodeSettings {
        EncodeSettings {
            format: self.gallery.format,
            quality: Quality::new(self.gallery.quality),
        }
    }

    pub fn export_settings(&self) -> EncodeSettings {
        EncodeSettings {
            format: self.export.format,
            quality: Quality::new(self.export.quality),
        }
    }

    /// Gallery file, resolved against `root`.
    pub fn gallery_path(&self, root: &Path) -> PathBuf {
        root.join(&self.gallery.path)
    }

    /// Library directory, resolved against `root`.
    pub fn library_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.export.library_dir)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(MarkConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if there is no `config.toml` in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<MarkConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: MarkConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<MarkConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    let config = resolve_config(overlay)?;
    log::debug!("loaded config from {}", dir.display());
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# MarkMaker Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Logo overlay
# ---------------------------------------------------------------------------
[logo]
# Side length in pixels of the square box the logo is scaled into.
# The box is centered horizontally; logos bigger than the image are clipped.
# At most 8192.
size = 250

# Gap in pixels between the bottom of the box and the bottom edge.
bottom_margin = 50

# ---------------------------------------------------------------------------
# Text overlay
# ---------------------------------------------------------------------------
[text]
# Font size in pixels, at most 2048. Text is drawn on one line and never
# shrunk to fit.
font_size = 80.0

# Color as #rrggbb or #rrggbbaa.
color = "#ff0000"

# ---------------------------------------------------------------------------
# Arrow overlay (a horizontal line across the vertical center)
# ---------------------------------------------------------------------------
[arrow]
color = "#0000ff"

# Stroke width in pixels, at most 8192.
width = 5.0

# Start and end of the line as fractions of the image width.
start = 0.25
end = 0.75

# ---------------------------------------------------------------------------
# QR codes
# ---------------------------------------------------------------------------
[qr]
# Pixels per QR module, at most 100.
module_scale = 10

# Light border around the symbol, in modules. At most 40.
quiet_zone = 4

# Error correction level: "L", "M", "Q" or "H".
error_correction = "M"

# ---------------------------------------------------------------------------
# Gallery
# ---------------------------------------------------------------------------
[gallery]
# JSON file holding saved images, relative to this directory.
path = "gallery.json"

# Key the images are stored under inside that file.
slot = "SavedImages"

# Encoding for saved images: "png" or "jpeg".
format = "png"

# JPEG quality, 0.0 (worst) to 1.0 (best). Ignored for PNG.
quality = 1.0

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Directory that stands in for the photo library.
library_dir = "library"

format = "png"
quality = 1.0
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_app_constants() {
        let config = MarkConfig::default();
        assert_eq!(config.logo.size, 250);
        assert_eq!(config.logo.bottom_margin, 50);
        assert_eq!(config.text.font_size, 80.0);
        assert_eq!(config.text.color, "#ff0000");
        assert_eq!(config.arrow.color, "#0000ff");
        assert_eq!(config.arrow.width, 5.0);
        assert_eq!(config.qr.module_scale, 10);
        assert_eq!(config.qr.error_correction, ErrorCorrection::M);
        assert_eq!(config.gallery.slot, "SavedImages");
    }

    #[test]
    fn default_policy_equals_compositor_default() {
        let policy = MarkConfig::default().annotation_policy().unwrap();
        assert_eq!(policy, AnnotationPolicy::default());
        assert_eq!(MarkConfig::default().qr_codec(), QrCodec::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[text]
color = "#00ff00"
"##;
        let config: MarkConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.text.color, "#00ff00");
        // defaults preserved
        assert_eq!(config.text.font_size, 80.0);
        assert_eq!(config.logo.size, 250);
    }

    #[test]
    fn parse_formats_and_levels() {
        let toml = r#"
[qr]
error_correction = "H"

[gallery]
format = "jpeg"
quality = 0.8
"#;
        let config: MarkConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.qr_codec().error_correction, ErrorCorrection::H);
        let settings = config.gallery_settings();
        assert_eq!(settings.format, EncodeFormat::Jpeg);
        assert_eq!(settings.quality.percent(), 80);
        assert_eq!(config.export_settings(), EncodeSettings::png());
    }

    #[test]
    fn policy_uses_configured_colors() {
        let mut config = MarkConfig::default();
        config.text.color = "#11223380".into();
        config.arrow.color = "00ff00".into();
        let policy = config.annotation_policy().unwrap();
        assert_eq!(
            policy.text_color,
            Color {
                r: 0x11,
                g: 0x22,
                b: 0x33,
                a: 0x80
            }
        );
        assert_eq!(policy.arrow_color, Color::rgb(0, 255, 0));
    }

    #[test]
    fn paths_resolve_against_root() {
        let config = MarkConfig::default();
        let root = Path::new("/tmp/work");
        assert_eq!(config.gallery_path(root), root.join("gallery.json"));
        assert_eq!(config.library_dir(root), root.join("library"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, MarkConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[logo]
size = 120

[arrow]
start = 0.1
end = 0.9
"#,
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.logo.size, 120);
        assert_eq!(config.logo.bottom_margin, 50);
        assert_eq!(config.arrow.start, 0.1);
        assert_eq!(config.arrow.end, 0.9);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[logo\nsize = ").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[qr]
module_scale = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"size = 250"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"size = 100"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("size").unwrap().as_integer(), Some(100));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[logo]
size = 250
bottom_margin = 50
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[logo]
size = 120
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let logo = merged.get("logo").unwrap();
        assert_eq!(logo.get("size").unwrap().as_integer(), Some(120));
        // bottom_margin preserved from base
        assert_eq!(logo.get("bottom_margin").unwrap().as_integer(), Some(50));
    }

    #[test]
    fn merge_toml_adds_new_keys() {
        let base: toml::Value = toml::from_str(r#"a = 1"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"b = 2"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(1));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[logo]
sise = 90
"#;
        let result: Result<MarkConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<MarkConfig, _> = toml::from_str("[logos]\nsize = 90\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_error_correction_rejected() {
        let result: Result<MarkConfig, _> = toml::from_str("[qr]\nerror_correction = \"X\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[gallery]\nslots = \"x\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(MarkConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_bad_color() {
        let mut config = MarkConfig::default();
        config.text.color = "red".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("text.color"));
    }

    #[test]
    fn validate_quality_range() {
        let mut config = MarkConfig::default();
        config.gallery.quality = 1.5;
        assert!(config.validate().is_err());
        config.gallery.quality = 0.0;
        assert!(config.validate().is_ok());
        config.export.quality = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_arrow_span() {
        let mut config = MarkConfig::default();
        config.arrow.start = 0.8;
        config.arrow.end = 0.2;
        assert!(config.validate().is_err());
        config.arrow.start = 0.5;
        config.arrow.end = 0.5;
        assert!(config.validate().is_ok());
        config.arrow.end = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_sizes() {
        let mut config = MarkConfig::default();
        config.logo.size = 0;
        assert!(config.validate().is_err());

        let mut config = MarkConfig::default();
        config.text.font_size = 0.0;
        assert!(config.validate().is_err());

        let mut config = MarkConfig::default();
        config.arrow.width = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_upper_bounds() {
        let mut config = MarkConfig::default();
        config.logo.size = MAX_OVERLAY_SIZE;
        config.text.font_size = MAX_FONT_SIZE;
        config.arrow.width = MAX_OVERLAY_SIZE as f32;
        config.qr.module_scale = MAX_MODULE_SCALE;
        config.qr.quiet_zone = MAX_QUIET_ZONE;
        assert!(config.validate().is_ok());

        let mut config = MarkConfig::default();
        config.logo.size = u32::MAX;
        assert!(config.validate().is_err());

        let mut config = MarkConfig::default();
        config.text.font_size = f32::MAX;
        assert!(config.validate().is_err());

        let mut config = MarkConfig::default();
        config.arrow.width = 1e9;
        assert!(config.validate().is_err());

        let mut config = MarkConfig::default();
        config.qr.module_scale = 200_000_000;
        assert!(config.validate().is_err());

        let mut config = MarkConfig::default();
        config.qr.quiet_zone = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("qr.quiet_zone"));
    }

    #[test]
    fn oversized_qr_config_is_rejected_on_load() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[qr]\nmodule_scale = 200000000\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn font_size_check() {
        assert!(check_font_size("--size", 12.0).is_ok());
        assert!(check_font_size("--size", MAX_FONT_SIZE).is_ok());
        assert!(check_font_size("--size", MAX_FONT_SIZE + 1.0).is_err());
        assert!(check_font_size("--size", -3.0).is_err());
        let err = check_font_size("--size", f32::INFINITY).unwrap_err();
        assert!(err.to_string().contains("--size"));
    }

    // =========================================================================
    // Stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: MarkConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, MarkConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value().unwrap();
        let table = value.as_table().unwrap();
        for section in ["logo", "text", "arrow", "qr", "gallery", "export"] {
            assert!(table.contains_key(section), "missing [{section}]");
        }
    }

    #[test]
    fn resolve_config_without_overlay_is_default() {
        assert_eq!(resolve_config(None).unwrap(), MarkConfig::default());
    }
}
