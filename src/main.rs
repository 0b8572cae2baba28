use clap::{Args, Parser, Subcommand};
use markmaker::annotate::{AnnotationRequest, Compositor, TextRequest};
use markmaker::config::{self, MarkConfig};
use markmaker::export::{self, ExportAction, ExportStatus, LibraryFolder};
use markmaker::gallery::{FileStore, GalleryStore};
use markmaker::imaging::{
    Color, EncodeFormat, EncodeSettings, ImageCodec, RasterImage, RustCodec,
};
use markmaker::{output, qr};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "markmaker")]
#[command(about = "Annotate photos, keep a local gallery, and make or read QR codes")]
#[command(long_about = "\
Annotate photos, keep a local gallery, and make or read QR codes

Annotations are drawn onto a copy of the input and written to --output:

  logo    scale a logo into a 250px box centered 50px above the bottom edge
  text    one line of text centered on the image
  arrow   a horizontal line across the middle, from 25% to 75% of the width

Add --save to also append the result to the gallery (gallery.json in the
working directory). Sizes, colors and file locations come from config.toml
in the working directory.

Run 'markmaker gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Working directory holding config.toml, the gallery and the library
    #[arg(long, default_value = ".", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// Where an image-producing command writes its result.
#[derive(Args, Clone)]
struct OutputArgs {
    /// File to write; the extension picks PNG or JPEG
    #[arg(short, long)]
    output: PathBuf,

    /// Also append the result to the gallery
    #[arg(long)]
    save: bool,
}

/// An image given as a file or as a gallery position.
#[derive(Args, Clone)]
struct SourceArgs {
    /// Image file
    image: Option<PathBuf>,

    /// Gallery position (as shown by `gallery list`) instead of a file
    #[arg(long, conflicts_with = "image")]
    from_gallery: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Stamp a logo near the bottom of an image
    Logo {
        image: PathBuf,
        logo: PathBuf,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Draw a line of text centered on an image
    Text {
        image: PathBuf,
        text: String,
        /// Text color as #rrggbb or #rrggbbaa
        #[arg(long)]
        color: Option<String>,
        /// Font size in pixels
        #[arg(long)]
        size: Option<f32>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Draw the horizontal marker line across an image
    Arrow {
        image: PathBuf,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Generate or read QR codes
    #[command(subcommand)]
    Qr(QrCommand),
    /// List, add or remove saved images
    #[command(subcommand)]
    Gallery(GalleryCommand),
    /// Save an image to the photo library folder
    Save(SourceArgs),
    /// Copy an image to the clipboard (unsupported on the command line)
    Copy(SourceArgs),
    /// Open the share sheet for an image (unsupported on the command line)
    Share(SourceArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Load and validate config.toml, then print the resolved settings
    CheckConfig,
}

#[derive(Subcommand)]
enum QrCommand {
    /// Render text as a QR code
    Encode {
        text: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Print the payload of the first QR code found in an image
    Decode { image: PathBuf },
}

#[derive(Subcommand)]
enum GalleryCommand {
    /// List saved images
    List,
    /// Append an image file to the gallery
    Add { image: PathBuf },
    /// Remove the image at a position (as shown by `gallery list`)
    Remove { position: usize },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.dir)?;
    let codec = RustCodec::new();
    let compositor = Compositor::new(config.annotation_policy()?);

    match cli.command {
        Command::Logo { image, logo, out } => {
            let logo_bytes = std::fs::read(&logo)?;
            let request = AnnotationRequest::logo_from_bytes(&codec, &logo_bytes)?;
            let base_bytes = std::fs::read(&image)?;
            let result = compositor.compose_encoded(&codec, &base_bytes, &request)?;
            let message = output::annotation_message(&request);
            finish(&cli.dir, &config, &codec, &result, &out, message)?;
        }
        Command::Text {
            image,
            text,
            color,
            size,
            out,
        } => {
            let policy = compositor.policy();
            let color = match color {
                Some(hex) => Color::from_hex(&hex)
                    .ok_or_else(|| format!("--color must be #rrggbb or #rrggbbaa, got {hex:?}"))?,
                None => policy.text_color,
            };
            if let Some(size) = size {
                config::check_font_size("--size", size)?;
            }
            let request = AnnotationRequest::Text(TextRequest {
                text,
                color,
                font_size: size.unwrap_or(policy.font_size),
            });
            let base_bytes = std::fs::read(&image)?;
            let result = compositor.compose_encoded(&codec, &base_bytes, &request)?;
            let message = output::annotation_message(&request);
            finish(&cli.dir, &config, &codec, &result, &out, message)?;
        }
        Command::Arrow { image, out } => {
            let base = codec.decode(&std::fs::read(&image)?)?;
            let request = compositor.marker_request(base.dimensions());
            let result = compositor.compose(&base, &request);
            let message = output::annotation_message(&request);
            finish(&cli.dir, &config, &codec, &result, &out, message)?;
        }
        Command::Qr(QrCommand::Encode { text, out }) => {
            let result = config.qr_codec().encode(&text)?;
            finish(&cli.dir, &config, &codec, &result, &out, output::QR_GENERATED_MESSAGE)?;
        }
        Command::Qr(QrCommand::Decode { image }) => {
            let image = codec.decode(&std::fs::read(&image)?)?;
            let text = qr::read(&image)?;
            for line in output::format_qr_decoded(&text) {
                println!("{}", line);
            }
        }
        Command::Gallery(GalleryCommand::List) => {
            let gallery = open_gallery(&cli.dir, &config);
            output::print_gallery(&gallery.entries()?);
        }
        Command::Gallery(GalleryCommand::Add { image }) => {
            let mut gallery = open_gallery(&cli.dir, &config);
            let bytes = std::fs::read(&image)?;
            let dimensions = codec.decode(&bytes)?.dimensions();
            gallery.append_encoded(bytes)?;
            output::print_gallery_added(gallery.len()?, dimensions);
        }
        Command::Gallery(GalleryCommand::Remove { position }) => {
            let mut gallery = open_gallery(&cli.dir, &config);
            let index = position
                .checked_sub(1)
                .ok_or("gallery positions start at 1")?;
            let removed = gallery.remove_at(index)?;
            output::print_gallery_removed(position, removed.dimensions(), gallery.len()?);
        }
        Command::Save(source) => {
            export_image(&cli.dir, &config, &codec, ExportAction::SaveToLibrary, &source)?;
        }
        Command::Copy(source) => {
            export_image(&cli.dir, &config, &codec, ExportAction::Copy, &source)?;
        }
        Command::Share(source) => {
            export_image(&cli.dir, &config, &codec, ExportAction::Share, &source)?;
        }
        Command::CheckConfig => {
            output::print_config_summary(&config, &cli.dir);
            println!("==> Config is valid");
        }
        // printed before the config was loaded
        Command::GenConfig => {}
    }

    Ok(())
}

fn open_gallery(dir: &Path, config: &MarkConfig) -> GalleryStore<FileStore> {
    GalleryStore::new(FileStore::new(config.gallery_path(dir)))
        .slot(config.gallery.slot.clone())
        .encode_settings(config.gallery_settings())
}

/// Write `result` to `--output`, append it to the gallery on `--save`, and
/// report both.
fn finish(
    dir: &Path,
    config: &MarkConfig,
    codec: &RustCodec,
    result: &RasterImage,
    out: &OutputArgs,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = EncodeSettings {
        format: EncodeFormat::from_path(&out.output),
        quality: config.export_settings().quality,
    };
    std::fs::write(&out.output, codec.encode(result, settings)?)?;

    let position = if out.save {
        let mut gallery = open_gallery(dir, config);
        gallery.append(result)?;
        Some(gallery.len()?)
    } else {
        None
    };
    output::print_written(message, &out.output, result.dimensions(), position);
    Ok(())
}

/// Resolve the source image and hand it to the library folder gateway.
fn export_image(
    dir: &Path,
    config: &MarkConfig,
    codec: &RustCodec,
    action: ExportAction,
    source: &SourceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let image = match (&source.image, source.from_gallery) {
        (Some(path), _) => Some(codec.decode(&std::fs::read(path)?)?),
        (None, Some(position)) => {
            let index = position
                .checked_sub(1)
                .ok_or("gallery positions start at 1")?;
            let mut images = open_gallery(dir, config).load()?;
            if index >= images.len() {
                return Err(format!(
                    "no image at position {position}, gallery has {}",
                    images.len()
                )
                .into());
            }
            Some(images.swap_remove(index))
        }
        (None, None) => None,
    };

    let mut library = LibraryFolder::new(config.library_dir(dir), config.export_settings());
    let report = export::perform(&mut library, action, image.as_ref());
    output::print_export(&report, library.last_saved());
    if report.status == ExportStatus::Failed {
        return Err(format!("{action} failed (library: {})", library.dir().display()).into());
    }
    Ok(())
}
