//! # MarkMaker
//!
//! Annotate photos and keep the results. A photo gets one layer at a time
//! (a logo, a line of text, or a horizontal marker line), the result can be
//! appended to a flat local gallery, handed to the host for export, or
//! scanned for a QR code. QR codes can also be generated from text.
//!
//! # Architecture: Stateless Core, Injected Hosts
//!
//! ```text
//! bytes ──decode──▶ RasterImage ──compose──▶ RasterImage ──encode──▶ bytes
//!                        │                        │
//!                        └── qr::read             ├── GalleryStore::append
//!                                                 └── export::perform
//! ```
//!
//! Everything except the gallery is a pure function of its inputs. The
//! gallery and the export surface talk to the outside world only through
//! traits ([`gallery::KeyValueStore`], [`export::ExportGateway`]), so tests
//! run against in-memory doubles and the CLI plugs in a JSON file and a
//! folder.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Raster type, codecs, placement math, stroke and glyph painting |
//! | [`annotate`] | `AnnotationRequest` and the `Compositor` that draws it |
//! | [`gallery`] | Ordered image blobs under one slot of a key-value store |
//! | [`qr`] | QR generation and reading |
//! | [`export`] | Clipboard, share and photo-library requests to the host |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Shrink-to-Fit
//!
//! Overlays keep their configured size. A 250px logo on a 100px photo hangs
//! off the canvas and is clipped; long text runs past the edges. This keeps
//! placement a closed-form function of the base dimensions and matches what
//! the app has always produced.
//!
//! ## The "Arrow" Is a Line
//!
//! The arrow annotation has always been a straight horizontal stroke with no
//! head. The name stays so saved workflows keep working.
//!
//! ## Embedded Font
//!
//! Text is rasterized with `fontdue` from a DejaVu Sans copy compiled into the
//! binary, so the same request renders the same pixels on every machine.
//!
//! ## Gallery Reads Are Lenient
//!
//! Entries that no longer decode are skipped on load and purged by the next
//! removal. A corrupt entry never blocks the rest of the gallery.

pub mod annotate;
pub mod config;
pub mod export;
pub mod gallery;
pub mod imaging;
pub mod output;
pub mod qr;

#[cfg(test)]
pub(crate) mod test_helpers;
