//! Persisted gallery of encoded images.
//!
//! The gallery is an ordered list of image blobs stored under one named slot
//! (`SavedImages` by default) of a key-value backend. There is no versioning
//! and no per-entry metadata: each entry is just the encoded bytes.
//!
//! ## Reads
//!
//! [`GalleryStore::load`] decodes every blob and silently drops any that
//! fail to decode (logged at `warn`). Indices handed out by
//! [`GalleryStore::entries`] refer to this decoded list.
//!
//! ## Writes
//!
//! Every mutation reads the slot, changes it, and writes the whole sequence
//! back. There is no locking; callers serialize their own access.
//!
//! [`GalleryStore::remove_at`] writes back only the entries that still
//! decode, so a removal also purges corrupt blobs. Bytes of surviving entries
//! are kept verbatim rather than re-encoded.
//!
//! ## Backends
//!
//! | Backend | Storage |
//! |---|---|
//! | [`MemoryStore`] | `HashMap`, for tests and embedding |
//! | [`FileStore`] | JSON file `{ "<slot>": ["<base64>", ...] }` |

use crate::imaging::{CodecError, EncodeSettings, ImageCodec, RasterImage, RustCodec};
use base64::{Engine as _, engine::general_purpose};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use thiserror::Error;

/// Slot the original app kept its gallery under.
pub const DEFAULT_SLOT: &str = "SavedImages";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("gallery file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("index {index} out of range for gallery of {len}")]
    Index { index: usize, len: usize },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Key-value backend holding ordered blob sequences by slot name.
pub trait KeyValueStore {
    /// Blobs under `slot`, empty when the slot was never written.
    fn read_blobs(&self, slot: &str) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Replace the whole sequence under `slot`.
    fn write_blobs(&mut self, slot: &str, blobs: &[Vec<u8>]) -> Result<(), StoreError>;
}

/// In-memory backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, Vec<Vec<u8>>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write_blobs` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn read_blobs(&self, slot: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self.slots.get(slot).cloned().unwrap_or_default())
    }

    fn write_blobs(&mut self, slot: &str, blobs: &[Vec<u8>]) -> Result<(), StoreError> {
        self.slots.insert(slot.to_string(), blobs.to_vec());
        self.writes += 1;
        Ok(())
    }
}

/// JSON file backend. Other slots in the same file are preserved on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

type SlotMap = BTreeMap<String, Vec<String>>;

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file is an empty store. A file that exists but doesn't
    /// parse is an error, so a later write can't clobber it.
    fn read_map(&self) -> Result<SlotMap, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SlotMap::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStore for FileStore {
    fn read_blobs(&self, slot: &str) -> Result<Vec<Vec<u8>>, StoreError> {
        let map = self.read_map()?;
        let Some(encoded) = map.get(slot) else {
            return Ok(Vec::new());
        };
        let mut blobs = Vec::with_capacity(encoded.len());
        for (i, entry) in encoded.iter().enumerate() {
            match general_purpose::STANDARD.decode(entry) {
                Ok(bytes) => blobs.push(bytes),
                Err(e) => log::warn!("{}: skipping entry {i} of {slot}: {e}", self.path.display()),
            }
        }
        Ok(blobs)
    }

    fn write_blobs(&mut self, slot: &str, blobs: &[Vec<u8>]) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(
            slot.to_string(),
            blobs
                .iter()
                .map(|b| general_purpose::STANDARD.encode(b))
                .collect(),
        );
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// A decoded gallery entry and its position in the decoded list.
#[derive(Debug, Clone)]
pub struct GalleryEntry {
    pub index: usize,
    pub image: RasterImage,
}

/// Ordered, persisted image collection over a [`KeyValueStore`].
pub struct GalleryStore<S, C = RustCodec> {
    store: S,
    codec: C,
    slot: String,
    settings: EncodeSettings,
}

impl<S: KeyValueStore> GalleryStore<S, RustCodec> {
    pub fn new(store: S) -> Self {
        Self::with_codec(store, RustCodec::new())
    }
}

impl<S: KeyValueStore, C: ImageCodec> GalleryStore<S, C> {
    pub fn with_codec(store: S, codec: C) -> Self {
        Self {
            store,
            codec,
            slot: DEFAULT_SLOT.to_string(),
            settings: EncodeSettings::png(),
        }
    }

    /// Use a different slot name.
    pub fn slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    /// Encoding used by [`append`](Self::append). PNG by default.
    pub fn encode_settings(mut self, settings: EncodeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> EncodeSettings {
        self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Decode every stored entry, skipping the ones that don't decode.
    pub fn load(&self) -> Result<Vec<RasterImage>, GalleryError> {
        Ok(self.decoded()?.into_iter().map(|(_, image)| image).collect())
    }

    /// Like [`load`](Self::load), with each image's index.
    pub fn entries(&self) -> Result<Vec<GalleryEntry>, GalleryError> {
        Ok(self
            .load()?
            .into_iter()
            .enumerate()
            .map(|(index, image)| GalleryEntry { index, image })
            .collect())
    }

    /// Number of entries that decode.
    pub fn len(&self) -> Result<usize, GalleryError> {
        Ok(self.decoded()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, GalleryError> {
        Ok(self.len()? == 0)
    }

    /// Encode `image` with the configured settings and append it.
    pub fn append(&mut self, image: &RasterImage) -> Result<(), GalleryError> {
        let bytes = self.codec.encode(image, self.settings)?;
        self.push(bytes)
    }

    /// Append already-encoded bytes verbatim. Fails without writing when the
    /// bytes don't decode.
    pub fn append_encoded(&mut self, bytes: Vec<u8>) -> Result<(), GalleryError> {
        self.codec.decode(&bytes)?;
        self.push(bytes)
    }

    /// Remove the entry at `index` of the decoded list and return it.
    ///
    /// An out-of-range index fails without writing anything.
    pub fn remove_at(&mut self, index: usize) -> Result<RasterImage, GalleryError> {
        let blobs = self.store.read_blobs(&self.slot)?;
        let mut kept = Vec::with_capacity(blobs.len());
        let mut removed = None;
        let mut position = 0;
        for blob in blobs {
            let Ok(image) = self.codec.decode(&blob) else {
                continue;
            };
            if position == index {
                removed = Some(image);
            } else {
                kept.push(blob);
            }
            position += 1;
        }
        let Some(image) = removed else {
            return Err(GalleryError::Index {
                index,
                len: position,
            });
        };
        self.store.write_blobs(&self.slot, &kept)?;
        log::info!("removed entry {index} from {}, {} left", self.slot, kept.len());
        Ok(image)
    }

    fn push(&mut self, bytes: Vec<u8>) -> Result<(), GalleryError> {
        let mut blobs = self.store.read_blobs(&self.slot)?;
        let size = bytes.len();
        blobs.push(bytes);
        self.store.write_blobs(&self.slot, &blobs)?;
        log::info!("appended {size} bytes to {} ({} entries)", self.slot, blobs.len());
        Ok(())
    }

    fn decoded(&self) -> Result<Vec<(usize, RasterImage)>, GalleryError> {
        let blobs = self.store.read_blobs(&self.slot)?;
        let mut images = Vec::with_capacity(blobs.len());
        for (raw_index, blob) in blobs.iter().enumerate() {
            match self.codec.decode(blob) {
                Ok(image) => images.push((raw_index, image)),
                Err(e) => log::warn!("{}: skipping undecodable entry {raw_index}: {e}", self.slot),
            }
        }
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::codec::tests::{MockCodec, RecordedOp};
    use crate::imaging::{EncodeFormat, Quality};
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn mock_gallery() -> GalleryStore<MemoryStore, MockCodec> {
        GalleryStore::with_codec(MemoryStore::new(), MockCodec::new())
    }

    fn fill_of(image: &RasterImage) -> u8 {
        image.pixels().get_pixel(0, 0).0[0]
    }

    // =========================================================================
    // append / load tests
    // =========================================================================

    #[test]
    fn empty_gallery_loads_nothing() {
        let gallery = mock_gallery();
        assert!(gallery.load().unwrap().is_empty());
        assert!(gallery.is_empty().unwrap());
    }

    #[test]
    fn append_then_load_returns_it_last() {
        let mut gallery = mock_gallery();
        gallery.append(&solid(4, 4, BLACK)).unwrap();
        let image = solid(8, 6, WHITE);
        gallery.append(&image).unwrap();

        let loaded = gallery.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded[1].same_pixels(&image));
    }

    #[test]
    fn append_uses_configured_settings() {
        let mut gallery = GalleryStore::with_codec(MemoryStore::new(), MockCodec::new())
            .encode_settings(EncodeSettings::jpeg(Quality::new(1.0)));
        gallery.append(&solid(3, 2, BLACK)).unwrap();

        let ops = gallery.codec.get_operations();
        assert_eq!(
            ops[0],
            RecordedOp::Encode {
                width: 3,
                height: 2,
                format: EncodeFormat::Jpeg,
                quality: 1.0,
            }
        );
    }

    #[test]
    fn undecodable_entries_are_skipped() {
        let mut store = MemoryStore::new();
        store
            .write_blobs(
                DEFAULT_SLOT,
                &[MockCodec::blob(2, 2, 10), b"corrupt".to_vec(), MockCodec::blob(2, 2, 30)],
            )
            .unwrap();
        let gallery = GalleryStore::with_codec(store, MockCodec::new());

        let entries = gallery.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].index, 1);
        assert_eq!(fill_of(&entries[1].image), 30);
    }

    #[test]
    fn append_encoded_rejects_bad_bytes() {
        let mut gallery = mock_gallery();
        let err = gallery.append_encoded(b"nope".to_vec()).unwrap_err();
        assert!(matches!(err, GalleryError::Codec(CodecError::Decode(_))));
        assert_eq!(gallery.store().writes(), 0);

        gallery.append_encoded(MockCodec::blob(1, 1, 7)).unwrap();
        assert_eq!(
            gallery.store().read_blobs(DEFAULT_SLOT).unwrap(),
            vec![MockCodec::blob(1, 1, 7)]
        );
    }

    #[test]
    fn slots_are_independent() {
        let mut gallery = mock_gallery().slot("Other");
        gallery.append(&solid(1, 1, BLACK)).unwrap();
        let store = gallery.into_store();
        assert!(store.read_blobs(DEFAULT_SLOT).unwrap().is_empty());
        assert_eq!(store.read_blobs("Other").unwrap().len(), 1);
    }

    // =========================================================================
    // remove_at tests
    // =========================================================================

    #[test]
    fn remove_shifts_later_entries_down() {
        let mut gallery = mock_gallery();
        for fill in [10, 20, 30] {
            gallery.append_encoded(MockCodec::blob(2, 2, fill)).unwrap();
        }

        let removed = gallery.remove_at(1).unwrap();
        assert_eq!(fill_of(&removed), 20);

        let fills: Vec<u8> = gallery.load().unwrap().iter().map(fill_of).collect();
        assert_eq!(fills, vec![10, 30]);
    }

    #[test]
    fn out_of_range_remove_leaves_store_unchanged() {
        let mut gallery = mock_gallery();
        gallery.append_encoded(MockCodec::blob(2, 2, 1)).unwrap();
        let before = gallery.store().read_blobs(DEFAULT_SLOT).unwrap();
        let writes = gallery.store().writes();

        let err = gallery.remove_at(1).unwrap_err();
        assert!(matches!(err, GalleryError::Index { index: 1, len: 1 }));
        assert_eq!(gallery.store().writes(), writes);
        assert_eq!(gallery.store().read_blobs(DEFAULT_SLOT).unwrap(), before);
    }

    #[test]
    fn remove_from_empty_gallery_fails() {
        let mut gallery = mock_gallery();
        assert!(matches!(
            gallery.remove_at(0),
            Err(GalleryError::Index { index: 0, len: 0 })
        ));
    }

    #[test]
    fn remove_purges_corrupt_entries_and_keeps_bytes() {
        let mut store = MemoryStore::new();
        store
            .write_blobs(
                DEFAULT_SLOT,
                &[b"bad".to_vec(), MockCodec::blob(2, 2, 1), MockCodec::blob(2, 2, 2)],
            )
            .unwrap();
        let mut gallery = GalleryStore::with_codec(store, MockCodec::new());

        gallery.remove_at(0).unwrap();
        assert_eq!(
            gallery.store().read_blobs(DEFAULT_SLOT).unwrap(),
            vec![MockCodec::blob(2, 2, 2)]
        );
        // surviving entries are not re-encoded
        assert!(
            !gallery
                .codec
                .get_operations()
                .iter()
                .any(|op| matches!(op, RecordedOp::Encode { .. }))
        );
    }

    // =========================================================================
    // FileStore tests
    // =========================================================================

    #[test]
    fn file_store_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("gallery.json"));
        assert!(store.read_blobs(DEFAULT_SLOT).unwrap().is_empty());
    }

    #[test]
    fn file_store_round_trips_and_keeps_other_slots() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/gallery.json");
        let mut store = FileStore::new(&path);

        store.write_blobs("Keep", &[vec![9, 9]]).unwrap();
        store.write_blobs(DEFAULT_SLOT, &[vec![1, 2, 3], vec![]]).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.read_blobs(DEFAULT_SLOT).unwrap(),
            vec![vec![1, 2, 3], vec![]]
        );
        assert_eq!(reopened.read_blobs("Keep").unwrap(), vec![vec![9, 9]]);
    }

    #[test]
    fn file_store_rejects_corrupt_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery.json");
        std::fs::write(&path, "{ not json").unwrap();
        let mut store = FileStore::new(&path);

        assert!(matches!(store.read_blobs(DEFAULT_SLOT), Err(StoreError::Json(_))));
        assert!(store.write_blobs(DEFAULT_SLOT, &[]).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn file_store_skips_bad_base64() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery.json");
        std::fs::write(&path, r#"{"SavedImages": ["AQID", "!!!"]}"#).unwrap();
        let store = FileStore::new(&path);
        assert_eq!(store.read_blobs(DEFAULT_SLOT).unwrap(), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn gallery_over_file_store_with_real_codec() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gallery.json");
        let image = gradient(16, 12);

        let mut gallery = GalleryStore::new(FileStore::new(&path));
        gallery.append(&image).unwrap();

        let reopened = GalleryStore::new(FileStore::new(&path));
        let loaded = reopened.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].same_pixels(&image));
    }
}
