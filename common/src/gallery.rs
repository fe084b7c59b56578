//! The ordered photo collection and its persisted snapshot.
//!
//! The whole sequence is serialized as a JSON array of data URI strings under
//! a single storage key and rewritten after every mutation. Identity inside a
//! session is an [`ImageId`] handed out at load or insert time; ids are not
//! part of the snapshot.

use crate::image::{CapturedImage, EncodedImage, ImageId};
use crate::storage::KeyValueStore;

pub struct GalleryStore<S: KeyValueStore> {
    store: S,
    key: String,
    images: Vec<CapturedImage>,
    next_id: u64,
    revision: u64,
}

impl<S: KeyValueStore> GalleryStore<S> {
    /// Read the persisted snapshot. Absent or corrupt data yields an empty gallery.
    pub fn load(store: S, key: &str) -> Self {
        let payloads = match store.get(key) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<EncodedImage>>(&raw) {
                Ok(payloads) => payloads,
                Err(e) => {
                    log::warn!("Stored gallery under '{}' is unreadable ({}), starting empty", key, e);
                    Vec::new()
                }
            },
        };

        let mut gallery = Self {
            store,
            key: key.to_string(),
            images: Vec::with_capacity(payloads.len()),
            next_id: 0,
            revision: 0,
        };
        for image in payloads {
            let id = gallery.allocate_id();
            gallery.images.push(CapturedImage { id, image });
        }
        log::info!("Loaded {} image(s) from storage", gallery.images.len());
        gallery
    }

    pub fn images(&self) -> &[CapturedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Most recent item, used for the camera thumbnail.
    pub fn first(&self) -> Option<&CapturedImage> {
        self.images.first()
    }

    pub fn get(&self, id: ImageId) -> Option<&CapturedImage> {
        self.images.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: ImageId) -> Option<usize> {
        self.images.iter().position(|item| item.id == id)
    }

    /// Bumped on every mutation so views can skip redundant re-renders.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn storage(&self) -> &S {
        &self.store
    }

    /// Insert at the front and persist.
    pub fn add(&mut self, image: EncodedImage) -> ImageId {
        let id = self.allocate_id();
        self.images.insert(0, CapturedImage { id, image });
        self.changed();
        id
    }

    /// Remove by position. Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<CapturedImage> {
        if index >= self.images.len() {
            log::debug!("Ignoring remove of index {} (len {})", index, self.images.len());
            return None;
        }
        let removed = self.images.remove(index);
        self.changed();
        Some(removed)
    }

    pub fn remove_id(&mut self, id: ImageId) -> Option<CapturedImage> {
        let index = self.position(id)?;
        self.remove(index)
    }

    /// The text written to storage for the current sequence.
    pub fn snapshot(&self) -> String {
        let payloads: Vec<&EncodedImage> = self.images.iter().map(|item| &item.image).collect();
        // Vec of strings always serializes
        serde_json::to_string(&payloads).unwrap_or_else(|_| "[]".to_string())
    }

    /// Rewrite the full snapshot. Failures are logged and otherwise ignored.
    pub fn flush(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.store.set(&self.key, &snapshot) {
            log::error!("Failed to persist gallery ({} item(s)): {}", self.images.len(), e);
        }
    }

    fn changed(&mut self) {
        self.revision += 1;
        self.flush();
    }

    fn allocate_id(&mut self) -> ImageId {
        let id = ImageId(self.next_id);
        self.next_id += 1;
        id
    }
}
