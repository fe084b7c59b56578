use common::{KeyValueStore, MemoryStore, StorageError};
use wasm_bindgen::prelude::*;

/// `window.localStorage`, or an in-memory map when the browser refuses
/// storage access (private browsing, sandboxed iframes).
pub enum BrowserStore {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match local_storage() {
            Ok(storage) => BrowserStore::Local(storage),
            Err(e) => {
                log::warn!("localStorage unavailable ({:?}), gallery will not persist", e);
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

fn local_storage() -> Result<web_sys::Storage, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let storage = window.local_storage()?.ok_or("No localStorage")?;
    Ok(storage)
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Local(storage) => storage.get_item(key).ok().flatten(),
            BrowserStore::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            BrowserStore::Local(storage) => storage
                .set_item(key, value)
                .map_err(|e| StorageError::Write(format!("{:?}", e))),
            BrowserStore::Memory(store) => store.set(key, value),
        }
    }
}
