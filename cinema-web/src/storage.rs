use crate::dom;
use cinema_core::session::{KeyValueStore, StorageError};

/// `localStorage`, or nothing at all when the browser refuses access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        dom::local_storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(dom::js_error_message(&e)))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = dom::local_storage() {
            if let Err(err) = storage.remove_item(key) {
                log::debug!("could not remove {key}: {}", dom::js_error_message(&err));
            }
        }
    }
}
