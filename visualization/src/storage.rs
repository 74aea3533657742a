//! Browser local storage for the preference blob.

use viz_lib::error::{VizError, VizResult};
use viz_lib::preferences::{MemoryStore, PreferenceStore};
use web_sys::Storage;

pub struct LocalStorage(Storage);

impl LocalStorage {
    /// `None` when the page has no access to local storage (private mode,
    /// sandboxed frames).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self(storage))
    }
}

impl PreferenceStore for LocalStorage {
    fn load(&self, key: &str) -> VizResult<Option<String>> {
        self.0
            .get_item(key)
            .map_err(|e| VizError::Storage(format!("{e:?}")))
    }

    fn save(&mut self, key: &str, value: &str) -> VizResult<()> {
        self.0
            .set_item(key, value)
            .map_err(|e| VizError::Storage(format!("{e:?}")))
    }
}

/// Local storage, or an in-memory store that forgets everything on reload.
pub fn preference_store() -> Box<dyn PreferenceStore> {
    match LocalStorage::open() {
        Some(store) => Box::new(store),
        None => {
            tracing::warn!("Local storage unavailable, preferences will not persist");
            Box::new(MemoryStore::default())
        }
    }
}
