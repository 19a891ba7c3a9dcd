use swing_engine::storage::{KeyValueStore, Result, StoreError};

/// `window.localStorage`-backed store.
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// Open the page's local storage. Fails when there is no window or the
    /// browser denies access (private mode, disabled cookies).
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

/// The browser store when available, otherwise an in-memory one.
pub fn browser_store() -> Box<dyn KeyValueStore> {
    match LocalStorageStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}; scores will not persist", e);
            Box::new(swing_engine::MemoryStore::new())
        }
    }
}
