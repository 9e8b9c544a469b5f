//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::ports::store::{KeyValueStore, StoreResult};

/// Store that lives only as long as the process. Backs the cache of
/// replaying contexts so replayed runs start cold.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().map_err(|e| e.to_string())?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|e| e.to_string())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.entries.lock().map_err(|e| e.to_string())?.clear();
        Ok(())
    }
}
