//! Process-local cache store.

use std::{collections::HashMap, sync::Mutex};

use crate::cache::{CacheEntry, CacheError, CacheStore};

/// A [`CacheStore`] backed by a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn read_entry(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn upsert_entry(&self, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let entry = match entries.get(entry.cache_key()) {
            Some(existing) => {
                let created_at = existing.created_at();
                entry.with_created_at(created_at)
            }
            None => entry,
        };
        entries.insert(entry.cache_key().to_string(), entry);
        Ok(())
    }

    fn delete_entry(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
