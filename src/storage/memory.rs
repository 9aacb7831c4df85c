use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{KeyValueStore, StorageQuota};
use crate::types::errors::StorageError;

/// In-memory store with sync-storage quotas.
pub struct MemoryStore {
    items: Mutex<BTreeMap<String, String>>,
    quota: StorageQuota,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_quota(StorageQuota::default())
    }

    pub fn with_quota(quota: StorageQuota) -> Self {
        Self {
            items: Mutex::new(BTreeMap::new()),
            quota,
        }
    }

    pub fn quota(&self) -> StorageQuota {
        self.quota
    }

    /// Number of items currently held.
    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.items
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.lock()?;
        self.quota
            .check(key, value, items.len(), items.contains_key(key))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}
