//! Key/value storage contract used by the persistence engine.
//!
//! The store models browser sync storage: string keys, string values, a
//! per-item byte quota and an item-count budget. Multi-key writes are not
//! atomic; callers sequence them.

use std::collections::HashMap;

use crate::types::errors::StorageError;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Trait defining the key/value store interface.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Reads several keys; absent keys are simply missing from the result.
    fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, StorageError> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(key)? {
                found.insert(key.clone(), value);
            }
        }
        Ok(found)
    }
}

/// Size limits enforced by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageQuota {
    /// Maximum UTF-8 bytes of key plus value for a single item.
    pub quota_bytes_per_item: usize,
    /// Maximum number of items held at once.
    pub max_items: usize,
}

impl Default for StorageQuota {
    fn default() -> Self {
        Self {
            quota_bytes_per_item: 8192,
            max_items: 512,
        }
    }
}

impl StorageQuota {
    /// Quota that never rejects a write.
    pub fn unlimited() -> Self {
        Self {
            quota_bytes_per_item: usize::MAX,
            max_items: usize::MAX,
        }
    }

    /// Validates a write of `key` given the current item count and whether
    /// the key already exists.
    pub fn check(
        &self,
        key: &str,
        value: &str,
        item_count: usize,
        exists: bool,
    ) -> Result<(), StorageError> {
        let size = key.len() + value.len();
        if size > self.quota_bytes_per_item {
            return Err(StorageError::QuotaBytesPerItem {
                key: key.to_string(),
                size,
                quota: self.quota_bytes_per_item,
            });
        }
        if !exists && item_count >= self.max_items {
            return Err(StorageError::MaxItems {
                key: key.to_string(),
                max_items: self.max_items,
            });
        }
        Ok(())
    }
}
