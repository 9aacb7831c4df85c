//! Load and persist the metadata index as a single storage entry.

use std::sync::Arc;

use tracing::debug;

use crate::storage::KeyValueStore;
use crate::types::errors::StorageError;
use crate::types::metadata::MetadataIndex;

/// Fixed key of the metadata document.
pub const METADATA_KEY: &str = "TAB_GROUP_METADATA";

/// Trait defining metadata index persistence.
pub trait MetadataIndexStoreTrait {
    /// Reads the whole index; a missing document is an empty index.
    fn load(&self) -> Result<MetadataIndex, StorageError>;
    /// Replaces the stored index with `index`.
    fn persist(&self, index: &MetadataIndex) -> Result<(), StorageError>;
}

/// Metadata index persistence over a key/value store.
pub struct MetadataIndexStore<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> MetadataIndexStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> MetadataIndexStoreTrait for MetadataIndexStore<S> {
    fn load(&self) -> Result<MetadataIndex, StorageError> {
        let Some(raw) = self.store.get(METADATA_KEY)? else {
            return Ok(MetadataIndex::new());
        };
        let index: MetadataIndex = serde_json::from_str(&raw)
            .map_err(|e| StorageError::Serialization(format!("metadata index: {}", e)))?;
        Ok(index.deduplicated())
    }

    fn persist(&self, index: &MetadataIndex) -> Result<(), StorageError> {
        let json = serde_json::to_string(index)
            .map_err(|e| StorageError::Serialization(format!("metadata index: {}", e)))?;
        self.store.set(METADATA_KEY, &json)?;
        debug!(records = index.len(), "persisted metadata index");
        Ok(())
    }
}
