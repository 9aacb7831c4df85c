//! Persistence Engine for Tabstash.
//!
//! Saves a tab group as its storage projection, serialized to JSON,
//! raw-deflated and base64-encoded, then sliced into fixed-size chunks written
//! under `TAB_GROUP_{title}_{index}`. The metadata index records how many
//! chunks each title occupies. Loading reverses the pipeline and treats any
//! missing chunk as the whole group being absent.
//!
//! A chunk write the store rejects is rolled back to the previous chunk
//! values. Nothing survives a crash, though: dying between writing chunks and
//! persisting the index can leave orphan chunk keys; `sweep_orphans` removes
//! them.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::browser_state::BrowserStateProvider;
use super::metadata_index::{MetadataIndexStore, MetadataIndexStoreTrait, METADATA_KEY};
use crate::services::compression_service::{CompressionService, CompressionServiceTrait};
use crate::services::merge_resolver::merge_tabs;
use crate::storage::KeyValueStore;
use crate::types::errors::{BoxError, BrowserError, TabGroupError};
use crate::types::metadata::MetadataIndex;
use crate::types::options::MergePolicy;
use crate::types::tab::BrowserTab;
use crate::types::tab_group::{GroupIdentity, TabGroup, TabGroupDto};

/// Characters per chunk, kept under the store's per-item quota.
pub const CHUNK_SIZE: usize = 8000;

/// Most chunks a single tab group may occupy.
pub const MAX_CHUNKS: usize = 20;

/// Prefix shared by every chunk key.
pub const CHUNK_KEY_PREFIX: &str = "TAB_GROUP_";

/// Storage key of chunk `index` of the group titled `title`.
pub fn chunk_key(title: &str, index: usize) -> String {
    format!("{}{}_{}", CHUNK_KEY_PREFIX, title, index)
}

/// Inverse of [`chunk_key`]; `None` for keys this engine did not produce.
pub fn parse_chunk_key(key: &str) -> Option<(&str, usize)> {
    if key == METADATA_KEY {
        return None;
    }
    let (title, index) = key.strip_prefix(CHUNK_KEY_PREFIX)?.rsplit_once('_')?;
    let index: usize = index.parse().ok()?;
    (chunk_key(title, index) == key).then_some((title, index))
}

/// Slices `text` into pieces of at most `size` characters.
///
/// Always yields at least one slice, so an empty text occupies one chunk.
pub fn split_chunks(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut start = 0;
    let mut taken = 0;
    for (i, _) in text.char_indices() {
        if taken == size {
            chunks.push(&text[start..i]);
            start = i;
            taken = 0;
        }
        taken += 1;
    }
    chunks.push(&text[start..]);
    chunks
}

/// Trait defining tab group persistence operations.
pub trait PersistenceEngineTrait {
    /// Persists `group` and returns the number of chunks written.
    fn save<B: BrowserStateProvider + ?Sized>(
        &self,
        group: &TabGroup,
        browser: &B,
        policy: MergePolicy,
    ) -> Result<usize, TabGroupError>;

    /// Reads `chunk_count` chunks of `title`. `Ok(None)` if any is missing.
    fn load(&self, title: &str, chunk_count: usize) -> Result<Option<TabGroup>, TabGroupError>;

    /// Deletes a stored group. Returns `false` when the title was not stored.
    fn remove(&self, title: &str) -> Result<bool, TabGroupError>;

    /// Loads every group the metadata index lists, skipping absent or unreadable ones.
    fn load_all(&self) -> Result<Vec<TabGroup>, TabGroupError>;

    /// Deletes chunk keys no metadata record accounts for.
    fn sweep_orphans(&self) -> Result<usize, TabGroupError>;

    fn metadata_index(&self) -> Result<MetadataIndex, TabGroupError>;
}

/// Chunked, compressed tab group persistence over a key/value store.
pub struct PersistenceEngine<S: KeyValueStore> {
    store: Arc<S>,
    metadata: MetadataIndexStore<S>,
    codec: CompressionService,
    chunk_size: usize,
    max_chunks: usize,
}

impl<S: KeyValueStore> PersistenceEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_limits(store, CHUNK_SIZE, MAX_CHUNKS)
    }

    /// Creates an engine with custom chunk size and chunk cap.
    pub fn with_limits(store: Arc<S>, chunk_size: usize, max_chunks: usize) -> Self {
        Self {
            metadata: MetadataIndexStore::new(store.clone()),
            store,
            codec: CompressionService::new(),
            chunk_size: chunk_size.max(1),
            max_chunks,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The tab list a save should start from: live tabs for an open group,
    /// the carried tabs otherwise.
    fn capture_tabs<B: BrowserStateProvider + ?Sized>(
        group: &TabGroup,
        browser: &B,
    ) -> Result<Vec<BrowserTab>, BrowserError> {
        match group.identity {
            GroupIdentity::Live { id, .. } => browser.list_tabs(id),
            GroupIdentity::Stored | GroupIdentity::Ungrouped => Ok(group.tabs.clone()),
        }
    }

    /// Puts the first `written` chunk keys of `title` back to their `previous`
    /// values, deleting keys that had none. If that fails too, the group is
    /// dropped from the index so it loads as absent instead of mixed.
    fn roll_back(
        &self,
        title: &str,
        written: usize,
        previous: &HashMap<String, String>,
        index: &MetadataIndex,
    ) {
        let restored = (0..written).try_for_each(|i| {
            let key = chunk_key(title, i);
            match previous.get(&key) {
                Some(value) => self.store.set(&key, value),
                None => self.store.remove(&key),
            }
        });
        let Err(e) = restored else {
            debug!(title, chunks = written, "restored previous chunks");
            return;
        };
        error!(title, error = %e, "rollback failed; dropping stored tab group");
        let indexed = index.get(title).map_or(0, |r| r.count);
        for key in (0..written.max(indexed)).map(|i| chunk_key(title, i)) {
            if let Err(e) = self.store.remove(&key) {
                warn!(title, key = %key, error = %e, "failed to remove chunk");
            }
        }
        if indexed > 0 {
            if let Err(e) = self.metadata.persist(&index.clone().remove(title)) {
                warn!(title, error = %e, "failed to drop index record");
            }
        }
    }

    fn encode(&self, group: &TabGroup) -> Result<String, BoxError> {
        let dto = TabGroupDto::try_from(group)?;
        let json = serde_json::to_string(&dto)?;
        Ok(self.codec.compress(&json)?)
    }
}

impl<S: KeyValueStore> PersistenceEngineTrait for PersistenceEngine<S> {
    fn save<B: BrowserStateProvider + ?Sized>(
        &self,
        group: &TabGroup,
        browser: &B,
        policy: MergePolicy,
    ) -> Result<usize, TabGroupError> {
        let Some(title) = group.title() else {
            error!("tab group has no title; refusing to save");
            return Err(TabGroupError::TitleMissing);
        };
        if group.is_ungrouped() {
            return Err(TabGroupError::UngroupedNotPersistable);
        }

        let index = self
            .metadata
            .load()
            .map_err(|e| TabGroupError::save(title, e))?;
        let previous_count = index.get(title).map(|r| r.count);
        let mut tabs =
            Self::capture_tabs(group, browser).map_err(|e| TabGroupError::save(title, e))?;

        if let (Some(count), MergePolicy::Merge) = (previous_count, policy) {
            match self.load(title, count) {
                Ok(Some(stored)) => tabs = merge_tabs(&stored.tabs, &tabs),
                Ok(None) => warn!(title, "stored chunks missing; saving captured tabs only"),
                Err(e @ TabGroupError::Deserialization { .. }) => {
                    warn!(title, error = %e, "stored version unreadable; saving captured tabs only")
                }
                Err(e) => return Err(TabGroupError::save(title, e)),
            }
        }

        let group = group.clone().with_tabs(tabs);
        let payload = self
            .encode(&group)
            .map_err(|e| TabGroupError::save(title, e))?;
        let chunks = split_chunks(&payload, self.chunk_size);

        // Bail out before touching any chunk key.
        if chunks.len() > self.max_chunks {
            error!(
                title,
                required = chunks.len(),
                max = self.max_chunks,
                "tab group exceeds chunk capacity"
            );
            return Err(TabGroupError::save(
                title,
                TabGroupError::CapacityExceeded {
                    title: title.to_string(),
                    required: chunks.len(),
                    max: self.max_chunks,
                },
            ));
        }

        let previous = match previous_count {
            Some(count) => {
                let keys: Vec<String> = (0..count).map(|i| chunk_key(title, i)).collect();
                self.store
                    .get_many(&keys)
                    .map_err(|e| TabGroupError::save(title, e))?
            }
            None => HashMap::new(),
        };
        for (i, chunk) in chunks.iter().enumerate() {
            if let Err(e) = self.store.set(&chunk_key(title, i), chunk) {
                error!(title, chunk = i, error = %e, "chunk write failed; rolling back");
                self.roll_back(title, i + 1, &previous, &index);
                return Err(TabGroupError::save(title, e));
            }
        }

        let index = index.upsert(title, chunks.len());
        self.metadata
            .persist(&index)
            .map_err(|e| TabGroupError::save(title, e))?;

        // A shrinking group leaves its tail chunks behind; they are no longer indexed.
        if let Some(old) = previous_count {
            for i in chunks.len()..old {
                if let Err(e) = self.store.remove(&chunk_key(title, i)) {
                    warn!(title, chunk = i, error = %e, "failed to remove stale chunk");
                }
            }
        }

        info!(
            title,
            chunks = chunks.len(),
            bytes = self.codec.byte_count(&payload),
            tabs = group.tabs.len(),
            "saved tab group"
        );
        Ok(chunks.len())
    }

    fn load(&self, title: &str, chunk_count: usize) -> Result<Option<TabGroup>, TabGroupError> {
        if chunk_count == 0 {
            return Ok(None);
        }
        let keys: Vec<String> = (0..chunk_count).map(|i| chunk_key(title, i)).collect();
        let found = self.store.get_many(&keys)?;

        let mut payload = String::new();
        for key in &keys {
            match found.get(key) {
                Some(chunk) => payload.push_str(chunk),
                None => {
                    debug!(title, key = %key, "chunk missing; treating group as absent");
                    return Ok(None);
                }
            }
        }

        let json = self
            .codec
            .decompress(&payload)
            .map_err(|e| TabGroupError::deserialization(title, e))?;
        let dto: TabGroupDto =
            serde_json::from_str(&json).map_err(|e| TabGroupError::deserialization(title, e))?;
        debug!(title, chunks = chunk_count, tabs = dto.tabs.len(), "loaded tab group");
        Ok(Some(dto.into_stored_group()))
    }

    fn remove(&self, title: &str) -> Result<bool, TabGroupError> {
        let index = self.metadata.load()?;
        let Some(count) = index.get(title).map(|r| r.count) else {
            debug!(title, "no stored tab group to remove");
            return Ok(false);
        };

        for i in 0..count {
            self.store.remove(&chunk_key(title, i))?;
        }
        self.metadata.persist(&index.remove(title))?;
        info!(title, chunks = count, "removed stored tab group");
        Ok(true)
    }

    fn load_all(&self) -> Result<Vec<TabGroup>, TabGroupError> {
        let index = self.metadata.load()?;
        let mut groups = Vec::with_capacity(index.len());
        for record in index.records() {
            match self.load(&record.title, record.count) {
                Ok(Some(group)) => groups.push(group),
                Ok(None) => warn!(title = %record.title, "indexed tab group has missing chunks"),
                Err(e @ TabGroupError::Deserialization { .. }) => {
                    warn!(title = %record.title, error = %e, "skipping unreadable tab group")
                }
                Err(e) => return Err(e),
            }
        }
        Ok(groups)
    }

    fn sweep_orphans(&self) -> Result<usize, TabGroupError> {
        let index = self.metadata.load()?;
        let mut removed = 0;
        for key in self.store.keys()? {
            let Some((title, i)) = parse_chunk_key(&key) else {
                continue;
            };
            let indexed = index.get(title).map_or(false, |r| i < r.count);
            if !indexed {
                self.store.remove(&key)?;
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, "swept orphan chunk keys");
        }
        Ok(removed)
    }

    fn metadata_index(&self) -> Result<MetadataIndex, TabGroupError> {
        Ok(self.metadata.load()?)
    }
}
