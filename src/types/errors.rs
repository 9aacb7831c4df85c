use thiserror::Error;

/// Boxed underlying cause carried by wrapping errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// === CodecError ===

/// Errors raised by the compression codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The deflate encoder failed to produce output.
    #[error("Compression failed: {0}")]
    Compression(String),
    /// The encoded input is not valid base64, not a deflate stream, or not UTF-8.
    #[error("Decode failed: {0}")]
    Decode(String),
}

// === StorageError ===

/// Errors raised by a key/value store backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A single item exceeds the per-item byte quota.
    #[error("Item '{key}' is {size} bytes, quota is {quota} bytes")]
    QuotaBytesPerItem { key: String, size: usize, quota: usize },
    /// Writing a new key would exceed the item-count budget.
    #[error("Item count budget of {max_items} reached while writing '{key}'")]
    MaxItems { key: String, max_items: usize },
    /// The underlying backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
    /// A stored value could not be serialized or parsed.
    #[error("Storage serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

// === TabGroupError ===

/// Errors related to tab group persistence and orchestration.
#[derive(Debug, Error)]
pub enum TabGroupError {
    /// The group has no title, so it cannot key storage.
    #[error("Tab group has no title and cannot be saved")]
    TitleMissing,
    /// A tab without a title cannot be projected for storage.
    #[error("Tab has no title")]
    TabTitleMissing,
    /// A tab without a URL cannot be projected for storage.
    #[error("Tab has no URL")]
    TabUrlMissing,
    /// The ungrouped bucket is a display aid and is never persisted.
    #[error("Ungrouped tabs cannot be saved as a tab group")]
    UngroupedNotPersistable,
    /// Only groups read back from storage can be restored.
    #[error("Tab group is not a stored group")]
    NotStored,
    /// The compressed payload needs more chunks than allowed.
    #[error("Tab group '{title}' needs {required} chunks, limit is {max}")]
    CapacityExceeded { title: String, required: usize, max: usize },
    /// Saving failed; `source` holds the original cause.
    #[error("Failed to save tab group '{title}'")]
    Save {
        title: String,
        #[source]
        source: BoxError,
    },
    /// Stored chunks could not be decompressed or parsed.
    #[error("Failed to read stored tab group '{title}'")]
    Deserialization {
        title: String,
        #[source]
        source: BoxError,
    },
    /// A storage read or delete failed outside of the save path.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Reading extension options failed.
    #[error(transparent)]
    Options(#[from] OptionsError),
    /// A browser collaborator call failed.
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl TabGroupError {
    pub(crate) fn save(title: &str, source: impl Into<BoxError>) -> Self {
        TabGroupError::Save {
            title: title.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn deserialization(title: &str, source: impl Into<BoxError>) -> Self {
        TabGroupError::Deserialization {
            title: title.to_string(),
            source: source.into(),
        }
    }

    /// Returns true if this error, or the cause it wraps, is a capacity overflow.
    pub fn is_capacity_exceeded(&self) -> bool {
        match self {
            TabGroupError::CapacityExceeded { .. } => true,
            TabGroupError::Save { source, .. } => matches!(
                source.downcast_ref::<TabGroupError>(),
                Some(TabGroupError::CapacityExceeded { .. })
            ),
            _ => false,
        }
    }
}

// === OptionsError ===

/// Errors related to extension options.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Reading options from storage failed.
    #[error("Failed to read extension options: {0}")]
    Get(String),
    /// Writing options to storage failed.
    #[error("Failed to save extension options: {0}")]
    Save(String),
    /// The option key is unknown.
    #[error("Invalid option key: {0}")]
    InvalidKey(String),
}

// === BrowserError ===

/// Errors reported by the live browser state provider.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    TabNotFound(i32),
    /// Tab group with the given ID was not found.
    #[error("Tab group not found: {0}")]
    GroupNotFound(i32),
    /// Window with the given ID was not found.
    #[error("Window not found: {0}")]
    WindowNotFound(i32),
    /// Grouping requires at least one tab.
    #[error("Cannot group an empty tab list")]
    EmptyGroup,
    /// The browser could not answer a state query.
    #[error("Browser query failed: {0}")]
    Query(String),
}
