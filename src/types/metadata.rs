use serde::{Deserialize, Serialize};

/// Physical layout of one stored tab group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: String,
    /// Number of chunk keys the group occupies.
    pub count: usize,
}

/// Snapshot of the directory of stored tab groups, keyed by title.
///
/// Updates are pure: `upsert` and `remove` consume the snapshot and return
/// the next one, which the caller then persists as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetadataIndex {
    #[serde(default)]
    records: Vec<MetadataRecord>,
}

impl MetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, title: &str) -> Option<&MetadataRecord> {
        self.records.iter().find(|r| r.title == title)
    }

    /// Inserts a record, or overwrites the chunk count of an existing one.
    pub fn upsert(mut self, title: &str, count: usize) -> Self {
        match self.records.iter_mut().find(|r| r.title == title) {
            Some(record) => record.count = count,
            None => self.records.push(MetadataRecord {
                title: title.to_string(),
                count,
            }),
        }
        self
    }

    pub fn remove(mut self, title: &str) -> Self {
        self.records.retain(|r| r.title != title);
        self
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Collapses duplicate titles left by hand-edited or legacy documents.
    /// The last occurrence wins.
    pub(crate) fn deduplicated(self) -> Self {
        self.records
            .into_iter()
            .fold(MetadataIndex::new(), |index, r| index.upsert(&r.title, r.count))
    }
}
