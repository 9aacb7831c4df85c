use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};

use super::{KeyValueStore, StorageQuota};
use crate::database::connection::Database;
use crate::types::errors::StorageError;

/// Key/value store persisted in the `kv_items` SQLite table.
pub struct SqliteStore {
    db: Database,
    quota: StorageQuota,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self::with_quota(db, StorageQuota::default())
    }

    pub fn with_quota(db: Database, quota: StorageQuota) -> Self {
        Self { db, quota }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn item_count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM kv_items", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM kv_items WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let exists = self.get(key)?.is_some();
        self.quota.check(key, value, self.item_count()?, exists)?;
        self.db.connection().execute(
            "INSERT INTO kv_items (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Self::now()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db
            .connection()
            .execute("DELETE FROM kv_items WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare("SELECT key FROM kv_items ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}
