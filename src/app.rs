//! App Core for Tabstash.
//!
//! Central struct holding the store and the tab group manager for the
//! lifetime of the native messaging host.

use std::sync::Arc;

use tracing::{info, warn};

use crate::database::connection::Database;
use crate::managers::browser_state::InMemoryBrowser;
use crate::managers::tab_group_manager::TabGroupManager;
use crate::storage::SqliteStore;

/// Central application struct.
///
/// The browser side is held in memory: the host only sees tabs that its
/// caller describes, and persists them through the shared SQLite store.
pub struct App {
    pub store: Arc<SqliteStore>,
    pub tab_groups: TabGroupManager<SqliteStore, InMemoryBrowser>,
}

impl App {
    /// Opens (or creates) the database at `db_path` and wires the managers.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Database::open(db_path)?;
        Self::with_database(db)
    }

    /// Builds an app over an already opened database.
    pub fn with_database(db: Database) -> Result<Self, Box<dyn std::error::Error>> {
        let store = Arc::new(SqliteStore::new(db));
        let tab_groups = TabGroupManager::new(store.clone(), InMemoryBrowser::new())
            .map_err(|e| format!("TabGroupManager init failed: {}", e))?;
        Ok(Self { store, tab_groups })
    }

    /// Startup sequence: drop chunk keys left behind by interrupted saves.
    pub fn startup(&mut self) {
        use crate::managers::persistence_engine::PersistenceEngineTrait;

        match self.tab_groups.engine().sweep_orphans() {
            Ok(0) => {}
            Ok(removed) => info!(removed, "cleaned up orphan chunks on startup"),
            Err(e) => warn!(error = %e, "orphan sweep failed on startup"),
        }
    }
}
