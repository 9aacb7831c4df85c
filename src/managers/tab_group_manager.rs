//! Tab Group Manager for Tabstash.
//!
//! Ties the live browser, the persistence engine and the extension options
//! together: listing, saving, restoring, closing, highlighting and searching
//! tab groups.

use std::sync::Arc;

use tracing::{debug, info};

use super::browser_state::BrowserStateProvider;
use super::persistence_engine::{PersistenceEngine, PersistenceEngineTrait};
use crate::services::options_engine::{OptionsEngine, OptionsEngineTrait};
use crate::storage::KeyValueStore;
use crate::types::errors::TabGroupError;
use crate::types::options::{ExtensionOptions, MergePolicy};
use crate::types::tab::BrowserTab;
use crate::types::tab_group::{GroupIdentity, TabGroup};

/// Trait defining the tab group flows exposed to callers.
pub trait TabGroupManagerTrait {
    fn live_groups(&self) -> Result<Vec<TabGroup>, TabGroupError>;
    fn ungrouped_tabs(&self, title: &str) -> Result<TabGroup, TabGroupError>;
    fn stored_groups(&self) -> Result<Vec<TabGroup>, TabGroupError>;
    fn visible_groups(&mut self) -> Result<Vec<TabGroup>, TabGroupError>;
    fn save(&mut self, group: &TabGroup) -> Result<usize, TabGroupError>;
    fn save_with_policy(&self, group: &TabGroup, policy: MergePolicy) -> Result<usize, TabGroupError>;
    fn remove_stored(&self, title: &str) -> Result<bool, TabGroupError>;
    fn restore(&mut self, group: &TabGroup) -> Result<Option<TabGroup>, TabGroupError>;
    fn close(&mut self, group: &TabGroup) -> Result<(), TabGroupError>;
    fn highlight(&mut self, group: &TabGroup) -> Result<(), TabGroupError>;
    fn is_in_current_window(&self, group: &TabGroup) -> Result<bool, TabGroupError>;
    fn search(&mut self, query: &str) -> Result<Vec<TabGroup>, TabGroupError>;
}

/// Tab group orchestration over a browser `B` and a store `S`.
pub struct TabGroupManager<S: KeyValueStore, B: BrowserStateProvider> {
    engine: PersistenceEngine<S>,
    options: OptionsEngine<S>,
    browser: B,
}

impl<S: KeyValueStore, B: BrowserStateProvider> TabGroupManager<S, B> {
    /// Creates a manager and reads the current options from the store.
    pub fn new(store: Arc<S>, browser: B) -> Result<Self, TabGroupError> {
        let engine = PersistenceEngine::new(store.clone());
        Self::with_engine(engine, store, browser)
    }

    pub fn with_engine(
        engine: PersistenceEngine<S>,
        store: Arc<S>,
        browser: B,
    ) -> Result<Self, TabGroupError> {
        let mut options = OptionsEngine::new(store);
        options.load()?;
        Ok(Self {
            engine,
            options,
            browser,
        })
    }

    pub fn engine(&self) -> &PersistenceEngine<S> {
        &self.engine
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut B {
        &mut self.browser
    }

    pub fn options_engine(&mut self) -> &mut OptionsEngine<S> {
        &mut self.options
    }

    /// Re-reads options so each flow sees the latest stored values.
    fn current_options(&mut self) -> Result<ExtensionOptions, TabGroupError> {
        Ok(self.options.load()?)
    }

    /// Tabs the browser currently holds for `group`.
    fn live_tabs_of(&self, group: &TabGroup) -> Result<Vec<BrowserTab>, TabGroupError> {
        let tabs = match group.identity {
            GroupIdentity::Live { id, .. } => self.browser.list_tabs(id)?,
            GroupIdentity::Ungrouped => self.browser.list_ungrouped_tabs()?,
            GroupIdentity::Stored => Vec::new(),
        };
        Ok(tabs)
    }
}

impl<S: KeyValueStore, B: BrowserStateProvider> TabGroupManagerTrait for TabGroupManager<S, B> {
    fn live_groups(&self) -> Result<Vec<TabGroup>, TabGroupError> {
        self.browser
            .list_groups()?
            .iter()
            .map(|d| Ok(TabGroup::from(d).with_tabs(self.browser.list_tabs(d.id)?)))
            .collect()
    }

    fn ungrouped_tabs(&self, title: &str) -> Result<TabGroup, TabGroupError> {
        Ok(TabGroup::ungrouped(title, self.browser.list_ungrouped_tabs()?))
    }

    fn stored_groups(&self) -> Result<Vec<TabGroup>, TabGroupError> {
        self.engine.load_all()
    }

    /// Live groups, then stored groups, then the ungrouped bucket if enabled.
    fn visible_groups(&mut self) -> Result<Vec<TabGroup>, TabGroupError> {
        let options = self.current_options()?;
        let mut groups = self.live_groups()?;
        groups.extend(self.stored_groups()?);
        if options.show_ungrouped_tabs {
            let bucket = self.ungrouped_tabs("")?;
            if !bucket.tabs.is_empty() {
                groups.push(bucket);
            }
        }
        Ok(groups)
    }

    /// Saves with the merge policy from the stored options.
    fn save(&mut self, group: &TabGroup) -> Result<usize, TabGroupError> {
        let policy = self.current_options()?.merge_policy();
        self.save_with_policy(group, policy)
    }

    fn save_with_policy(&self, group: &TabGroup, policy: MergePolicy) -> Result<usize, TabGroupError> {
        self.engine.save(group, &self.browser, policy)
    }

    fn remove_stored(&self, title: &str) -> Result<bool, TabGroupError> {
        self.engine.remove(title)
    }

    /// Reopens a stored group as a live group.
    ///
    /// Returns `Ok(None)` when the stored group has no restorable tabs.
    fn restore(&mut self, group: &TabGroup) -> Result<Option<TabGroup>, TabGroupError> {
        if !group.is_stored() {
            return Err(TabGroupError::NotStored);
        }
        let options = self.current_options()?;

        let tab_ids: Vec<_> = group
            .tabs
            .iter()
            .filter_map(|tab| tab.url.as_deref())
            .filter_map(|url| self.browser.create_tab(url, false).id)
            .collect();
        if tab_ids.is_empty() {
            debug!(title = ?group.title, "stored group has no tabs to restore");
            return Ok(None);
        }

        let group_id = self.browser.group_tabs(&tab_ids)?;
        let mut descriptor = self
            .browser
            .update_group(group_id, group.title.as_deref(), group.color)?;

        if options.open_in_new_window {
            let window_id = self.browser.create_window(true);
            self.browser.move_group(group_id, window_id)?;
            descriptor.window_id = window_id;
        }
        if options.remove_saved_tab_group_when_restore {
            if let Some(title) = group.title() {
                self.engine.remove(title)?;
            }
        }

        let restored = TabGroup::from(&descriptor).with_tabs(self.browser.list_tabs(group_id)?);
        info!(
            title = ?restored.title,
            group_id,
            tabs = restored.tabs.len(),
            "restored tab group"
        );
        Ok(Some(restored))
    }

    /// Closes every tab of a live group, ungrouping those in the current window first.
    fn close(&mut self, group: &TabGroup) -> Result<(), TabGroupError> {
        let GroupIdentity::Live { id, .. } = group.identity else {
            debug!(title = ?group.title, "only live groups can be closed");
            return Ok(());
        };
        let tabs = self.browser.list_tabs(id)?;
        let current = self.browser.current_window();
        let in_current: Vec<_> = tabs
            .iter()
            .filter(|t| t.window_id == current)
            .filter_map(|t| t.id)
            .collect();
        if !in_current.is_empty() {
            self.browser.ungroup_tabs(&in_current)?;
        }
        for tab_id in tabs.iter().filter_map(|t| t.id) {
            self.browser.remove_tab(tab_id)?;
        }
        info!(group_id = id, tabs = tabs.len(), "closed tab group");
        Ok(())
    }

    /// Brings the group's first tab to the front, reloading it if configured.
    fn highlight(&mut self, group: &TabGroup) -> Result<(), TabGroupError> {
        let options = self.current_options()?;
        let Some(target) = self.live_tabs_of(group)?.into_iter().next() else {
            return Ok(());
        };
        if self.browser.current_window() != target.window_id {
            self.browser.focus_window(target.window_id)?;
        }
        self.browser.highlight_tab(target.index, target.window_id)?;
        if options.reload_on_highlight {
            if let Some(tab_id) = target.id {
                self.browser.reload_tab(tab_id)?;
            }
        }
        Ok(())
    }

    fn is_in_current_window(&self, group: &TabGroup) -> Result<bool, TabGroupError> {
        let current = self.browser.current_window();
        match group.identity {
            GroupIdentity::Live { id, .. } => Ok(self
                .browser
                .list_tabs(id)?
                .iter()
                .any(|t| t.window_id == current)),
            GroupIdentity::Stored | GroupIdentity::Ungrouped => Ok(false),
        }
    }

    fn search(&mut self, query: &str) -> Result<Vec<TabGroup>, TabGroupError> {
        let include_url = self.current_options()?.search_includes_url;
        Ok(self
            .visible_groups()?
            .iter()
            .filter_map(|g| g.contains(query, include_url))
            .collect())
    }
}
