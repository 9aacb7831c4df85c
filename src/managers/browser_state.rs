use serde::{Deserialize, Serialize};

use crate::types::errors::BrowserError;
use crate::types::tab::{BrowserTab, GroupId, TabId, WindowId};
use crate::types::tab_group::{TabGroup, TabGroupColor};

/// A tab group as reported by the browser, without its tabs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupDescriptor {
    pub id: GroupId,
    pub window_id: WindowId,
    pub title: Option<String>,
    pub color: TabGroupColor,
    pub collapsed: bool,
}

impl From<&GroupDescriptor> for TabGroup {
    fn from(d: &GroupDescriptor) -> Self {
        TabGroup::live(d.id, d.window_id, d.title.clone(), d.color, d.collapsed)
    }
}

/// Trait defining the live browser state the tab group flows consume.
pub trait BrowserStateProvider {
    fn list_groups(&self) -> Result<Vec<GroupDescriptor>, BrowserError>;
    fn list_tabs(&self, group_id: GroupId) -> Result<Vec<BrowserTab>, BrowserError>;
    fn list_ungrouped_tabs(&self) -> Result<Vec<BrowserTab>, BrowserError>;
    fn create_tab(&mut self, url: &str, active: bool) -> BrowserTab;
    fn group_tabs(&mut self, tab_ids: &[TabId]) -> Result<GroupId, BrowserError>;
    fn ungroup_tabs(&mut self, tab_ids: &[TabId]) -> Result<(), BrowserError>;
    fn update_group(
        &mut self,
        group_id: GroupId,
        title: Option<&str>,
        color: TabGroupColor,
    ) -> Result<GroupDescriptor, BrowserError>;
    fn move_group(&mut self, group_id: GroupId, window_id: WindowId) -> Result<(), BrowserError>;
    fn remove_tab(&mut self, tab_id: TabId) -> Result<(), BrowserError>;
    fn create_window(&mut self, focused: bool) -> WindowId;
    fn current_window(&self) -> WindowId;
    fn focus_window(&mut self, window_id: WindowId) -> Result<(), BrowserError>;
    fn highlight_tab(&mut self, index: usize, window_id: WindowId) -> Result<(), BrowserError>;
    fn reload_tab(&mut self, tab_id: TabId) -> Result<(), BrowserError>;
}

/// In-memory browser: windows, tabs and groups with browser-like bookkeeping.
pub struct InMemoryBrowser {
    windows: Vec<WindowId>,
    current_window: WindowId,
    tabs: Vec<BrowserTab>,
    groups: Vec<GroupDescriptor>,
    reloaded: Vec<TabId>,
    next_tab_id: TabId,
    next_group_id: GroupId,
    next_window_id: WindowId,
}

impl InMemoryBrowser {
    /// Creates a browser with one empty, focused window.
    pub fn new() -> Self {
        Self {
            windows: vec![1],
            current_window: 1,
            tabs: Vec::new(),
            groups: Vec::new(),
            reloaded: Vec::new(),
            next_tab_id: 1,
            next_group_id: 1,
            next_window_id: 2,
        }
    }

    /// Opens a tab with an explicit title in the current window.
    pub fn open_tab(&mut self, title: &str, url: &str) -> BrowserTab {
        let tab = self.create_tab(url, false);
        if let Some(t) = self.tabs.iter_mut().find(|t| t.id == tab.id) {
            t.title = Some(title.to_string());
        }
        BrowserTab {
            title: Some(title.to_string()),
            ..tab
        }
    }

    pub fn tab(&self, tab_id: TabId) -> Option<&BrowserTab> {
        self.tabs.iter().find(|t| t.id == Some(tab_id))
    }

    pub fn all_tabs(&self) -> &[BrowserTab] {
        &self.tabs
    }

    pub fn windows(&self) -> &[WindowId] {
        &self.windows
    }

    /// Tabs reloaded so far, in call order.
    pub fn reloaded_tabs(&self) -> &[TabId] {
        &self.reloaded
    }

    fn find_tab_index(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == Some(tab_id))
    }

    fn find_group_index(&self, group_id: GroupId) -> Option<usize> {
        self.groups.iter().position(|g| g.id == group_id)
    }

    fn ensure_window(&self, window_id: WindowId) -> Result<(), BrowserError> {
        if self.windows.contains(&window_id) {
            Ok(())
        } else {
            Err(BrowserError::WindowNotFound(window_id))
        }
    }

    fn tabs_in_window(&self, window_id: WindowId) -> usize {
        self.tabs.iter().filter(|t| t.window_id == window_id).count()
    }

    /// Recomputes per-window tab indexes from storage order.
    fn reindex(&mut self) {
        for window_id in self.windows.clone() {
            self.tabs
                .iter_mut()
                .filter(|t| t.window_id == window_id)
                .enumerate()
                .for_each(|(i, t)| t.index = i);
        }
    }

    /// Groups disappear once their last tab leaves.
    fn prune_empty_groups(&mut self) {
        let tabs = &self.tabs;
        self.groups
            .retain(|g| tabs.iter().any(|t| t.group_id == Some(g.id)));
    }
}

impl Default for InMemoryBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserStateProvider for InMemoryBrowser {
    fn list_groups(&self) -> Result<Vec<GroupDescriptor>, BrowserError> {
        Ok(self.groups.clone())
    }

    /// An unknown group id yields no tabs, like a browser tab query would.
    fn list_tabs(&self, group_id: GroupId) -> Result<Vec<BrowserTab>, BrowserError> {
        Ok(self
            .tabs
            .iter()
            .filter(|t| t.group_id == Some(group_id))
            .cloned()
            .collect())
    }

    fn list_ungrouped_tabs(&self) -> Result<Vec<BrowserTab>, BrowserError> {
        Ok(self
            .tabs
            .iter()
            .filter(|t| t.group_id.is_none())
            .cloned()
            .collect())
    }

    /// Appends a tab to the current window; its title starts out as the URL.
    fn create_tab(&mut self, url: &str, active: bool) -> BrowserTab {
        let id = self.next_tab_id;
        self.next_tab_id += 1;
        let window_id = self.current_window;
        if active {
            self.tabs
                .iter_mut()
                .filter(|t| t.window_id == window_id)
                .for_each(|t| t.active = false);
        }
        let tab = BrowserTab {
            id: Some(id),
            index: self.tabs_in_window(window_id),
            window_id,
            title: Some(url.to_string()),
            url: Some(url.to_string()),
            active,
            ..BrowserTab::default()
        };
        self.tabs.push(tab.clone());
        tab
    }

    /// Puts the tabs into a new group in the first tab's window.
    fn group_tabs(&mut self, tab_ids: &[TabId]) -> Result<GroupId, BrowserError> {
        let first = *tab_ids.first().ok_or(BrowserError::EmptyGroup)?;
        for id in tab_ids {
            self.find_tab_index(*id).ok_or(BrowserError::TabNotFound(*id))?;
        }
        let first_idx = self
            .find_tab_index(first)
            .ok_or(BrowserError::TabNotFound(first))?;
        let window_id = self.tabs[first_idx].window_id;

        let group_id = self.next_group_id;
        self.next_group_id += 1;
        for tab in self.tabs.iter_mut() {
            if tab.id.map_or(false, |id| tab_ids.contains(&id)) {
                tab.group_id = Some(group_id);
                tab.window_id = window_id;
            }
        }
        self.groups.push(GroupDescriptor {
            id: group_id,
            window_id,
            title: None,
            color: TabGroupColor::default(),
            collapsed: false,
        });
        self.prune_empty_groups();
        self.reindex();
        Ok(group_id)
    }

    fn ungroup_tabs(&mut self, tab_ids: &[TabId]) -> Result<(), BrowserError> {
        for id in tab_ids {
            let idx = self.find_tab_index(*id).ok_or(BrowserError::TabNotFound(*id))?;
            self.tabs[idx].group_id = None;
        }
        self.prune_empty_groups();
        Ok(())
    }

    fn update_group(
        &mut self,
        group_id: GroupId,
        title: Option<&str>,
        color: TabGroupColor,
    ) -> Result<GroupDescriptor, BrowserError> {
        let idx = self
            .find_group_index(group_id)
            .ok_or(BrowserError::GroupNotFound(group_id))?;
        let group = &mut self.groups[idx];
        group.title = title.map(str::to_string);
        group.color = color;
        Ok(group.clone())
    }

    /// Moves every tab of the group to the end of the target window.
    fn move_group(&mut self, group_id: GroupId, window_id: WindowId) -> Result<(), BrowserError> {
        self.ensure_window(window_id)?;
        let idx = self
            .find_group_index(group_id)
            .ok_or(BrowserError::GroupNotFound(group_id))?;
        self.groups[idx].window_id = window_id;

        let (mut moved, rest): (Vec<BrowserTab>, Vec<BrowserTab>) = self
            .tabs
            .drain(..)
            .partition(|t| t.group_id == Some(group_id));
        moved.iter_mut().for_each(|t| t.window_id = window_id);
        self.tabs = rest;
        self.tabs.extend(moved);
        self.reindex();
        Ok(())
    }

    fn remove_tab(&mut self, tab_id: TabId) -> Result<(), BrowserError> {
        let idx = self
            .find_tab_index(tab_id)
            .ok_or(BrowserError::TabNotFound(tab_id))?;
        self.tabs.remove(idx);
        self.prune_empty_groups();
        self.reindex();
        Ok(())
    }

    fn create_window(&mut self, focused: bool) -> WindowId {
        let id = self.next_window_id;
        self.next_window_id += 1;
        self.windows.push(id);
        if focused {
            self.current_window = id;
        }
        id
    }

    fn current_window(&self) -> WindowId {
        self.current_window
    }

    fn focus_window(&mut self, window_id: WindowId) -> Result<(), BrowserError> {
        self.ensure_window(window_id)?;
        self.current_window = window_id;
        Ok(())
    }

    /// Makes the tab at `index` the active, highlighted tab of its window.
    fn highlight_tab(&mut self, index: usize, window_id: WindowId) -> Result<(), BrowserError> {
        self.ensure_window(window_id)?;
        let target = self
            .tabs
            .iter()
            .position(|t| t.window_id == window_id && t.index == index)
            .ok_or(BrowserError::TabNotFound(index as TabId))?;
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            if tab.window_id == window_id {
                tab.active = i == target;
                tab.highlighted = i == target;
            }
        }
        Ok(())
    }

    fn reload_tab(&mut self, tab_id: TabId) -> Result<(), BrowserError> {
        self.find_tab_index(tab_id)
            .ok_or(BrowserError::TabNotFound(tab_id))?;
        self.reloaded.push(tab_id);
        Ok(())
    }
}
