use serde::{Deserialize, Serialize};

use super::errors::TabGroupError;
use super::tab::{BrowserTab, GroupId, TabDto, WindowId};

/// Colors a browser tab group can take.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TabGroupColor {
    #[default]
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

/// Which kind of group an instance is.
///
/// Only a live group carries real browser identifiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GroupIdentity {
    /// Currently open in the browser.
    #[serde(rename_all = "camelCase")]
    Live { id: GroupId, window_id: WindowId },
    /// Reconstructed from storage; not open anywhere until restored.
    Stored,
    /// Synthetic bucket for tabs outside any group.
    Ungrouped,
}

/// A tab group together with its ordered tabs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub identity: GroupIdentity,
    pub title: Option<String>,
    pub color: TabGroupColor,
    pub collapsed: bool,
    pub tabs: Vec<BrowserTab>,
}

impl TabGroup {
    pub fn live(
        id: GroupId,
        window_id: WindowId,
        title: Option<String>,
        color: TabGroupColor,
        collapsed: bool,
    ) -> Self {
        Self {
            identity: GroupIdentity::Live { id, window_id },
            title,
            color,
            collapsed,
            tabs: Vec::new(),
        }
    }

    pub fn stored(title: &str, color: TabGroupColor, tabs: Vec<BrowserTab>) -> Self {
        Self {
            identity: GroupIdentity::Stored,
            title: Some(title.to_string()),
            color,
            collapsed: false,
            tabs,
        }
    }

    pub fn ungrouped(title: &str, tabs: Vec<BrowserTab>) -> Self {
        Self {
            identity: GroupIdentity::Ungrouped,
            title: Some(title.to_string()),
            color: TabGroupColor::default(),
            collapsed: false,
            tabs,
        }
    }

    /// Returns the same group with its tab list replaced.
    pub fn with_tabs(mut self, tabs: Vec<BrowserTab>) -> Self {
        self.tabs = tabs;
        self
    }

    /// Returns the title if it is present and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_open(&self) -> bool {
        matches!(self.identity, GroupIdentity::Live { .. })
    }

    pub fn is_stored(&self) -> bool {
        matches!(self.identity, GroupIdentity::Stored)
    }

    pub fn is_ungrouped(&self) -> bool {
        matches!(self.identity, GroupIdentity::Ungrouped)
    }

    /// Browser-assigned group id, for live groups only.
    pub fn live_id(&self) -> Option<GroupId> {
        match self.identity {
            GroupIdentity::Live { id, .. } => Some(id),
            GroupIdentity::Stored | GroupIdentity::Ungrouped => None,
        }
    }

    /// Case-insensitive substring search over the group title and its tabs.
    ///
    /// Returns a copy of the group holding only the matching tabs, or `None`
    /// when nothing matched. A group whose title matched but none of whose
    /// tabs did comes back with an empty tab list. The ungrouped bucket's
    /// title never takes part in matching.
    pub fn contains(&self, query: &str, include_url: bool) -> Option<TabGroup> {
        let needle = query.to_lowercase();
        let hit = |text: Option<&str>| {
            text.map(|t| t.to_lowercase().contains(&needle))
                .unwrap_or(false)
        };

        let title_matched = match self.identity {
            GroupIdentity::Ungrouped => false,
            GroupIdentity::Live { .. } | GroupIdentity::Stored => hit(self.title.as_deref()),
        };

        let tabs: Vec<BrowserTab> = self
            .tabs
            .iter()
            .filter(|tab| {
                hit(tab.title.as_deref()) || (include_url && hit(tab.url.as_deref()))
            })
            .cloned()
            .collect();

        if tabs.is_empty() && !title_matched {
            return None;
        }
        Some(self.clone().with_tabs(tabs))
    }
}

/// Durable projection of a tab group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabGroupDto {
    pub title: String,
    #[serde(default)]
    pub color: TabGroupColor,
    #[serde(default)]
    pub tabs: Vec<TabDto>,
}

impl TryFrom<&TabGroup> for TabGroupDto {
    type Error = TabGroupError;

    fn try_from(group: &TabGroup) -> Result<Self, Self::Error> {
        let title = group.title().ok_or(TabGroupError::TitleMissing)?;
        let tabs = group
            .tabs
            .iter()
            .map(TabDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            title: title.to_string(),
            color: group.color,
            tabs,
        })
    }
}

impl TabGroupDto {
    /// Rebuilds the stored-group entity from this projection.
    pub fn into_stored_group(self) -> TabGroup {
        let tabs = self.tabs.iter().map(BrowserTab::from_dto).collect();
        TabGroup::stored(&self.title, self.color, tabs)
    }
}
