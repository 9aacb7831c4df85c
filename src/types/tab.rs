use serde::{Deserialize, Serialize};

use super::errors::TabGroupError;

pub type TabId = i32;
pub type WindowId = i32;
pub type GroupId = i32;

/// Transient copy of a browser tab.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserTab {
    pub id: Option<TabId>,
    /// Zero-based position of the tab within its window.
    pub index: usize,
    pub window_id: WindowId,
    pub title: Option<String>,
    pub url: Option<String>,
    pub fav_icon_url: Option<String>,
    pub active: bool,
    pub pinned: bool,
    pub highlighted: bool,
    pub discarded: bool,
    pub incognito: bool,
    /// `None` when the tab does not belong to any group.
    pub group_id: Option<GroupId>,
}

impl BrowserTab {
    /// Rebuilds a detached tab from its stored projection.
    ///
    /// Browser identifiers are left unset; the tab has no live presence.
    pub fn from_dto(dto: &TabDto) -> Self {
        Self {
            title: Some(dto.title.clone()),
            url: Some(dto.url.clone()),
            fav_icon_url: dto.fav_icon_url.clone(),
            ..Self::default()
        }
    }

    /// Convenience constructor for a detached tab with a title and URL.
    pub fn detached(title: &str, url: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            ..Self::default()
        }
    }
}

/// Durable projection of a tab: the subset that is actually persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabDto {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

impl TryFrom<&BrowserTab> for TabDto {
    type Error = TabGroupError;

    fn try_from(tab: &BrowserTab) -> Result<Self, Self::Error> {
        let title = match tab.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(TabGroupError::TabTitleMissing),
        };
        let url = match tab.url.as_deref() {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => return Err(TabGroupError::TabUrlMissing),
        };
        Ok(Self {
            title,
            url,
            fav_icon_url: tab.fav_icon_url.clone(),
        })
    }
}
