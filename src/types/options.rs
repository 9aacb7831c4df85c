use serde::{Deserialize, Serialize};

/// How `save` treats a title that is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Combine with the stored tabs; captured tabs win on URL collision.
    Merge,
    /// Replace the stored tabs outright.
    Overwrite,
}

/// User-facing extension options. Every option defaults to `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionOptions {
    pub overwrite_tab_group: bool,
    pub open_in_new_window: bool,
    pub remove_saved_tab_group_when_restore: bool,
    pub reload_on_highlight: bool,
    #[serde(rename = "showUnGroupedTabs")]
    pub show_ungrouped_tabs: bool,
    pub search_includes_url: bool,
}

impl ExtensionOptions {
    /// Storage keys, one boolean entry per option.
    pub const KEYS: [&'static str; 6] = [
        "overwriteTabGroup",
        "openInNewWindow",
        "removeSavedTabGroupWhenRestore",
        "reloadOnHighlight",
        "showUnGroupedTabs",
        "searchIncludesUrl",
    ];

    pub fn merge_policy(&self) -> MergePolicy {
        if self.overwrite_tab_group {
            MergePolicy::Overwrite
        } else {
            MergePolicy::Merge
        }
    }
}
