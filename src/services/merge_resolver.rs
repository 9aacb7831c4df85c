//! URL-keyed merge of two tab lists.

use std::collections::HashSet;

use tracing::debug;

use crate::types::tab::BrowserTab;

/// Merges `override_list` into `primary`.
///
/// Tabs of `primary` whose URL also appears in `override_list` are dropped;
/// the survivors keep their order and are followed by the whole of
/// `override_list`, duplicates included. URLs compare exactly.
pub fn merge_tabs(primary: &[BrowserTab], override_list: &[BrowserTab]) -> Vec<BrowserTab> {
    let overriding: HashSet<Option<&str>> =
        override_list.iter().map(|t| t.url.as_deref()).collect();

    let mut merged: Vec<BrowserTab> = primary
        .iter()
        .filter(|t| !overriding.contains(&t.url.as_deref()))
        .cloned()
        .collect();
    let kept = merged.len();
    merged.extend(override_list.iter().cloned());

    debug!(
        primary = primary.len(),
        kept,
        overriding = override_list.len(),
        "merged tab lists"
    );
    merged
}
