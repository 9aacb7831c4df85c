//! Property-based tests for the persistence engine.
//!
//! Saving then loading reproduces the tab list in order together with the
//! title and color, and the returned chunk count always matches the chunk
//! keys actually present in the store.

use std::sync::Arc;

use proptest::prelude::*;
use tabstash::managers::browser_state::InMemoryBrowser;
use tabstash::managers::persistence_engine::{PersistenceEngine, PersistenceEngineTrait, MAX_CHUNKS};
use tabstash::storage::{KeyValueStore, MemoryStore, StorageQuota};
use tabstash::types::options::MergePolicy;
use tabstash::types::tab::BrowserTab;
use tabstash::types::tab_group::{TabGroup, TabGroupColor};

fn arb_color() -> impl Strategy<Value = TabGroupColor> {
    prop_oneof![
        Just(TabGroupColor::Grey),
        Just(TabGroupColor::Blue),
        Just(TabGroupColor::Red),
        Just(TabGroupColor::Yellow),
        Just(TabGroupColor::Green),
        Just(TabGroupColor::Pink),
        Just(TabGroupColor::Purple),
        Just(TabGroupColor::Cyan),
        Just(TabGroupColor::Orange),
    ]
}

fn arb_tab() -> impl Strategy<Value = BrowserTab> {
    (
        "\\PC{1,24}",
        "[a-z]{2,10}",
        "[a-zA-Z0-9/_-]{0,40}",
        proptest::option::of("[a-z]{1,8}\\.ico"),
    )
        .prop_map(|(title, host, path, icon)| BrowserTab {
            fav_icon_url: icon.map(|i| format!("https://{}.test/{}", host, i)),
            ..BrowserTab::detached(&title, &format!("https://{}.test/{}", host, path))
        })
}

fn arb_title() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _]{1,24}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn save_then_load_reconstructs_group(
        title in arb_title(),
        color in arb_color(),
        tabs in prop::collection::vec(arb_tab(), 0..40),
        chunk_size in 16usize..400,
    ) {
        let store = Arc::new(MemoryStore::with_quota(StorageQuota::unlimited()));
        let engine = PersistenceEngine::with_limits(store.clone(), chunk_size, usize::MAX);
        let group = TabGroup::stored(&title, color, tabs.clone());

        let chunks = engine
            .save(&group, &InMemoryBrowser::new(), MergePolicy::Overwrite)
            .expect("save should succeed");

        let chunk_prefix = format!("TAB_GROUP_{}_", title);
        let written = store
            .keys()
            .unwrap()
            .iter()
            .filter(|k| {
                k.strip_prefix(&chunk_prefix)
                    .map_or(false, |rest| rest.chars().all(|c| c.is_ascii_digit()))
            })
            .count();
        prop_assert_eq!(written, chunks);

        let loaded = engine
            .load(&title, chunks)
            .expect("load should succeed")
            .expect("group should be found");
        prop_assert_eq!(loaded.title(), Some(title.as_str()));
        prop_assert_eq!(loaded.color, color);
        prop_assert_eq!(loaded.tabs, tabs);
    }

    #[test]
    fn resaving_same_tabs_under_merge_is_stable(
        title in arb_title(),
        tabs in prop::collection::vec(arb_tab(), 1..20),
    ) {
        let store = Arc::new(MemoryStore::new());
        let engine = PersistenceEngine::new(store);
        let browser = InMemoryBrowser::new();
        let group = TabGroup::stored(&title, TabGroupColor::Grey, tabs.clone());

        engine.save(&group, &browser, MergePolicy::Merge).unwrap();
        let chunks = engine.save(&group, &browser, MergePolicy::Merge).unwrap();
        prop_assert!(chunks <= MAX_CHUNKS);

        let loaded = engine.load(&title, chunks).unwrap().unwrap();
        prop_assert_eq!(loaded.tabs, tabs);
    }
}
