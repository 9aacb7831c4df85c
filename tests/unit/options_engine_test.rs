//! Unit tests for the options engine.

use std::sync::Arc;

use rstest::rstest;

use tabstash::services::options_engine::{OptionsEngine, OptionsEngineTrait};
use tabstash::storage::{KeyValueStore, MemoryStore};
use tabstash::types::errors::OptionsError;
use tabstash::types::options::{ExtensionOptions, MergePolicy};

fn engine() -> (Arc<MemoryStore>, OptionsEngine<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), OptionsEngine::new(store))
}

#[test]
fn test_empty_store_loads_all_false() {
    let (_store, mut engine) = engine();
    let options = engine.load().unwrap();
    assert_eq!(options, ExtensionOptions::default());
    assert_eq!(options.merge_policy(), MergePolicy::Merge);
}

#[rstest]
#[case("overwriteTabGroup")]
#[case("openInNewWindow")]
#[case("removeSavedTabGroupWhenRestore")]
#[case("reloadOnHighlight")]
#[case("showUnGroupedTabs")]
#[case("searchIncludesUrl")]
fn test_set_value_persists_each_key(#[case] key: &str) {
    let (store, mut engine) = engine();
    engine.set_value(key, true).unwrap();
    assert_eq!(store.get(key).unwrap().as_deref(), Some("true"));

    let mut fresh = OptionsEngine::new(store);
    let reloaded = fresh.load().unwrap();
    assert_eq!(reloaded, *engine.get_options());
    assert_ne!(reloaded, ExtensionOptions::default());
}

#[test]
fn test_overwrite_flag_selects_policy() {
    let (_store, mut engine) = engine();
    engine.set_value("overwriteTabGroup", true).unwrap();
    assert_eq!(engine.get_options().merge_policy(), MergePolicy::Overwrite);
}

#[test]
fn test_set_value_unknown_key_is_rejected() {
    let (store, mut engine) = engine();
    let err = engine.set_value("darkMode", true).unwrap_err();
    assert!(matches!(err, OptionsError::InvalidKey(ref k) if k == "darkMode"));
    assert!(store.is_empty());
}

#[test]
fn test_reset_writes_false_for_every_key() {
    let (store, mut engine) = engine();
    engine.set_value("reloadOnHighlight", true).unwrap();
    engine.set_value("searchIncludesUrl", true).unwrap();

    engine.reset().unwrap();

    assert_eq!(engine.get_options(), &ExtensionOptions::default());
    for key in ExtensionOptions::KEYS {
        assert_eq!(store.get(key).unwrap().as_deref(), Some("false"), "{}", key);
    }
}

#[test]
fn test_save_writes_current_values() {
    let (store, mut engine) = engine();
    engine.set_value("openInNewWindow", true).unwrap();
    store.remove("openInNewWindow").unwrap();

    engine.save().unwrap();
    assert_eq!(store.get("openInNewWindow").unwrap().as_deref(), Some("true"));
    assert_eq!(store.get("reloadOnHighlight").unwrap().as_deref(), Some("false"));
}

#[test]
fn test_load_picks_up_external_writes() {
    let (store, mut engine) = engine();
    engine.load().unwrap();
    store.set("showUnGroupedTabs", "true").unwrap();
    assert!(engine.load().unwrap().show_ungrouped_tabs);
}
