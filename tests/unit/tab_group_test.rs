//! Unit tests for the tab group entity model: identities, projections and search.

use rstest::rstest;
use serde_json::json;

use tabstash::types::errors::TabGroupError;
use tabstash::types::tab::{BrowserTab, TabDto};
use tabstash::types::tab_group::{GroupIdentity, TabGroup, TabGroupColor, TabGroupDto};

fn research() -> TabGroup {
    TabGroup::stored(
        "Research",
        TabGroupColor::Blue,
        vec![
            BrowserTab::detached("Rust Book", "https://doc.rust-lang.org/book/"),
            BrowserTab::detached("Crates", "https://crates.io/"),
        ],
    )
}

// ─── Identity ───

#[test]
fn test_discriminators_are_exclusive() {
    let live = TabGroup::live(4, 1, Some("Work".to_string()), TabGroupColor::Red, false);
    let stored = research();
    let ungrouped = TabGroup::ungrouped("Other", Vec::new());

    assert!(live.is_open() && !live.is_stored() && !live.is_ungrouped());
    assert!(stored.is_stored() && !stored.is_open() && !stored.is_ungrouped());
    assert!(ungrouped.is_ungrouped() && !ungrouped.is_open() && !ungrouped.is_stored());

    assert_eq!(live.live_id(), Some(4));
    assert_eq!(stored.live_id(), None);
    assert_eq!(ungrouped.live_id(), None);
}

#[test]
fn test_empty_title_counts_as_missing() {
    let group = TabGroup::live(1, 1, Some(String::new()), TabGroupColor::Grey, false);
    assert_eq!(group.title(), None);
    let group = TabGroup::live(1, 1, None, TabGroupColor::Grey, false);
    assert_eq!(group.title(), None);
}

#[test]
fn test_identity_serializes_with_kind_tag() {
    let value = serde_json::to_value(GroupIdentity::Live { id: 3, window_id: 2 }).unwrap();
    assert_eq!(value, json!({"kind": "live", "id": 3, "windowId": 2}));
    assert_eq!(
        serde_json::to_value(GroupIdentity::Stored).unwrap(),
        json!({"kind": "stored"})
    );
}

// ─── Projection ───

#[test]
fn test_dto_keeps_only_durable_fields() {
    let mut group = research();
    group.tabs[0].id = Some(99);
    group.tabs[0].pinned = true;
    group.collapsed = true;

    let dto = TabGroupDto::try_from(&group).unwrap();
    let value = serde_json::to_value(&dto).unwrap();
    assert_eq!(
        value,
        json!({
            "title": "Research",
            "color": "blue",
            "tabs": [
                {"title": "Rust Book", "url": "https://doc.rust-lang.org/book/"},
                {"title": "Crates", "url": "https://crates.io/"}
            ]
        })
    );
}

#[test]
fn test_dto_without_title_is_rejected() {
    let group = TabGroup::live(1, 1, None, TabGroupColor::Grey, false);
    assert!(matches!(
        TabGroupDto::try_from(&group),
        Err(TabGroupError::TitleMissing)
    ));
}

#[rstest]
#[case(None, Some("https://a"), "title")]
#[case(Some(""), Some("https://a"), "title")]
#[case(Some("A"), None, "url")]
#[case(Some("A"), Some(""), "url")]
fn test_tab_projection_requires_title_and_url(
    #[case] title: Option<&str>,
    #[case] url: Option<&str>,
    #[case] missing: &str,
) {
    let tab = BrowserTab {
        title: title.map(str::to_string),
        url: url.map(str::to_string),
        ..BrowserTab::default()
    };
    let err = TabDto::try_from(&tab).unwrap_err();
    match missing {
        "title" => assert!(matches!(err, TabGroupError::TabTitleMissing)),
        _ => assert!(matches!(err, TabGroupError::TabUrlMissing)),
    }
}

#[test]
fn test_fav_icon_survives_projection() {
    let tab = BrowserTab {
        fav_icon_url: Some("https://a/icon.png".to_string()),
        ..BrowserTab::detached("A", "https://a")
    };
    let dto = TabDto::try_from(&tab).unwrap();
    assert_eq!(BrowserTab::from_dto(&dto), tab);
}

#[test]
fn test_dto_rebuilds_stored_group() {
    let dto: TabGroupDto = serde_json::from_value(json!({
        "title": "Research",
        "color": "blue",
        "tabs": [{"title": "A", "url": "https://x/1"}]
    }))
    .unwrap();
    let group = dto.into_stored_group();
    assert!(group.is_stored());
    assert_eq!(group.title(), Some("Research"));
    assert_eq!(group.color, TabGroupColor::Blue);
    assert_eq!(group.tabs, vec![BrowserTab::detached("A", "https://x/1")]);
    assert_eq!(group.tabs[0].id, None);
}

#[test]
fn test_dto_defaults_missing_color_and_tabs() {
    let dto: TabGroupDto = serde_json::from_value(json!({"title": "Bare"})).unwrap();
    assert_eq!(dto.color, TabGroupColor::Grey);
    assert!(dto.tabs.is_empty());
}

// ─── Search ───

#[test]
fn test_contains_title_match_without_tab_match_keeps_group_with_no_tabs() {
    let found = research().contains("RESEARCH", false).unwrap();
    assert_eq!(found.title(), Some("Research"));
    assert!(found.tabs.is_empty());
}

#[test]
fn test_contains_filters_tabs_case_insensitively() {
    let found = research().contains("rust", false).unwrap();
    assert_eq!(found.tabs.len(), 1);
    assert_eq!(found.tabs[0].title.as_deref(), Some("Rust Book"));
}

#[test]
fn test_contains_url_only_when_enabled() {
    assert!(research().contains("crates.io", false).is_none());
    let found = research().contains("crates.io", true).unwrap();
    assert_eq!(found.tabs.len(), 1);
}

#[test]
fn test_contains_no_match_is_none() {
    assert!(research().contains("kubernetes", true).is_none());
}

#[test]
fn test_contains_ignores_ungrouped_title() {
    let bucket = TabGroup::ungrouped(
        "Ungrouped",
        vec![BrowserTab::detached("News", "https://news.example")],
    );
    assert!(bucket.contains("ungrouped", false).is_none());
    assert_eq!(bucket.contains("news", false).unwrap().tabs.len(), 1);
}

#[test]
fn test_empty_query_matches_everything() {
    let found = research().contains("", false).unwrap();
    assert_eq!(found.tabs.len(), 2);
}
