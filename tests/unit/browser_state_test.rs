//! Unit tests for the in-memory browser state provider.

use tabstash::managers::browser_state::{BrowserStateProvider, InMemoryBrowser};
use tabstash::types::errors::BrowserError;
use tabstash::types::tab_group::TabGroupColor;

#[test]
fn test_new_browser_has_one_focused_window() {
    let browser = InMemoryBrowser::new();
    assert_eq!(browser.windows(), &[1]);
    assert_eq!(browser.current_window(), 1);
    assert!(browser.list_groups().unwrap().is_empty());
}

#[test]
fn test_create_tab_appends_with_url_as_title() {
    let mut browser = InMemoryBrowser::new();
    let first = browser.create_tab("https://a.test/", false);
    let second = browser.create_tab("https://b.test/", true);

    assert_eq!(first.index, 0);
    assert_eq!(second.index, 1);
    assert_eq!(second.title.as_deref(), Some("https://b.test/"));
    assert!(browser.tab(second.id.unwrap()).unwrap().active);
    assert_eq!(browser.list_ungrouped_tabs().unwrap().len(), 2);
}

#[test]
fn test_group_and_update_group() {
    let mut browser = InMemoryBrowser::new();
    let a = browser.open_tab("A", "https://a.test/").id.unwrap();
    let b = browser.open_tab("B", "https://b.test/").id.unwrap();

    let gid = browser.group_tabs(&[a, b]).unwrap();
    let descriptor = browser.update_group(gid, Some("Work"), TabGroupColor::Cyan).unwrap();

    assert_eq!(descriptor.title.as_deref(), Some("Work"));
    assert_eq!(descriptor.color, TabGroupColor::Cyan);
    assert_eq!(browser.list_tabs(gid).unwrap().len(), 2);
    assert!(browser.list_ungrouped_tabs().unwrap().is_empty());
}

#[test]
fn test_group_tabs_rejects_empty_and_unknown() {
    let mut browser = InMemoryBrowser::new();
    assert!(matches!(browser.group_tabs(&[]), Err(BrowserError::EmptyGroup)));
    assert!(matches!(browser.group_tabs(&[42]), Err(BrowserError::TabNotFound(42))));
}

#[test]
fn test_regrouping_moves_tabs_and_prunes_old_group() {
    let mut browser = InMemoryBrowser::new();
    let a = browser.open_tab("A", "https://a.test/").id.unwrap();
    let first = browser.group_tabs(&[a]).unwrap();
    let second = browser.group_tabs(&[a]).unwrap();

    let ids: Vec<_> = browser.list_groups().unwrap().iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![second]);
    assert!(browser.list_tabs(first).unwrap().is_empty());
}

#[test]
fn test_ungroup_then_group_disappears() {
    let mut browser = InMemoryBrowser::new();
    let a = browser.open_tab("A", "https://a.test/").id.unwrap();
    let gid = browser.group_tabs(&[a]).unwrap();
    browser.ungroup_tabs(&[a]).unwrap();
    assert!(browser.list_groups().unwrap().is_empty());
    assert!(matches!(
        browser.update_group(gid, None, TabGroupColor::Grey),
        Err(BrowserError::GroupNotFound(_))
    ));
}

#[test]
fn test_move_group_to_new_window_reindexes() {
    let mut browser = InMemoryBrowser::new();
    let stay = browser.open_tab("Stay", "https://s.test/").id.unwrap();
    let go = browser.open_tab("Go", "https://g.test/").id.unwrap();
    let gid = browser.group_tabs(&[go]).unwrap();

    let window = browser.create_window(false);
    assert_eq!(browser.current_window(), 1);
    browser.move_group(gid, window).unwrap();

    let moved = browser.tab(go).unwrap();
    assert_eq!(moved.window_id, window);
    assert_eq!(moved.index, 0);
    assert_eq!(browser.tab(stay).unwrap().index, 0);
    assert_eq!(browser.list_groups().unwrap()[0].window_id, window);
}

#[test]
fn test_move_group_to_unknown_window_fails() {
    let mut browser = InMemoryBrowser::new();
    let a = browser.open_tab("A", "https://a.test/").id.unwrap();
    let gid = browser.group_tabs(&[a]).unwrap();
    assert!(matches!(
        browser.move_group(gid, 99),
        Err(BrowserError::WindowNotFound(99))
    ));
}

#[test]
fn test_remove_tab_reindexes_and_prunes() {
    let mut browser = InMemoryBrowser::new();
    let a = browser.open_tab("A", "https://a.test/").id.unwrap();
    let b = browser.open_tab("B", "https://b.test/").id.unwrap();
    let gid = browser.group_tabs(&[a]).unwrap();

    browser.remove_tab(a).unwrap();
    assert_eq!(browser.tab(b).unwrap().index, 0);
    assert!(browser.list_tabs(gid).unwrap().is_empty());
    assert!(browser.list_groups().unwrap().is_empty());
    assert!(matches!(browser.remove_tab(a), Err(BrowserError::TabNotFound(_))));
}

#[test]
fn test_focus_highlight_and_reload() {
    let mut browser = InMemoryBrowser::new();
    browser.open_tab("A", "https://a.test/");
    let b = browser.open_tab("B", "https://b.test/").id.unwrap();
    let window = browser.create_window(false);

    browser.focus_window(window).unwrap();
    assert_eq!(browser.current_window(), window);
    assert!(matches!(browser.focus_window(7), Err(BrowserError::WindowNotFound(7))));

    browser.highlight_tab(1, 1).unwrap();
    let tab = browser.tab(b).unwrap();
    assert!(tab.active && tab.highlighted);
    assert!(browser.highlight_tab(5, 1).is_err());

    browser.reload_tab(b).unwrap();
    assert_eq!(browser.reloaded_tabs(), &[b]);
    assert!(browser.reload_tab(99).is_err());
}
