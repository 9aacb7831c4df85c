//! RPC method handler for the Tabstash JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! tab group manager and the options engine via the `App` struct.

use std::error::Error;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::persistence_engine::PersistenceEngineTrait;
use crate::managers::tab_group_manager::TabGroupManagerTrait;
use crate::services::options_engine::OptionsEngineTrait;
use crate::types::options::MergePolicy;
use crate::types::tab::{BrowserTab, TabDto};
use crate::types::tab_group::{TabGroup, TabGroupColor};

/// Renders an error and its `source()` chain as one line.
pub fn describe_error(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn parse_color(params: &Value) -> Result<TabGroupColor, String> {
    match params.get("color") {
        None | Some(Value::Null) => Ok(TabGroupColor::default()),
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| format!("invalid color: {}", e)),
    }
}

fn parse_tabs(params: &Value) -> Result<Vec<BrowserTab>, String> {
    let Some(raw) = params.get("tabs") else {
        return Ok(Vec::new());
    };
    let dtos: Vec<TabDto> =
        serde_json::from_value(raw.clone()).map_err(|e| format!("invalid tabs: {}", e))?;
    Ok(dtos.iter().map(BrowserTab::from_dto).collect())
}

fn groups_to_value(groups: &[TabGroup]) -> Result<Value, String> {
    serde_json::to_value(groups).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Tab groups ───
        "tabgroup.save" => {
            let title = params.get("title").and_then(|v| v.as_str()).unwrap_or("");
            let color = parse_color(params)?;
            let tabs = parse_tabs(params)?;
            let overwrite = params.get("overwrite").and_then(|v| v.as_bool());
            let group = TabGroup::stored(title, color, tabs);

            let mut a = app.lock().map_err(|e| e.to_string())?;
            let chunks = match overwrite {
                Some(true) => a.tab_groups.save_with_policy(&group, MergePolicy::Overwrite),
                Some(false) => a.tab_groups.save_with_policy(&group, MergePolicy::Merge),
                None => a.tab_groups.save(&group),
            }
            .map_err(|e| describe_error(&e))?;
            Ok(json!({"title": title, "chunks": chunks}))
        }
        "tabgroup.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let groups = a.tab_groups.stored_groups().map_err(|e| describe_error(&e))?;
            groups_to_value(&groups)
        }
        "tabgroup.load" => {
            let title = params.get("title").and_then(|v| v.as_str()).ok_or("missing title")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let engine = a.tab_groups.engine();
            let index = engine.metadata_index().map_err(|e| describe_error(&e))?;
            let Some(record) = index.get(title) else {
                return Ok(Value::Null);
            };
            let group = engine
                .load(title, record.count)
                .map_err(|e| describe_error(&e))?;
            serde_json::to_value(group).map_err(|e| e.to_string())
        }
        "tabgroup.remove" => {
            let title = params.get("title").and_then(|v| v.as_str()).ok_or("missing title")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let removed = a.tab_groups.remove_stored(title).map_err(|e| describe_error(&e))?;
            Ok(json!({"removed": removed}))
        }
        "tabgroup.search" => {
            let query = params.get("query").and_then(|v| v.as_str()).ok_or("missing query")?;
            let include_url = params.get("include_url").and_then(|v| v.as_bool());
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let found = match include_url {
                None => a.tab_groups.search(query).map_err(|e| describe_error(&e))?,
                Some(include_url) => a
                    .tab_groups
                    .visible_groups()
                    .map_err(|e| describe_error(&e))?
                    .iter()
                    .filter_map(|g| g.contains(query, include_url))
                    .collect(),
            };
            groups_to_value(&found)
        }
        "tabgroup.sweep" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let removed = a
                .tab_groups
                .engine()
                .sweep_orphans()
                .map_err(|e| describe_error(&e))?;
            Ok(json!({"removed": removed}))
        }

        // ─── Options ───
        "options.get" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let options = a.tab_groups.options_engine().load().map_err(|e| e.to_string())?;
            serde_json::to_value(options).map_err(|e| e.to_string())
        }
        "options.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params
                .get("value")
                .and_then(|v| v.as_bool())
                .ok_or("missing value: expected a boolean")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.tab_groups
                .options_engine()
                .set_value(key, value)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
