// Tabstash Options Engine
// Manages extension options: loading, saving, updating individual values, and resetting to defaults.
// Each option is stored as its own boolean entry in the key/value store; a missing entry reads as false.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::storage::KeyValueStore;
use crate::types::errors::OptionsError;
use crate::types::options::ExtensionOptions;

/// Trait defining the options engine interface.
pub trait OptionsEngineTrait {
    fn load(&mut self) -> Result<ExtensionOptions, OptionsError>;
    fn save(&self) -> Result<(), OptionsError>;
    fn get_options(&self) -> &ExtensionOptions;
    fn set_value(&mut self, key: &str, value: bool) -> Result<(), OptionsError>;
    fn reset(&mut self) -> Result<(), OptionsError>;
}

/// Options engine backed by a key/value store.
pub struct OptionsEngine<S: KeyValueStore> {
    store: Arc<S>,
    options: ExtensionOptions,
}

impl<S: KeyValueStore> OptionsEngine<S> {
    /// Creates an engine holding default options. Call `load` to read the store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            options: ExtensionOptions::default(),
        }
    }

    fn to_object(options: &ExtensionOptions) -> Result<serde_json::Map<String, Value>, String> {
        match serde_json::to_value(options).map_err(|e| e.to_string())? {
            Value::Object(map) => Ok(map),
            _ => Err("options did not serialize to an object".to_string()),
        }
    }

    fn read_flag(&self, key: &str) -> Result<bool, OptionsError> {
        let raw = self
            .store
            .get(key)
            .map_err(|e| OptionsError::Get(e.to_string()))?;
        match raw {
            None => Ok(false),
            Some(text) => serde_json::from_str::<bool>(&text)
                .map_err(|e| OptionsError::Get(format!("'{}' is not a boolean: {}", key, e))),
        }
    }
}

impl<S: KeyValueStore> OptionsEngineTrait for OptionsEngine<S> {
    /// Reads every option from the store.
    fn load(&mut self) -> Result<ExtensionOptions, OptionsError> {
        let mut map = serde_json::Map::new();
        for key in ExtensionOptions::KEYS {
            map.insert(key.to_string(), Value::Bool(self.read_flag(key)?));
        }
        self.options = serde_json::from_value(Value::Object(map))
            .map_err(|e| OptionsError::Get(e.to_string()))?;
        debug!(options = ?self.options, "loaded extension options");
        Ok(self.options.clone())
    }

    /// Writes every option to the store.
    fn save(&self) -> Result<(), OptionsError> {
        let map = Self::to_object(&self.options).map_err(OptionsError::Save)?;
        for (key, value) in map {
            self.store
                .set(&key, &value.to_string())
                .map_err(|e| OptionsError::Save(e.to_string()))?;
        }
        Ok(())
    }

    fn get_options(&self) -> &ExtensionOptions {
        &self.options
    }

    /// Updates a single option by its storage key and persists it.
    fn set_value(&mut self, key: &str, value: bool) -> Result<(), OptionsError> {
        let mut map = Self::to_object(&self.options).map_err(OptionsError::Save)?;
        if !map.contains_key(key) {
            return Err(OptionsError::InvalidKey(key.to_string()));
        }
        map.insert(key.to_string(), Value::Bool(value));
        self.options = serde_json::from_value(Value::Object(map))
            .map_err(|e| OptionsError::Save(e.to_string()))?;

        self.store
            .set(key, &value.to_string())
            .map_err(|e| OptionsError::Save(e.to_string()))?;
        Ok(())
    }

    /// Resets all options to defaults and saves them.
    fn reset(&mut self) -> Result<(), OptionsError> {
        self.options = ExtensionOptions::default();
        self.save()
    }
}
