//! In-memory settings registry
//!
//! Each [`MemorySettings`] holds two JSON maps: the schema defaults, which
//! never change, and user values, which [`Settings::set`] writes. The composite
//! value of a field is the user value if present, else the default.

use super::{SettingRegistry, Settings, SettingsChanged};
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Settings object backed by in-process JSON maps
pub struct MemorySettings {
    key: String,
    defaults: Map<String, Value>,
    user: Mutex<Map<String, Value>>,
    changed: broadcast::Sender<SettingsChanged>,
    read_only: AtomicBool,
}

impl MemorySettings {
    /// Create a settings object with the given schema defaults
    pub fn new(key: impl Into<String>, defaults: Map<String, Value>) -> Self {
        let (changed, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            key: key.into(),
            defaults,
            user: Mutex::new(Map::new()),
            changed,
            read_only: AtomicBool::new(false),
        }
    }

    /// Build from JSON text: a defaults object and an optional user object
    pub fn from_json(
        key: impl Into<String>,
        defaults: &str,
        user: Option<&str>,
    ) -> Result<Self, String> {
        let defaults = parse_object(defaults)
            .map_err(|e| format!("Failed to parse settings defaults: {}", e))?;
        let settings = Self::new(key, defaults);
        if let Some(user) = user {
            let user = parse_object(user)
                .map_err(|e| format!("Failed to parse user settings: {}", e))?;
            *settings.user_values() = user;
        }
        Ok(settings)
    }

    /// Reject (or accept again) all writes
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Write a user value without going through the async write path
    pub fn set_user_value(&self, field: &str, value: Value) {
        self.user_values().insert(field.to_string(), value);
        tracing::debug!("Settings {}: {} updated", self.key, field);
        let _ = self.changed.send(SettingsChanged {
            field: Some(field.to_string()),
        });
    }

    fn user_values(&self) -> std::sync::MutexGuard<'_, Map<String, Value>> {
        self.user
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn parse_object(json: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {}", other)),
        Err(e) => Err(e.to_string()),
    }
}

#[async_trait]
impl Settings for MemorySettings {
    fn key(&self) -> &str {
        &self.key
    }

    fn composite(&self, field: &str) -> Option<Value> {
        self.user_values()
            .get(field)
            .cloned()
            .or_else(|| self.defaults.get(field).cloned())
    }

    fn default_value(&self, field: &str) -> Option<Value> {
        self.defaults.get(field).cloned()
    }

    fn subscribe(&self) -> broadcast::Receiver<SettingsChanged> {
        self.changed.subscribe()
    }

    async fn set(&self, field: &str, value: Value) -> anyhow::Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(anyhow!("Settings {} are read-only", self.key));
        }
        self.set_user_value(field, value);
        Ok(())
    }
}

/// Registry of [`MemorySettings`] objects keyed by their settings key
#[derive(Default)]
pub struct MemorySettingRegistry {
    plugins: Mutex<HashMap<String, Arc<MemorySettings>>>,
}

impl MemorySettingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a settings object, replacing any previous one with the same key
    pub fn insert(&self, settings: MemorySettings) -> Arc<MemorySettings> {
        let settings = Arc::new(settings);
        self.plugins
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(settings.key.clone(), settings.clone());
        settings
    }
}

#[async_trait]
impl SettingRegistry for MemorySettingRegistry {
    async fn load(&self, key: &str) -> anyhow::Result<Arc<dyn Settings>> {
        let found = self
            .plugins
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned();
        match found {
            Some(settings) => Ok(settings as Arc<dyn Settings>),
            None => Err(anyhow!("No settings registered for {}", key)),
        }
    }
}
