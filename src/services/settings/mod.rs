//! Settings service abstraction
//!
//! The theme manager never owns settings storage. It loads a [`Settings`]
//! object for its key from a [`SettingRegistry`], reads the composite value of
//! the theme field, listens for change notifications and writes new values
//! back through [`Settings::set`].
//!
//! [`MemorySettingRegistry`] is an in-process implementation: schema defaults
//! layered under user values, both plain JSON.

mod memory;

pub use memory::{MemorySettingRegistry, MemorySettings};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Notification that a settings object changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChanged {
    /// Field that was written, `None` if the whole object was reloaded
    pub field: Option<String>,
}

/// Source of settings objects, keyed by plugin/schema id
#[async_trait]
pub trait SettingRegistry: Send + Sync {
    /// Load the settings object for `key`
    async fn load(&self, key: &str) -> anyhow::Result<Arc<dyn Settings>>;
}

/// One loaded settings object
#[async_trait]
pub trait Settings: Send + Sync {
    /// Key this object was loaded for
    fn key(&self) -> &str;

    /// Effective value of `field` (user value if set, else schema default)
    fn composite(&self, field: &str) -> Option<Value>;

    /// Schema default of `field`
    fn default_value(&self, field: &str) -> Option<Value>;

    /// Subscribe to change notifications
    fn subscribe(&self) -> broadcast::Receiver<SettingsChanged>;

    /// Persist a user value for `field`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the write.
    async fn set(&self, field: &str, value: Value) -> anyhow::Result<()>;
}

/// Read a string-valued field, ignoring values of other types
pub fn composite_str(settings: &dyn Settings, field: &str) -> Option<String> {
    settings
        .composite(field)
        .and_then(|value| value.as_str().map(str::to_string))
}

/// Read the schema default of a string-valued field
pub fn default_str(settings: &dyn Settings, field: &str) -> Option<String> {
    settings
        .default_value(field)
        .and_then(|value| value.as_str().map(str::to_string))
}

/// JavaScript-style truthiness of a settings value
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&Value::Null)));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("yes"))));
        assert!(is_truthy(Some(&json!({}))));
    }
}
