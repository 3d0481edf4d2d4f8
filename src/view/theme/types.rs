//! Pure theme types shared by the controller and its observers.

use serde::{Deserialize, Serialize};

/// Setting field name carried by every [`ThemeChanged`] event.
pub const THEME_CHANGED_FIELD: &str = "theme";

/// Notification emitted after a theme has been applied successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeChanged {
    /// Name of the setting that changed (always `"theme"`)
    pub name: String,
    /// Theme that was active before, `None` for the first application
    pub old_value: Option<String>,
    pub new_value: String,
}

impl ThemeChanged {
    pub fn new(old_value: Option<String>, new_value: impl Into<String>) -> Self {
        Self {
            name: THEME_CHANGED_FIELD.to_string(),
            old_value,
            new_value: new_value.into(),
        }
    }
}

/// Where the reconcile loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReconcileState {
    /// Nothing to do; the applied theme matches the last request
    #[default]
    Idle,
    /// A re-check is queued behind the apply that is still running
    WaitingOnOutstanding,
    /// The requested theme is not registered yet; a retry is scheduled
    WaitingForRegistration,
    /// An apply (unload + load) is in flight
    Applying,
    /// Requested and default theme are both missing; no retry scheduled
    GivenUp,
}

impl std::fmt::Display for ReconcileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReconcileState::Idle => "idle",
            ReconcileState::WaitingOnOutstanding => "waiting on outstanding apply",
            ReconcileState::WaitingForRegistration => "waiting for registration",
            ReconcileState::Applying => "applying",
            ReconcileState::GivenUp => "given up",
        };
        f.write_str(label)
    }
}
