//! Errors raised by theme registration, lookup and application.

use thiserror::Error;

/// Title used for every user-visible theme failure.
pub const THEME_ERROR_TITLE: &str = "Error Loading Theme";

#[derive(Debug, Error)]
pub enum ThemeError {
    /// A theme with this name is already registered
    #[error("Theme already registered for {0}")]
    DuplicateTheme(String),

    /// Lookup of a theme that was never registered (or was unregistered)
    #[error("Theme {0} is not registered")]
    UnknownTheme(String),

    /// A stylesheet resource reported a load failure
    #[error("Stylesheet failed to load: {href}")]
    StylesheetLoad { href: String },

    /// Neither the requested theme nor the settings default is registered
    #[error("Neither theme {requested} nor default {fallback} loaded.")]
    Configuration { requested: String, fallback: String },

    /// Unloading the previous theme or loading the next one failed
    #[error("Failed to apply theme {theme}: {source}")]
    Apply {
        theme: String,
        #[source]
        source: anyhow::Error,
    },

    /// The settings service rejected a read or write
    #[error("Settings error: {0}")]
    Settings(#[source] anyhow::Error),

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The manager was created outside a tokio runtime
    #[error("Theme manager must be created inside a tokio runtime")]
    NoRuntime,

    /// The reconcile loop has stopped
    #[error("Theme manager has shut down")]
    Shutdown,
}
