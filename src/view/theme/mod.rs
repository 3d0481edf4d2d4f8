//! Theme module
//!
//! This module is organized into two parts:
//!
//! - Pure types, always available: [`ThemeChanged`], [`ReconcileState`],
//!   [`ThemeError`].
//! - The controller, runtime-only:
//!   - `descriptor` - [`ThemeDescriptor`] trait and [`StylesheetTheme`]
//!   - `registry` - [`ThemeRegistry`] and [`ThemeRegistration`]
//!   - `stylesheet` - [`StylesheetLoader`] and href resolution
//!   - `manager` - [`ThemeManager`] handle and its options
//!   - `reconcile` / `apply` - the loop that applies the desired theme
//!
//! # Usage
//!
//! ```ignore
//! use themekit::view::theme::{StylesheetTheme, ThemeManager, ThemeManagerOptions};
//!
//! let manager = ThemeManager::new(ThemeManagerOptions::new(settings, host, document))?;
//! let dark = StylesheetTheme::new("dark", false, manager.stylesheets())
//!     .with_stylesheet("themes/dark/index.css");
//! let registration = manager.register(Arc::new(dark))?;
//!
//! manager.set_theme("dark").await?;
//! ```

mod error;
mod types;

#[cfg(feature = "runtime")]
mod apply;
#[cfg(feature = "runtime")]
mod descriptor;
#[cfg(feature = "runtime")]
mod manager;
#[cfg(feature = "runtime")]
mod reconcile;
#[cfg(feature = "runtime")]
mod registry;
#[cfg(feature = "runtime")]
mod stylesheet;

pub use error::{ThemeError, THEME_ERROR_TITLE};
pub use types::{ReconcileState, ThemeChanged, THEME_CHANGED_FIELD};

#[cfg(feature = "runtime")]
pub use descriptor::{StylesheetTheme, ThemeDescriptor};
#[cfg(feature = "runtime")]
pub use manager::{ThemeManager, ThemeManagerOptions};
#[cfg(feature = "runtime")]
pub use registry::{ThemeRegistration, ThemeRegistry};
#[cfg(feature = "runtime")]
pub use stylesheet::{is_local, parse_base_url, resolve_href, StylesheetLoader};
