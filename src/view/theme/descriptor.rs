//! Theme descriptors
//!
//! A descriptor is what callers register with the manager: a name, two flags
//! and a pair of async `load`/`unload` operations. [`StylesheetTheme`] covers
//! the common case of a theme that is nothing but a list of stylesheets.

use super::stylesheet::StylesheetLoader;
use async_trait::async_trait;

#[async_trait]
pub trait ThemeDescriptor: Send + Sync {
    /// Unique name the theme is registered and requested under
    fn name(&self) -> &str;

    fn is_light(&self) -> bool;

    /// Whether the theme styles scrollbars
    fn theme_scrollbars(&self) -> bool {
        false
    }

    /// Load the theme's resources
    async fn load(&self) -> anyhow::Result<()>;

    /// Undo whatever `load` did that the manager does not undo itself
    async fn unload(&self) -> anyhow::Result<()>;
}

/// A theme made of stylesheets loaded through the manager's
/// [`StylesheetLoader`].
///
/// `unload` has nothing to do: the manager detaches every stylesheet itself
/// before loading the next theme.
pub struct StylesheetTheme {
    name: String,
    is_light: bool,
    theme_scrollbars: bool,
    stylesheets: Vec<String>,
    loader: StylesheetLoader,
}

impl StylesheetTheme {
    pub fn new(name: impl Into<String>, is_light: bool, loader: StylesheetLoader) -> Self {
        Self {
            name: name.into(),
            is_light,
            theme_scrollbars: false,
            stylesheets: Vec::new(),
            loader,
        }
    }

    pub fn with_scrollbars(mut self, theme_scrollbars: bool) -> Self {
        self.theme_scrollbars = theme_scrollbars;
        self
    }

    /// Add a stylesheet path (local paths resolve against the base URL)
    pub fn with_stylesheet(mut self, path: impl Into<String>) -> Self {
        self.stylesheets.push(path.into());
        self
    }

    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }
}

#[async_trait]
impl ThemeDescriptor for StylesheetTheme {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_light(&self) -> bool {
        self.is_light
    }

    fn theme_scrollbars(&self) -> bool {
        self.theme_scrollbars
    }

    async fn load(&self) -> anyhow::Result<()> {
        for path in &self.stylesheets {
            self.loader.load(path).await?;
        }
        Ok(())
    }

    async fn unload(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
