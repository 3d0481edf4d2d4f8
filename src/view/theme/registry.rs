//! Registry of theme descriptors, keyed by name.

use super::descriptor::ThemeDescriptor;
use super::error::ThemeError;
use crate::primitives::Disposable;
use std::collections::HashMap;
use std::sync::Arc;

/// Name → descriptor map with unique keys
#[derive(Default)]
pub struct ThemeRegistry {
    themes: HashMap<String, Arc<dyn ThemeDescriptor>>,
}

impl ThemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor. Fails if its name is taken; the existing entry is kept.
    pub fn register(&mut self, descriptor: Arc<dyn ThemeDescriptor>) -> Result<(), ThemeError> {
        let name = descriptor.name().to_string();
        if self.themes.contains_key(&name) {
            return Err(ThemeError::DuplicateTheme(name));
        }
        self.themes.insert(name, descriptor);
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn ThemeDescriptor>> {
        self.themes.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ThemeDescriptor>> {
        self.themes.get(name).cloned()
    }

    /// Look up a descriptor, failing with [`ThemeError::UnknownTheme`]
    pub fn require(&self, name: &str) -> Result<Arc<dyn ThemeDescriptor>, ThemeError> {
        self.get(name)
            .ok_or_else(|| ThemeError::UnknownTheme(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.themes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

/// Handle returned by [`ThemeManager::register`](super::ThemeManager::register).
///
/// Dropping it does nothing; call [`dispose`](Self::dispose) to remove the
/// theme from the registry.
#[derive(Debug)]
pub struct ThemeRegistration {
    name: String,
    disposable: Disposable,
}

impl ThemeRegistration {
    pub(crate) fn new(name: String, disposable: Disposable) -> Self {
        Self { name, disposable }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unregister the theme. Idempotent; an applied theme stays applied.
    pub fn dispose(&self) {
        self.disposable.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposable.is_disposed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Plain {
        name: &'static str,
        light: bool,
    }

    #[async_trait]
    impl ThemeDescriptor for Plain {
        fn name(&self) -> &str {
            self.name
        }
        fn is_light(&self) -> bool {
            self.light
        }
        async fn load(&self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn unload(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn plain(name: &'static str, light: bool) -> Arc<dyn ThemeDescriptor> {
        Arc::new(Plain { name, light })
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = ThemeRegistry::new();
        registry.register(plain("light", true)).unwrap();

        let err = registry.register(plain("light", false)).unwrap_err();
        assert!(matches!(err, ThemeError::DuplicateTheme(ref name) if name == "light"));
        assert!(registry.get("light").unwrap().is_light());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_are_sorted() {
        let mut registry = ThemeRegistry::new();
        registry.register(plain("solarized", true)).unwrap();
        registry.register(plain("dark", false)).unwrap();
        registry.register(plain("light", true)).unwrap();

        assert_eq!(registry.names(), vec!["dark", "light", "solarized"]);
    }

    #[test]
    fn test_require_unknown_theme() {
        let registry = ThemeRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.require("dark"),
            Err(ThemeError::UnknownTheme(ref name)) if name == "dark"
        ));
    }

    #[test]
    fn test_unregister_then_register_again() {
        let mut registry = ThemeRegistry::new();
        registry.register(plain("dark", false)).unwrap();
        assert!(registry.unregister("dark").is_some());
        assert!(registry.unregister("dark").is_none());
        assert!(!registry.contains("dark"));

        registry.register(plain("dark", false)).unwrap();
        assert!(registry.contains("dark"));
    }
}
