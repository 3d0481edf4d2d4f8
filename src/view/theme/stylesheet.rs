//! Stylesheet loading for themes
//!
//! [`StylesheetLoader`] resolves stylesheet paths against the configured base
//! URL, attaches them to the [`StylesheetSurface`] and keeps the handles in
//! attach order so the manager can detach all of them on the next switch.

use super::error::ThemeError;
use crate::services::surface::{ResourceHandle, StylesheetSurface};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use url::Url;

/// Whether `path` is relative to the application (no scheme, not `//host/...`)
pub fn is_local(path: &str) -> bool {
    !path.starts_with("//")
        && matches!(Url::parse(path), Err(url::ParseError::RelativeUrlWithoutBase))
}

/// Resolve `path` against `base` if it is local, else return it unchanged.
pub fn resolve_href(base: &Url, path: &str) -> String {
    if !is_local(path) {
        return path.to_string();
    }
    base.join(path.trim_start_matches('/'))
        .map(|url| url.to_string())
        .unwrap_or_else(|_| path.to_string())
}

/// Parse a base URL, making sure it ends with a slash so joins append to it.
pub fn parse_base_url(base_url: &str) -> Result<Url, ThemeError> {
    let mut url = Url::parse(base_url).map_err(|e| ThemeError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ThemeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "URL cannot be a base".to_string(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

struct StylesheetSet {
    base: Url,
    surface: Arc<dyn StylesheetSurface>,
    links: Mutex<Vec<Box<dyn ResourceHandle>>>,
}

/// Cloneable handle for loading stylesheets into the active theme
#[derive(Clone)]
pub struct StylesheetLoader {
    inner: Arc<StylesheetSet>,
}

impl StylesheetLoader {
    pub fn new(base_url: &str, surface: Arc<dyn StylesheetSurface>) -> Result<Self, ThemeError> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            inner: Arc::new(StylesheetSet {
                base,
                surface,
                links: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    pub fn resolve(&self, path: &str) -> String {
        resolve_href(&self.inner.base, path)
    }

    /// Attach one stylesheet and wait for it to load.
    ///
    /// The handle is recorded before waiting, so a failed stylesheet is still
    /// detached on the next theme switch.
    pub async fn load(&self, path: &str) -> Result<(), ThemeError> {
        let href = self.resolve(path);
        let (on_settled, settled) = oneshot::channel();
        let handle = self.inner.surface.attach(&href, on_settled);
        self.links().push(handle);
        tracing::debug!("Attached stylesheet {}", href);

        match settled.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => {
                tracing::warn!("Stylesheet {} failed to load: {}", href, reason);
                Err(ThemeError::StylesheetLoad { href })
            }
            Err(_) => {
                tracing::warn!("Stylesheet {} was dropped before it settled", href);
                Err(ThemeError::StylesheetLoad { href })
            }
        }
    }

    /// Detach every attached stylesheet and clear the list.
    ///
    /// Returns the number of stylesheets detached.
    pub fn detach_all(&self) -> usize {
        let links: Vec<Box<dyn ResourceHandle>> = std::mem::take(&mut *self.links());
        for link in &links {
            link.detach();
        }
        links.len()
    }

    /// Hrefs of the attached stylesheets, in attach order
    pub fn attached(&self) -> Vec<String> {
        self.links()
            .iter()
            .map(|link| link.href().to_string())
            .collect()
    }

    fn links(&self) -> MutexGuard<'_, Vec<Box<dyn ResourceHandle>>> {
        self.inner
            .links
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
