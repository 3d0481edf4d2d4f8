//! Host surface the theme manager redraws after a theme switch.

use async_trait::async_trait;
use std::sync::Arc;

/// The application shell widget (or any tree of widgets) hosting the UI.
#[async_trait]
pub trait HostSurface: Send + Sync {
    fn hide(&self);

    fn show(&self);

    /// Refresh this surface's own layout
    fn fit(&self);

    /// Direct children, for recursive layout refresh
    fn children(&self) -> Vec<Arc<dyn HostSurface>> {
        Vec::new()
    }

    /// Wait until the next rendered frame.
    ///
    /// Hiding and showing within the same frame does not force a repaint, so
    /// the manager awaits this between the two.
    async fn next_frame(&self) {
        tokio::task::yield_now().await;
    }
}

/// Fit a surface and all of its descendants, children first.
pub fn fit_all(surface: &dyn HostSurface) {
    for child in surface.children() {
        fit_all(child.as_ref());
    }
    surface.fit();
}
