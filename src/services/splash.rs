//! Splash screen shown while a theme is being swapped.

use crate::primitives::Disposable;

pub trait SplashScreen: Send + Sync {
    /// Show the splash, styled for a light or dark target theme.
    ///
    /// Disposing the returned handle dismisses it.
    fn show(&self, light: bool) -> Disposable;
}
