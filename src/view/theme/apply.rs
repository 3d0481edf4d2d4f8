//! Applying a theme: swap stylesheets, unload the old theme, load the new one,
//! then force the host to redraw.

use super::descriptor::ThemeDescriptor;
use super::error::ThemeError;
use super::manager::Shared;
use super::types::ThemeChanged;
use crate::primitives::Disposable;
use crate::services::host::fit_all;
use std::sync::Arc;

/// Switch from the active theme to `next`.
///
/// Failures are reported through the dialog and leave the active theme as it
/// was. Stylesheets detached before the failure are not re-attached.
pub(crate) async fn apply_theme(
    shared: &Shared,
    next: Arc<dyn ThemeDescriptor>,
) -> Result<(), ThemeError> {
    let name = next.name().to_string();
    tracing::info!("Applying theme {}", name);

    let splash = match &shared.splash {
        Some(splash) => splash.show(next.is_light()),
        None => Disposable::noop(),
    };

    let detached = shared.stylesheets.detach_all();
    tracing::debug!("Detached {} stylesheets", detached);

    let previous = shared.active();
    let unload = async {
        match &previous {
            Some(previous) => previous.unload().await,
            None => Ok(()),
        }
    };
    let (unloaded, loaded) = tokio::join!(unload, next.load());

    if let Err(source) = unloaded.and(loaded) {
        let error = ThemeError::Apply {
            theme: name,
            source,
        };
        shared.report(&error);
        splash.dispose();
        return Err(error);
    }

    let old = previous.map(|previous| previous.name().to_string());
    shared.set_active(next);
    let _ = shared.changed.send(ThemeChanged::new(old, name.clone()));

    // Hiding and showing within one frame leaves scroll regions stale.
    shared.host.hide();
    shared.host.next_frame().await;
    shared.host.show();
    fit_all(shared.host.as_ref());
    splash.dispose();

    tracing::info!("Theme {} applied", name);
    Ok(())
}
