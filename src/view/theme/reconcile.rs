//! Reconcile loop
//!
//! A single task owns the state machine that moves the applied theme toward
//! the one named in settings. It wakes up on settings changes, on retry
//! deadlines, when an apply task settles, and on explicit requests from the
//! handle. Every wake-up funnels into [`Reconciler::reconcile`].
//!
//! Invariants:
//! - at most one retry deadline is pending; every reconcile clears it first
//! - at most one apply is outstanding; requests arriving meanwhile collapse
//!   into a single re-check that reads the latest desired value
//! - only the currently desired name has an attempt counter, so a name that
//!   is requested again later starts with a fresh retry budget

use super::apply::apply_theme;
use super::descriptor::ThemeDescriptor;
use super::error::ThemeError;
use super::manager::{SettingsSlot, Shared};
use super::types::ReconcileState;
use crate::services::settings::{composite_str, default_str, SettingRegistry, Settings};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// Requests from the handle to the loop
#[derive(Debug)]
pub(crate) enum ControlMessage {
    Reconcile,
}

struct Reconciler {
    shared: Arc<Shared>,
    settings: Arc<dyn Settings>,
    /// Lookups of the desired theme while it is not registered
    requests: HashMap<String, u32>,
    retry_at: Option<Instant>,
    outstanding: bool,
    recheck: bool,
    settled_tx: mpsc::UnboundedSender<()>,
}

impl Reconciler {
    fn reconcile(&mut self) {
        self.retry_at = None;

        // An apply cannot be aborted, so newer requests wait for it.
        if self.outstanding {
            self.recheck = true;
            self.shared.set_state(ReconcileState::WaitingOnOutstanding);
            return;
        }

        let field = self.shared.config.theme_field.clone();
        let Some(theme) = composite_str(self.settings.as_ref(), &field) else {
            tracing::warn!("Settings field {} is not set, using the default theme", field);
            self.requests.clear();
            self.fall_back(None);
            return;
        };

        self.requests.retain(|name, _| *name == theme);
        let attempts = {
            let count = self.requests.entry(theme.clone()).or_insert(0);
            *count += 1;
            *count
        };

        if let Some(descriptor) = self.shared.lookup(&theme) {
            self.requests.remove(&theme);
            self.start_apply(descriptor);
            return;
        }

        if attempts > self.shared.config.request_threshold {
            self.requests.remove(&theme);
            self.fall_back(Some(&theme));
            return;
        }

        let interval = self.shared.config.request_interval();
        tracing::debug!(
            "Theme {} is not registered yet (attempt {}), retrying in {:?}",
            theme,
            attempts,
            interval
        );
        self.retry_at = Some(Instant::now() + interval);
        self.shared.set_state(ReconcileState::WaitingForRegistration);
    }

    /// Apply the settings default instead of `requested`
    fn fall_back(&mut self, requested: Option<&str>) {
        let field = &self.shared.config.theme_field;
        let fallback = default_str(self.settings.as_ref(), field);
        let descriptor = fallback.as_deref().and_then(|name| self.shared.lookup(name));

        match (descriptor, fallback) {
            (Some(descriptor), Some(fallback)) => {
                tracing::warn!(
                    "Could not load theme {}, using default {}.",
                    requested.unwrap_or("<unset>"),
                    fallback
                );
                self.start_apply(descriptor);
            }
            (_, fallback) => {
                let error = ThemeError::Configuration {
                    requested: requested.unwrap_or("<unset>").to_string(),
                    fallback: fallback.unwrap_or_else(|| "<unset>".to_string()),
                };
                self.shared.report(&error);
                self.shared.set_state(ReconcileState::GivenUp);
            }
        }
    }

    fn start_apply(&mut self, descriptor: Arc<dyn ThemeDescriptor>) {
        self.outstanding = true;
        self.shared.set_state(ReconcileState::Applying);

        let shared = self.shared.clone();
        let settled = self.settled_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = apply_theme(&shared, descriptor).await {
                tracing::debug!("Theme application failed: {}", e);
            }
            let _ = settled.send(());
        });
    }

    /// The outstanding apply finished, successfully or not
    fn settled(&mut self) {
        self.outstanding = false;
        if std::mem::take(&mut self.recheck) {
            self.reconcile();
        } else {
            self.shared.set_state(ReconcileState::Idle);
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Load the settings object, then run the loop until every handle is gone.
pub(crate) async fn run(
    shared: Arc<Shared>,
    registry: Arc<dyn SettingRegistry>,
    mut control: mpsc::UnboundedReceiver<ControlMessage>,
) {
    let key = shared.config.settings_key.clone();
    let settings = match registry.load(&key).await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load theme settings {}: {:#}", key, e);
            shared
                .settings
                .send_replace(SettingsSlot::Failed(format!("{:#}", e)));
            return;
        }
    };

    // Subscribe before publishing the settings so no write is missed.
    let mut changes = settings.subscribe();
    shared
        .settings
        .send_replace(SettingsSlot::Ready(settings.clone()));
    tracing::info!("Theme settings {} loaded", key);

    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel();
    let mut reconciler = Reconciler {
        shared,
        settings,
        requests: HashMap::new(),
        retry_at: None,
        outstanding: false,
        recheck: false,
        settled_tx,
    };
    reconciler.reconcile();

    let mut changes_open = true;
    loop {
        let retry_at = reconciler.retry_at;
        tokio::select! {
            // Drain pending notifications before handling a settled apply, so
            // a burst of changes becomes one re-check.
            biased;

            message = control.recv() => match message {
                Some(ControlMessage::Reconcile) => reconciler.reconcile(),
                None => break,
            },
            change = changes.recv(), if changes_open => match change {
                Ok(_) => reconciler.reconcile(),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Skipped {} settings notifications", skipped);
                    reconciler.reconcile();
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Settings change stream closed");
                    changes_open = false;
                }
            },
            Some(()) = settled_rx.recv() => reconciler.settled(),
            _ = sleep_until_deadline(retry_at) => reconciler.reconcile(),
        }
    }

    tracing::debug!("Theme manager reconcile loop stopped");
}
