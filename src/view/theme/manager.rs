//! Theme manager
//!
//! [`ThemeManager`] is a cheap, cloneable handle. Construction spawns the
//! reconcile loop (see `reconcile.rs`), which loads the settings object,
//! watches the theme field and drives theme application. The handle itself
//! only touches state shared with the loop: the registry, the active theme and
//! the attached stylesheets.

use super::descriptor::ThemeDescriptor;
use super::error::{ThemeError, THEME_ERROR_TITLE};
use super::reconcile::{self, ControlMessage};
use super::registry::{ThemeRegistration, ThemeRegistry};
use super::stylesheet::StylesheetLoader;
use super::types::{ReconcileState, ThemeChanged};
use crate::config::ThemeManagerConfig;
use crate::primitives::Disposable;
use crate::services::dialog::{ErrorDialog, LogErrorDialog};
use crate::services::host::HostSurface;
use crate::services::settings::{is_truthy, SettingRegistry, Settings};
use crate::services::splash::SplashScreen;
use crate::services::surface::StylesheetSurface;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, mpsc, watch};

const THEME_CHANGED_CAPACITY: usize = 16;

/// Everything the manager needs from the host application
pub struct ThemeManagerOptions {
    pub config: ThemeManagerConfig,
    pub settings: Arc<dyn SettingRegistry>,
    pub host: Arc<dyn HostSurface>,
    pub surface: Arc<dyn StylesheetSurface>,
    pub splash: Option<Arc<dyn SplashScreen>>,
    /// Defaults to [`LogErrorDialog`]
    pub dialog: Option<Arc<dyn ErrorDialog>>,
}

impl ThemeManagerOptions {
    pub fn new(
        settings: Arc<dyn SettingRegistry>,
        host: Arc<dyn HostSurface>,
        surface: Arc<dyn StylesheetSurface>,
    ) -> Self {
        Self {
            config: ThemeManagerConfig::default(),
            settings,
            host,
            surface,
            splash: None,
            dialog: None,
        }
    }

    pub fn with_config(mut self, config: ThemeManagerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_splash(mut self, splash: Arc<dyn SplashScreen>) -> Self {
        self.splash = Some(splash);
        self
    }

    pub fn with_dialog(mut self, dialog: Arc<dyn ErrorDialog>) -> Self {
        self.dialog = Some(dialog);
        self
    }
}

/// Settings object as seen by the handle while the loop is starting up
#[derive(Clone)]
pub(crate) enum SettingsSlot {
    Pending,
    Ready(Arc<dyn Settings>),
    Failed(String),
}

/// State shared between the handle, the reconcile loop and apply tasks
pub(crate) struct Shared {
    pub config: ThemeManagerConfig,
    pub registry: Mutex<ThemeRegistry>,
    /// Descriptor of the applied theme. Kept here so the theme can still be
    /// unloaded after it has been unregistered.
    pub active: Mutex<Option<Arc<dyn ThemeDescriptor>>>,
    pub stylesheets: StylesheetLoader,
    pub host: Arc<dyn HostSurface>,
    pub splash: Option<Arc<dyn SplashScreen>>,
    pub dialog: Arc<dyn ErrorDialog>,
    pub changed: broadcast::Sender<ThemeChanged>,
    pub settings: watch::Sender<SettingsSlot>,
    pub state: watch::Sender<ReconcileState>,
}

impl Shared {
    pub fn registry(&self) -> MutexGuard<'_, ThemeRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn ThemeDescriptor>> {
        self.registry().get(name)
    }

    pub fn active(&self) -> Option<Arc<dyn ThemeDescriptor>> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_active(&self, descriptor: Arc<dyn ThemeDescriptor>) {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = Some(descriptor);
    }

    pub fn set_state(&self, next: ReconcileState) {
        self.state.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            tracing::trace!("Theme manager: {} -> {}", state, next);
            *state = next;
            true
        });
    }

    /// Show a user-visible failure
    pub fn report(&self, error: &ThemeError) {
        tracing::warn!("{}", error);
        self.dialog.show_error(THEME_ERROR_TITLE, &error.to_string());
    }

    fn loaded_settings(&self) -> Option<Arc<dyn Settings>> {
        match &*self.settings.borrow() {
            SettingsSlot::Ready(settings) => Some(settings.clone()),
            _ => None,
        }
    }
}

/// Handle to the theme manager
#[derive(Clone)]
pub struct ThemeManager {
    shared: Arc<Shared>,
    control: mpsc::UnboundedSender<ControlMessage>,
}

impl ThemeManager {
    /// Create the manager and start loading its settings.
    ///
    /// Fails with [`ThemeError::NoRuntime`] outside a tokio runtime.
    pub fn new(options: ThemeManagerOptions) -> Result<Self, ThemeError> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| ThemeError::NoRuntime)?;
        let ThemeManagerOptions {
            config,
            settings,
            host,
            surface,
            splash,
            dialog,
        } = options;

        let stylesheets = StylesheetLoader::new(&config.base_url, surface)?;
        let (changed, _) = broadcast::channel(THEME_CHANGED_CAPACITY);
        let (settings_slot, _) = watch::channel(SettingsSlot::Pending);
        let (state, _) = watch::channel(ReconcileState::Idle);

        let shared = Arc::new(Shared {
            config,
            registry: Mutex::new(ThemeRegistry::new()),
            active: Mutex::new(None),
            stylesheets,
            host,
            splash,
            dialog: dialog.unwrap_or_else(|| Arc::new(LogErrorDialog)),
            changed,
            settings: settings_slot,
            state,
        });

        let (control, control_rx) = mpsc::unbounded_channel();
        runtime.spawn(reconcile::run(shared.clone(), settings, control_rx));

        Ok(Self { shared, control })
    }

    /// Name of the applied theme
    pub fn theme(&self) -> Option<String> {
        self.shared.active().map(|theme| theme.name().to_string())
    }

    /// Names of the registered themes, sorted
    pub fn themes(&self) -> Vec<String> {
        self.shared.registry().names()
    }

    /// Receive a [`ThemeChanged`] after every successful application
    pub fn subscribe(&self) -> broadcast::Receiver<ThemeChanged> {
        self.shared.changed.subscribe()
    }

    /// Observe the reconcile loop's state
    pub fn state(&self) -> watch::Receiver<ReconcileState> {
        self.shared.state.subscribe()
    }

    /// Loader that theme descriptors use to attach their stylesheets
    pub fn stylesheets(&self) -> StylesheetLoader {
        self.shared.stylesheets.clone()
    }

    pub fn config(&self) -> &ThemeManagerConfig {
        &self.shared.config
    }

    /// Register a theme.
    ///
    /// Registration alone never applies anything; a theme the settings are
    /// waiting for is picked up by the next retry.
    pub fn register(
        &self,
        descriptor: Arc<dyn ThemeDescriptor>,
    ) -> Result<ThemeRegistration, ThemeError> {
        let name = descriptor.name().to_string();
        self.shared.registry().register(descriptor)?;
        tracing::debug!("Registered theme {}", name);

        let shared = Arc::downgrade(&self.shared);
        let unregister_name = name.clone();
        let disposable = Disposable::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.registry().unregister(&unregister_name);
                tracing::debug!("Unregistered theme {}", unregister_name);
            }
        });
        Ok(ThemeRegistration::new(name, disposable))
    }

    /// Ask the settings service to persist `name` as the desired theme.
    ///
    /// The theme is applied later, when the settings change notification
    /// reaches the reconcile loop.
    pub async fn set_theme(&self, name: &str) -> Result<(), ThemeError> {
        let settings = self.settings().await?;
        settings
            .set(&self.shared.config.theme_field, serde_json::Value::from(name))
            .await
            .map_err(ThemeError::Settings)
    }

    /// Load a stylesheet into the active theme's stylesheet set
    pub async fn load_stylesheet(&self, path: &str) -> Result<(), ThemeError> {
        self.shared.stylesheets.load(path).await
    }

    pub fn is_light(&self, name: &str) -> Result<bool, ThemeError> {
        Ok(self.shared.registry().require(name)?.is_light())
    }

    /// Whether `name` styles scrollbars and the user has scrollbar theming on
    pub fn theme_scrollbars(&self, name: &str) -> Result<bool, ThemeError> {
        let descriptor = self.shared.registry().require(name)?;
        let enabled = self
            .shared
            .loaded_settings()
            .map(|settings| {
                let field = &self.shared.config.scrollbars_field;
                is_truthy(settings.composite(field).as_ref())
            })
            .unwrap_or(false);
        Ok(enabled && descriptor.theme_scrollbars())
    }

    /// Re-check the desired theme now, cancelling any pending retry
    pub fn reconcile(&self) -> Result<(), ThemeError> {
        self.control
            .send(ControlMessage::Reconcile)
            .map_err(|_| ThemeError::Shutdown)
    }

    /// Wait for the settings object to be loaded
    pub async fn settings(&self) -> Result<Arc<dyn Settings>, ThemeError> {
        let mut slot = self.shared.settings.subscribe();
        let loaded = slot
            .wait_for(|slot| !matches!(slot, SettingsSlot::Pending))
            .await
            .map_err(|_| ThemeError::Shutdown)?
            .clone();
        match loaded {
            SettingsSlot::Ready(settings) => Ok(settings),
            SettingsSlot::Failed(reason) => Err(ThemeError::Settings(anyhow::anyhow!(reason))),
            SettingsSlot::Pending => Err(ThemeError::Shutdown),
        }
    }
}
