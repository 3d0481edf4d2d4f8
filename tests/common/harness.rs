//! Recording fakes for the theme manager's collaborators.
//!
//! Document, host, splash and test themes all append to one shared event log
//! so tests can assert on the order in which things happened.

#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use themekit::config::ThemeManagerConfig;
use themekit::primitives::Disposable;
use themekit::services::dialog::ErrorDialog;
use themekit::services::host::HostSurface;
use themekit::services::settings::{MemorySettingRegistry, MemorySettings};
use themekit::services::splash::SplashScreen;
use themekit::services::surface::{LoadOutcome, ResourceHandle, StylesheetSurface};
use themekit::view::theme::{StylesheetLoader, ThemeDescriptor, ThemeManager, ThemeManagerOptions};
use tokio::sync::{oneshot, Notify};

pub const BASE_URL: &str = "http://localhost/lab/static/";

/// Ordered log of everything the fakes observed
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }

    /// Index of the first event equal to `event`
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

struct RecordingLink {
    href: String,
    attached: AtomicBool,
    log: EventLog,
}

impl ResourceHandle for RecordingLink {
    fn href(&self) -> &str {
        &self.href
    }

    fn detach(&self) {
        if self.attached.swap(false, Ordering::SeqCst) {
            self.log.push(format!("detach {}", self.href));
        }
    }
}

/// Document that loads every stylesheet immediately unless told to fail it
pub struct RecordingDocument {
    log: EventLog,
    failing: Mutex<HashSet<String>>,
}

impl RecordingDocument {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            failing: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_href(&self, href: &str) {
        self.failing.lock().unwrap().insert(href.to_string());
    }
}

impl StylesheetSurface for RecordingDocument {
    fn attach(
        &self,
        href: &str,
        on_settled: oneshot::Sender<LoadOutcome>,
    ) -> Box<dyn ResourceHandle> {
        self.log.push(format!("attach {}", href));
        let outcome = if self.failing.lock().unwrap().contains(href) {
            Err(format!("{} not found", href))
        } else {
            Ok(())
        };
        let _ = on_settled.send(outcome);
        Box::new(RecordingLink {
            href: href.to_string(),
            attached: AtomicBool::new(true),
            log: self.log.clone(),
        })
    }
}

/// Host widget with named children
pub struct RecordingHost {
    name: String,
    log: EventLog,
    children: Vec<Arc<dyn HostSurface>>,
}

impl RecordingHost {
    pub fn new(name: &str, log: EventLog, children: Vec<Arc<dyn HostSurface>>) -> Self {
        Self {
            name: name.to_string(),
            log,
            children,
        }
    }
}

#[async_trait]
impl HostSurface for RecordingHost {
    fn hide(&self) {
        self.log.push(format!("hide {}", self.name));
    }

    fn show(&self) {
        self.log.push(format!("show {}", self.name));
    }

    fn fit(&self) {
        self.log.push(format!("fit {}", self.name));
    }

    fn children(&self) -> Vec<Arc<dyn HostSurface>> {
        self.children.clone()
    }

    async fn next_frame(&self) {
        self.log.push("frame");
        tokio::time::sleep(Duration::from_millis(16)).await;
    }
}

pub struct RecordingSplash {
    log: EventLog,
    pub shown: AtomicUsize,
    pub dismissed: Arc<AtomicUsize>,
}

impl SplashScreen for RecordingSplash {
    fn show(&self, light: bool) -> Disposable {
        self.shown.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("splash light={}", light));
        let log = self.log.clone();
        let dismissed = self.dismissed.clone();
        Disposable::new(move || {
            dismissed.fetch_add(1, Ordering::SeqCst);
            log.push("splash dismissed");
        })
    }
}

#[derive(Default)]
pub struct RecordingDialog {
    pub errors: Mutex<Vec<(String, String)>>,
}

impl RecordingDialog {
    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors.lock().unwrap().clone()
    }
}

impl ErrorDialog for RecordingDialog {
    fn show_error(&self, title: &str, body: &str) {
        self.errors
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

/// Descriptor with counters, an optional gate and optional failures
pub struct TestTheme {
    name: String,
    light: bool,
    scrollbars: bool,
    log: EventLog,
    gate: Option<Arc<Notify>>,
    fail_load: bool,
    fail_unload: bool,
    stylesheets: Vec<String>,
    loader: Option<StylesheetLoader>,
    pub loads: AtomicUsize,
    pub unloads: AtomicUsize,
}

impl TestTheme {
    pub fn new(name: &str, light: bool, log: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            light,
            scrollbars: false,
            log: log.clone(),
            gate: None,
            fail_load: false,
            fail_unload: false,
            stylesheets: Vec::new(),
            loader: None,
            loads: AtomicUsize::new(0),
            unloads: AtomicUsize::new(0),
        }
    }

    /// `load` waits until the gate is notified
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub fn failing_unload(mut self) -> Self {
        self.fail_unload = true;
        self
    }

    pub fn with_scrollbars(mut self) -> Self {
        self.scrollbars = true;
        self
    }

    pub fn with_stylesheets(mut self, loader: StylesheetLoader, paths: &[&str]) -> Self {
        self.loader = Some(loader);
        self.stylesheets = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn unloads(&self) -> usize {
        self.unloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ThemeDescriptor for TestTheme {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_light(&self) -> bool {
        self.light
    }

    fn theme_scrollbars(&self) -> bool {
        self.scrollbars
    }

    async fn load(&self) -> anyhow::Result<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("load {}", self.name));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_load {
            return Err(anyhow!("{} refused to load", self.name));
        }
        if let Some(loader) = &self.loader {
            for path in &self.stylesheets {
                loader.load(path).await?;
            }
        }
        Ok(())
    }

    async fn unload(&self) -> anyhow::Result<()> {
        self.unloads.fetch_add(1, Ordering::SeqCst);
        self.log.push(format!("unload {}", self.name));
        if self.fail_unload {
            return Err(anyhow!("{} refused to unload", self.name));
        }
        Ok(())
    }
}

/// A theme manager wired to recording fakes
pub struct Harness {
    pub manager: ThemeManager,
    pub settings: Arc<MemorySettings>,
    pub document: Arc<RecordingDocument>,
    pub splash: Arc<RecordingSplash>,
    pub dialog: Arc<RecordingDialog>,
    pub log: EventLog,
}

impl Harness {
    /// `defaults` is the JSON object of settings schema defaults
    pub fn new(defaults: &str) -> Self {
        Self::with_config(defaults, ThemeManagerConfig::with_base_url(BASE_URL))
    }

    pub fn with_config(defaults: &str, config: ThemeManagerConfig) -> Self {
        super::tracing::init_tracing_from_env();

        let log = EventLog::default();
        let registry = MemorySettingRegistry::new();
        let settings = registry.insert(
            MemorySettings::from_json(config.settings_key.clone(), defaults, None).unwrap(),
        );

        let document = Arc::new(RecordingDocument::new(log.clone()));
        let panel: Arc<dyn HostSurface> =
            Arc::new(RecordingHost::new("panel", log.clone(), Vec::new()));
        let host = Arc::new(RecordingHost::new("shell", log.clone(), vec![panel]));
        let splash = Arc::new(RecordingSplash {
            log: log.clone(),
            shown: AtomicUsize::new(0),
            dismissed: Arc::new(AtomicUsize::new(0)),
        });
        let dialog = Arc::new(RecordingDialog::default());

        let options = ThemeManagerOptions::new(Arc::new(registry), host, document.clone())
            .with_config(config)
            .with_splash(splash.clone())
            .with_dialog(dialog.clone());
        let manager = ThemeManager::new(options).unwrap();

        Self {
            manager,
            settings,
            document,
            splash,
            dialog,
            log,
        }
    }

    pub fn theme(&self, name: &str, light: bool) -> TestTheme {
        TestTheme::new(name, light, &self.log)
    }
}

/// Poll `condition` once per (virtual) millisecond for up to ten seconds
pub async fn eventually(condition: impl Fn() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not met within 10s");
}
