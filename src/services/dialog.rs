//! Where user-visible theme failures are reported.

/// Modal error dialog supplied by the host application
pub trait ErrorDialog: Send + Sync {
    fn show_error(&self, title: &str, body: &str);
}

/// Dialog used when the host application does not provide one: logs the
/// failure instead of showing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorDialog;

impl ErrorDialog for LogErrorDialog {
    fn show_error(&self, title: &str, body: &str) {
        tracing::error!("{}: {}", title, body);
    }
}
