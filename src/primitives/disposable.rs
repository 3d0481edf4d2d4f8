//! One-shot disposal callbacks.
//!
//! Registrations and splash screens hand back a [`Disposable`]. Calling
//! [`Disposable::dispose`] runs the stored callback exactly once; further calls
//! are no-ops.

use std::fmt;
use std::sync::Mutex;

type Callback = Box<dyn FnOnce() + Send>;

/// A callback that runs at most once, when disposed.
pub struct Disposable {
    callback: Mutex<Option<Callback>>,
}

impl Disposable {
    /// Wrap a callback to run on disposal
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callback: Mutex::new(Some(Box::new(callback))),
        }
    }

    /// A disposable that does nothing
    pub fn noop() -> Self {
        Self {
            callback: Mutex::new(None),
        }
    }

    /// Run the callback if it has not run yet
    pub fn dispose(&self) {
        let callback = match self.callback.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn is_disposed(&self) -> bool {
        match self.callback.lock() {
            Ok(slot) => slot.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

impl fmt::Debug for Disposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
