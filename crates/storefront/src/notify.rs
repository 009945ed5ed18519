//! User-facing notices.
//!
//! A [`Notifier`] shows a short error message to whoever is driving the cart.
//! Delivery is fire-and-forget: there is no acknowledgement and no way for a
//! notifier to fail the operation that raised the notice.

use std::sync::Mutex;

/// Presents user-visible error messages.
pub trait Notifier: Send + Sync {
    /// Show an error message.
    fn error(&self, message: &str);
}

/// Emits notices as `warn` events on the `rocketshoes::notice` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "rocketshoes::notice", "{message}");
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
