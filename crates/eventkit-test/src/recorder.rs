//! Handlers that record their invocations.

use std::sync::{Arc, Mutex, PoisonError};

/// Shared, ordered record of handler invocations.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.into());
    }

    /// Recorded entries, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// A zero-argument handler recording `label` on every call.
    #[must_use]
    pub fn handler(&self, label: &str) -> impl Fn() + Send + Sync + 'static {
        let recorder = self.clone();
        let label = label.to_string();
        move || recorder.record(label.clone())
    }

    /// A one-argument handler recording each message it receives.
    #[must_use]
    pub fn message_handler(&self) -> impl Fn(String) + Send + Sync + 'static {
        let recorder = self.clone();
        move |message: String| recorder.record(message)
    }
}

/// Panic with `message`, as a failing handler would.
///
/// # Panics
///
/// Always.
pub fn raise(message: &str) {
    panic!("{message}")
}
