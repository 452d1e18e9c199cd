//! Listener fixtures.

use crate::recorder::Recorder;

/// Listener with two handler methods and one plain method.
///
/// `OnTest` and `OnTe` are bound to `test` and `te`; `NoListener` is ignored
/// by subscriptions using the default prefix.
#[derive(Debug, Clone, Default)]
pub struct EventTest {
    /// Record of method calls.
    pub recorder: Recorder,
}

impl EventTest {
    /// Create a fixture with a fresh recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain method.
    pub fn no_listener(&self) {
        self.recorder.record("no_listener");
    }

    /// Handler for `test`.
    pub fn on_test(&self) {
        self.recorder.record("on_test");
    }

    /// Handler for `te`.
    pub fn on_te(&self) {
        self.recorder.record("on_te");
    }

    /// Handler for `greet`.
    pub fn on_greet(&self, name: String, times: u32) {
        self.recorder.record(format!("greet:{name}:{times}"));
    }
}

eventkit::listener!(EventTest {
    "NoListener" => no_listener(),
    "OnTest" => on_test(),
    "OnTe" => on_te(),
    "OnGreet" => on_greet(name: String, times: u32),
});
