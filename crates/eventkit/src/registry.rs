//! Callback registry keyed by event identifier.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace};

use crate::callback::Callback;

/// Ordered callback lists keyed by resolved event identifier.
///
/// Registration takes the write lock; lookups take the read lock and return
/// a snapshot, so callbacks always run with no lock held.
#[derive(Default)]
pub struct Registry {
    callbacks: RwLock<HashMap<String, Vec<Arc<Callback>>>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("event_count", &self.len())
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    // A panicking handler never runs under the lock, so a poisoned map is
    // still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<Arc<Callback>>>> {
        self.callbacks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<Arc<Callback>>>> {
        self.callbacks.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `callback` to the list under `identifier`.
    pub fn register(&self, identifier: impl Into<String>, callback: Arc<Callback>) {
        let identifier = identifier.into();
        let mut callbacks = self.write();
        let list = callbacks.entry(identifier.clone()).or_default();
        list.push(callback);

        debug!(
            identifier = %identifier,
            position = list.len(),
            "Callback registered"
        );
    }

    /// Snapshot of the callbacks under `identifier`, in registration order.
    ///
    /// Returns `None` if nothing was ever registered under it.
    #[must_use]
    pub fn lookup(&self, identifier: &str) -> Option<Vec<Arc<Callback>>> {
        let callbacks = self.read();
        let list = callbacks.get(identifier).cloned();
        trace!(
            identifier = %identifier,
            found = list.is_some(),
            "Callback lookup"
        );
        list
    }

    /// Number of callbacks under `identifier`, enabled or not.
    #[must_use]
    pub fn count(&self, identifier: &str) -> usize {
        self.read().get(identifier).map_or(0, Vec::len)
    }

    /// Number of distinct identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Total number of callbacks across all identifiers.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.read().keys().cloned().collect();
        identifiers.sort();
        identifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocable::into_boxed;
    use std::thread;

    fn callback(name: &str) -> Arc<Callback> {
        Arc::new(Callback::new(name, "test", into_boxed(|| {})))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        registry.register("OnTest", callback("first"));
        registry.register("OnTest", callback("second"));

        let list = registry.lookup("OnTest").unwrap();
        let names: Vec<&str> = list.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.count("OnTest"), 2);
        assert_eq!(registry.callback_count(), 2);
    }

    #[test]
    fn test_lookup_missing() {
        let registry = Registry::new();
        assert!(registry.lookup("OnMissing").is_none());
        assert_eq!(registry.count("OnMissing"), 0);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let registry = Registry::new();
        registry.register("OnTest", callback("a"));
        assert!(registry.lookup("ontest").is_none());
        assert!(registry.lookup("OnTest").is_some());
    }

    #[test]
    fn test_no_dedup() {
        let registry = Registry::new();
        let shared = callback("same");
        registry.register("OnTest", Arc::clone(&shared));
        registry.register("OnTest", shared);
        assert_eq!(registry.count("OnTest"), 2);
    }

    #[test]
    fn test_lookup_is_snapshot() {
        let registry = Registry::new();
        registry.register("OnTest", callback("first"));

        let snapshot = registry.lookup("OnTest").unwrap();
        registry.register("OnTest", callback("second"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.count("OnTest"), 2);
    }

    #[test]
    fn test_identifiers_sorted() {
        let registry = Registry::new();
        registry.register("OnB", callback("b"));
        registry.register("OnA", callback("a"));
        assert_eq!(registry.identifiers(), vec!["OnA", "OnB"]);
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(Registry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..50 {
                        registry.register(format!("On{}", i % 2), callback("c"));
                        let _ = registry.lookup("On0");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.callback_count(), 400);
        assert_eq!(registry.len(), 2);
    }
}
