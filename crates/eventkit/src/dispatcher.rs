//! The dispatcher: subscriptions and synchronous triggers.

use std::any::Any;
use std::panic::Location;
use std::sync::Arc;

use eventkit_telemetry::BuildInfo;
use tracing::{debug, info, warn};

use crate::arguments::Args;
use crate::callback::Callback;
use crate::config::{ConfigResult, DisabledPolicy, DispatcherConfig};
use crate::error::{DispatchError, DispatchResult, EventCallbacksError};
use crate::invocable::{BoxedInvocable, IntoInvocable};
use crate::listeners::{Listener, ListenerObject};
use crate::registry::Registry;
use crate::resolver::NameResolver;

/// In-process publish/subscribe dispatcher.
///
/// Handlers run synchronously on the thread calling [`Dispatcher::trigger`],
/// in registration order. Clones share the same registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: Arc<DispatcherConfig>,
    resolver: NameResolver,
    registry: Arc<Registry>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create a dispatcher with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(DispatcherConfig::default())
    }

    /// Create a dispatcher with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::ConfigError) if the configuration
    /// fails validation.
    pub fn with_config(config: DispatcherConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: DispatcherConfig) -> Self {
        Self {
            resolver: NameResolver::new(config.delimiter.clone()),
            config: Arc::new(config),
            registry: Arc::new(Registry::new()),
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The name resolver.
    #[must_use]
    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// The callback registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Subscribe a single handler to the event `name`.
    ///
    /// `name` may be dotted (`on.user.created`) or an identifier
    /// (`OnUserCreated`); both register under the same identifier.
    ///
    /// # Errors
    ///
    /// Never fails for typed handlers; the `Result` matches
    /// [`Dispatcher::subscribe_function_boxed`].
    #[track_caller]
    pub fn subscribe_function<M>(
        &self,
        name: &str,
        handler: impl IntoInvocable<M>,
    ) -> DispatchResult<()> {
        self.bind(name, handler.into_invocable(), Location::caller());
        Ok(())
    }

    /// Subscribe a type-erased handler to the event `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidCallback`] unless `handler` holds a
    /// [`BoxedInvocable`].
    #[track_caller]
    pub fn subscribe_function_boxed(
        &self,
        name: &str,
        handler: Box<dyn Any + Send + Sync>,
    ) -> DispatchResult<()> {
        let location = Location::caller();
        let invocable = handler
            .downcast::<BoxedInvocable>()
            .map_err(|_| DispatchError::InvalidCallback)?;
        self.bind(name, *invocable, location);
        Ok(())
    }

    /// Subscribe every prefixed method of `listener`.
    ///
    /// Returns how many handlers were bound. Methods without the prefix are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Never fails for typed listeners; the `Result` matches
    /// [`Dispatcher::subscribe_boxed`].
    #[track_caller]
    pub fn subscribe<L: Listener>(&self, listener: Arc<L>) -> DispatchResult<usize> {
        Ok(self.bind_listener(&ListenerObject::new(listener), Location::caller()))
    }

    /// Subscribe a type-erased listener.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidPayload`] unless `payload` holds a
    /// [`ListenerObject`].
    #[track_caller]
    pub fn subscribe_boxed(&self, payload: Box<dyn Any + Send + Sync>) -> DispatchResult<usize> {
        let location = Location::caller();
        let object = payload
            .downcast::<ListenerObject>()
            .map_err(|_| DispatchError::InvalidPayload)?;
        Ok(self.bind_listener(&object, location))
    }

    fn bind_listener(&self, object: &ListenerObject, location: &Location<'static>) -> usize {
        let handlers = object.methods().handlers(&self.config.prefix);
        let count = handlers.len();
        for (name, invocable) in handlers {
            self.bind(&name, invocable, location);
        }
        debug!(
            listener_type = object.type_name(),
            handlers = count,
            "Listener subscribed"
        );
        count
    }

    fn bind(&self, name: &str, invocable: BoxedInvocable, location: &Location<'static>) {
        let provenance = format!(
            "{}#{}->{}",
            location.file(),
            location.line(),
            invocable.signature()
        );
        let listener = self.resolver.reverse_resolve(name);
        let identifier = self.resolver.resolve(name);

        self.registry.register(
            identifier,
            Arc::new(Callback::new(listener.clone(), provenance.clone(), invocable)),
        );

        let build = BuildInfo::current();
        info!(
            listener = %listener,
            from = %provenance,
            package = build.package,
            version = build.version,
            commit = build.commit,
            "event subscribed"
        );
    }

    /// Trigger the event `name`, invoking its handlers in registration order.
    ///
    /// Unknown events succeed without doing anything. A disabled handler
    /// ends the trigger under [`DisabledPolicy::Stop`] and is passed over
    /// under [`DisabledPolicy::Skip`].
    ///
    /// # Errors
    ///
    /// Returns an [`EventCallbacksError`] holding every handler failure if
    /// at least one handler failed.
    pub fn trigger(&self, name: &str, args: impl Into<Args>) -> Result<(), EventCallbacksError> {
        let args = args.into();
        info!(trigger = %name, "event triggered");

        let identifier = self.resolver.resolve(name);
        let Some(callbacks) = self.registry.lookup(&identifier) else {
            return Ok(());
        };

        let mut errors = Vec::new();
        for callback in &callbacks {
            if !callback.is_enabled() {
                match self.config.on_disabled {
                    DisabledPolicy::Stop => {
                        debug!(
                            trigger = %name,
                            listener = %callback.name(),
                            dropped_errors = errors.len(),
                            "Disabled callback reached, ending trigger"
                        );
                        return Ok(());
                    },
                    DisabledPolicy::Skip => continue,
                }
            }

            if let Err(error) = callback.call(&args, self.config.arity_policy) {
                warn!(
                    trigger = %name,
                    listener = %callback.name(),
                    from = %callback.provenance(),
                    error = %error,
                    "event callback failed"
                );
                errors.push(error);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EventCallbacksError::new(name, identifier, errors))
        }
    }

    /// Number of handlers registered for `name`, enabled or not.
    #[must_use]
    pub fn handler_count(&self, name: &str) -> usize {
        self.registry.count(&self.resolver.resolve(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArityPolicy;
    use crate::error::HandlerError;
    use crate::invocable::into_boxed;
    use eventkit_test::LogCapture;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn raise(message: &'static str) {
        panic!("{message}")
    }

    #[test]
    fn test_subscribe_function_logs_provenance() {
        let dispatcher = Dispatcher::new();
        let logs = LogCapture::new();

        logs.capture(|| dispatcher.subscribe_function("OnTest", || {}))
            .unwrap();

        assert!(logs.contains("event subscribed"));
        assert!(logs.contains("listener=on.test"));
        assert!(logs.contains("dispatcher.rs#"));
        assert!(logs.contains("->fn()"));
        assert!(logs.contains("package=\"eventkit\""));
        assert_eq!(dispatcher.handler_count("on.test"), 1);
    }

    #[test]
    fn test_trigger_zero_args() {
        let dispatcher = Dispatcher::new();
        let (count, handler) = counter();
        dispatcher.subscribe_function("OnTest", handler).unwrap();

        dispatcher.trigger("on.test", ()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_trigger_unknown_event() {
        let dispatcher = Dispatcher::new();
        let (count, handler) = counter();
        dispatcher.subscribe_function("OnTest", handler).unwrap();

        dispatcher.trigger("on.unknown", ()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_trigger_with_args() {
        let dispatcher = Dispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        dispatcher
            .subscribe_function("on.test.args", move |message: String| {
                sink.lock().unwrap().push(message);
            })
            .unwrap();

        dispatcher
            .trigger("on.test.args", Args::new().with("with_args".to_string()))
            .unwrap();
        dispatcher
            .trigger("OnTestArgs", Args::new().with("again".to_string()))
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["with_args", "again"]);
    }

    #[test]
    fn test_trigger_aggregates_failures() {
        let dispatcher = Dispatcher::new();
        dispatcher
            .subscribe_function("on.fail", || raise("first"))
            .unwrap();
        let (count, handler) = counter();
        dispatcher.subscribe_function("on.fail", handler).unwrap();
        dispatcher
            .subscribe_function("on.fail", || -> Result<(), String> { Err("second".into()) })
            .unwrap();

        let err = dispatcher.trigger("on.fail", ()).unwrap_err();
        assert_eq!(err.to_string(), "event `on.fail` executed with 2 errors");
        assert_eq!(err.identifier(), "OnFail");
        let messages: Vec<String> = err.errors().iter().map(ToString::to_string).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_handler_stays_enabled() {
        let dispatcher = Dispatcher::new();
        dispatcher
            .subscribe_function("on.fail", || raise("boom"))
            .unwrap();

        assert!(dispatcher.trigger("on.fail", ()).is_err());
        assert!(dispatcher.trigger("on.fail", ()).is_err());
    }

    #[test]
    fn test_disabled_callback_stops_trigger() {
        let dispatcher = Dispatcher::new();
        let (first, first_handler) = counter();
        let (second, second_handler) = counter();
        dispatcher
            .subscribe_function("on.test", move |_: String| first_handler())
            .unwrap();
        dispatcher.subscribe_function("on.test", second_handler).unwrap();

        // Neither arity matches both handlers: the first is disabled, the second runs.
        dispatcher.trigger("on.test", ()).unwrap();
        assert_eq!(second.load(Ordering::SeqCst), 1);

        // The disabled first handler now ends every trigger.
        dispatcher.trigger("on.test", ()).unwrap();
        dispatcher
            .trigger("on.test", Args::new().with("x".to_string()))
            .unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabled_callback_skipped() {
        let config = DispatcherConfig::default().with_disabled_policy(DisabledPolicy::Skip);
        let dispatcher = Dispatcher::with_config(config).unwrap();
        let (second, second_handler) = counter();
        dispatcher
            .subscribe_function("on.test", |_: String| {})
            .unwrap();
        dispatcher.subscribe_function("on.test", second_handler).unwrap();

        dispatcher.trigger("on.test", ()).unwrap();
        dispatcher.trigger("on.test", ()).unwrap();
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_arity_report_policy() {
        let config = DispatcherConfig::default().with_arity_policy(ArityPolicy::Report);
        let dispatcher = Dispatcher::with_config(config).unwrap();
        dispatcher
            .subscribe_function("on.test", |_: String| {})
            .unwrap();

        let err = dispatcher.trigger("on.test", ()).unwrap_err();
        assert!(matches!(
            err.errors()[0],
            HandlerError::ArityMismatch {
                expected: 1,
                actual: 0
            }
        ));
        assert!(dispatcher.trigger("on.test", ()).is_ok());
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = DispatcherConfig::default().with_delimiter("");
        assert!(Dispatcher::with_config(config).is_err());
    }

    #[test]
    fn test_custom_delimiter() {
        let config = DispatcherConfig::default().with_delimiter(":");
        let dispatcher = Dispatcher::with_config(config).unwrap();
        let (count, handler) = counter();
        dispatcher.subscribe_function("user:created", handler).unwrap();

        dispatcher.trigger("UserCreated", ()).unwrap();
        dispatcher.trigger("user.created", ()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscribe_function_boxed() {
        let dispatcher = Dispatcher::new();
        let (count, handler) = counter();

        dispatcher
            .subscribe_function_boxed("on.boxed", Box::new(into_boxed(handler)))
            .unwrap();
        dispatcher.trigger("on.boxed", ()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert_eq!(
            dispatcher.subscribe_function_boxed("on.boxed", Box::new(1_i32)),
            Err(DispatchError::InvalidCallback)
        );
        assert_eq!(dispatcher.handler_count("on.boxed"), 1);
    }

    #[test]
    fn test_subscribe_boxed_rejects_non_listener() {
        let dispatcher = Dispatcher::new();
        assert_eq!(
            dispatcher.subscribe_boxed(Box::new("not a listener")),
            Err(DispatchError::InvalidPayload)
        );
        assert!(dispatcher.registry().is_empty());
    }

    #[test]
    fn test_clones_share_registry() {
        let dispatcher = Dispatcher::new();
        let clone = dispatcher.clone();
        let (count, handler) = counter();
        clone.subscribe_function("on.shared", handler).unwrap();

        dispatcher.trigger("on.shared", ()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_may_subscribe_reentrantly() {
        let dispatcher = Dispatcher::new();
        let inner = dispatcher.clone();
        dispatcher
            .subscribe_function("on.outer", move || {
                inner.subscribe_function("on.inner", || {}).unwrap();
            })
            .unwrap();

        dispatcher.trigger("on.outer", ()).unwrap();
        assert_eq!(dispatcher.handler_count("on.inner"), 1);
        assert_eq!(dispatcher.handler_count("on.outer"), 1);
    }
}
