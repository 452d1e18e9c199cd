//! Listener objects whose prefixed methods are bound as event handlers.
//!
//! A [`Listener`] lists its methods once, at subscription time. Methods whose
//! identifier starts with the configured prefix (`On` by default) are bound
//! to the remainder of the identifier; the rest are ignored.
//!
//! ```rust
//! use std::sync::Arc;
//! use eventkit::{Dispatcher, listener};
//!
//! struct Audit;
//!
//! impl Audit {
//!     fn on_user_created(&self, _name: String) {}
//!     fn flush(&self) {}
//! }
//!
//! listener!(Audit {
//!     "OnUserCreated" => on_user_created(name: String),
//!     "Flush" => flush(),
//! });
//!
//! let dispatcher = Dispatcher::new();
//! assert_eq!(dispatcher.subscribe(Arc::new(Audit)).unwrap(), 1);
//! assert_eq!(dispatcher.handler_count("user.created"), 1);
//! ```

use std::any::type_name;
use std::sync::Arc;

use crate::invocable::{BoxedInvocable, IntoInvocable};

/// An object exposing named behaviours.
pub trait Listener: Send + Sync + 'static {
    /// Record every exposed behaviour in `methods`.
    fn methods(self: Arc<Self>, methods: &mut MethodSet);
}

/// Behaviours collected from a [`Listener`], in declaration order.
#[derive(Default)]
pub struct MethodSet {
    methods: Vec<(String, BoxedInvocable)>,
}

impl std::fmt::Debug for MethodSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.methods.iter().map(|(identifier, _)| identifier))
            .finish()
    }
}

impl MethodSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a behaviour under `identifier`.
    pub fn method<M>(
        &mut self,
        identifier: impl Into<String>,
        f: impl IntoInvocable<M>,
    ) -> &mut Self {
        self.methods.push((identifier.into(), f.into_invocable()));
        self
    }

    /// Number of recorded behaviours.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check whether no behaviour was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Recorded identifiers, in declaration order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(|(identifier, _)| identifier.as_str())
    }

    /// Behaviours whose identifier starts with `prefix`, paired with the
    /// identifier remainder. A bare `prefix` is skipped.
    pub(crate) fn handlers(self, prefix: &str) -> Vec<(String, BoxedInvocable)> {
        self.methods
            .into_iter()
            .filter_map(|(identifier, invocable)| {
                identifier
                    .strip_prefix(prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_string(), invocable))
            })
            .collect()
    }
}

/// A type-erased listener, for passing listeners as dynamic payloads.
#[derive(Clone)]
pub struct ListenerObject {
    listener: Arc<dyn Listener>,
    type_name: &'static str,
}

impl std::fmt::Debug for ListenerObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerObject")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl ListenerObject {
    /// Erase a listener.
    pub fn new<L: Listener>(listener: Arc<L>) -> Self {
        Self {
            listener,
            type_name: type_name::<L>(),
        }
    }

    /// Name of the listener's concrete type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Collect the listener's behaviours.
    #[must_use]
    pub fn methods(&self) -> MethodSet {
        let mut methods = MethodSet::new();
        Arc::clone(&self.listener).methods(&mut methods);
        methods
    }
}

/// Implement [`Listener`] for a type from a list of
/// `"Identifier" => method(param: Type, ..)` entries.
///
/// Each entry binds a closure that holds an `Arc` of the receiver and calls
/// the named `&self` method with the declared parameters.
#[macro_export]
macro_rules! listener {
    ($ty:ty { $($identifier:literal => $method:ident($($arg:ident: $arg_ty:ty),* $(,)?)),* $(,)? }) => {
        impl $crate::Listener for $ty {
            #[allow(unused_variables)]
            fn methods(self: ::std::sync::Arc<Self>, methods: &mut $crate::MethodSet) {
                $(
                    {
                        let this = ::std::sync::Arc::clone(&self);
                        methods.method($identifier, move |$($arg: $arg_ty),*| this.$method($($arg),*));
                    }
                )*
            }
        }
    };
}
