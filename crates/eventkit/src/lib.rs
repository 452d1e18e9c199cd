//! Eventkit - in-process synchronous publish/subscribe dispatcher.
//!
//! This crate provides:
//! - Name resolution between dotted event names (`on.user.created`) and
//!   PascalCase identifiers (`OnUserCreated`)
//! - A callback registry with argument-count checking
//! - A dispatcher that runs every handler of an event on the calling thread,
//!   isolating handler failures and reporting them together
//!
//! # Architecture
//!
//! Handlers are subscribed to an event name and stored, in order, under the
//! resolved identifier. There are two ways to subscribe:
//!
//! 1. **Functions**: `dispatcher.subscribe_function(name, handler)` binds one
//!    closure or function.
//!
//! 2. **Listeners**: `dispatcher.subscribe(listener)` binds every method of a
//!    [`Listener`] whose identifier starts with the configured prefix (`On`).
//!
//! A handler whose parameter count does not match a trigger's argument count
//! is disabled for good. A panicking or failing handler does not stop the
//! others; all failures of one trigger come back as one
//! [`EventCallbacksError`].
//!
//! # Example
//!
//! ```rust
//! use eventkit::{Args, Dispatcher};
//!
//! let dispatcher = Dispatcher::new();
//!
//! dispatcher
//!     .subscribe_function("on.user.created", |name: String| {
//!         println!("welcome, {name}");
//!     })
//!     .unwrap();
//!
//! dispatcher
//!     .trigger("on.user.created", Args::new().with("ada".to_string()))
//!     .unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod arguments;
mod callback;
mod config;
mod dispatcher;
mod error;
mod invocable;
mod listeners;
mod registry;
mod resolver;

pub use arguments::{Arg, Args, Param};
pub use callback::Callback;
pub use config::{
    ArityPolicy, ConfigError, ConfigResult, DEFAULT_PREFIX, DispatcherConfig, DisabledPolicy,
};
pub use dispatcher::Dispatcher;
pub use error::{BoxError, DispatchError, DispatchResult, EventCallbacksError, HandlerError};
pub use invocable::{
    BoxedInvocable, Erased, FnInvocable, HandlerOutput, IntoInvocable, Invocable, into_boxed,
};
pub use listeners::{Listener, ListenerObject, MethodSet};
pub use registry::Registry;
pub use resolver::{DEFAULT_DELIMITER, NameResolver, resolve, reverse_resolve};
