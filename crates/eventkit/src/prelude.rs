//! Prelude module - commonly used types for convenient import.
//!
//! Use `use eventkit::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use eventkit::prelude::*;
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.subscribe_function("on.ping", || {}).unwrap();
//! dispatcher.trigger("on.ping", ()).unwrap();
//! ```

// Dispatcher
pub use crate::Dispatcher;

// Arguments
pub use crate::{Arg, Args};

// Handlers and listeners
pub use crate::{BoxedInvocable, IntoInvocable, Invocable, Listener, ListenerObject, MethodSet};

// Configuration
pub use crate::{ArityPolicy, DisabledPolicy, DispatcherConfig};

// Errors
pub use crate::{DispatchError, DispatchResult, EventCallbacksError, HandlerError};
