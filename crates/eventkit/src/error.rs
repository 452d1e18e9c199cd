//! Error types for subscriptions and triggers.

use thiserror::Error;

/// Boxed error type carried by handler failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single handler invocation.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler panicked with a string payload, or with a payload that
    /// carried no message at all.
    #[error("{message}")]
    Panicked {
        /// The raised text.
        message: String,
    },

    /// The handler returned an error, or panicked with an error value.
    #[error(transparent)]
    Failed(BoxError),

    /// A positional argument could not be bound to the declared parameter type.
    #[error("argument {position} cannot be bound as `{expected}`")]
    ArgumentType {
        /// Zero-based argument position.
        position: usize,
        /// Declared parameter type.
        expected: &'static str,
    },

    /// The trigger passed a different number of arguments than the handler
    /// declares. Only surfaced under [`ArityPolicy::Report`](crate::ArityPolicy::Report).
    #[error("argument mismatch: want {expected}, got {actual}")]
    ArityMismatch {
        /// Declared parameter count.
        expected: usize,
        /// Number of arguments passed to the trigger.
        actual: usize,
    },
}

impl HandlerError {
    /// Wrap an arbitrary error value.
    pub fn failed(error: impl Into<BoxError>) -> Self {
        Self::Failed(error.into())
    }
}

/// Aggregate of every handler failure produced by one trigger call.
#[derive(Debug, Error)]
#[error("event `{event}` executed with {} errors", .errors.len())]
pub struct EventCallbacksError {
    event: String,
    identifier: String,
    errors: Vec<HandlerError>,
}

impl EventCallbacksError {
    pub(crate) fn new(
        event: impl Into<String>,
        identifier: impl Into<String>,
        errors: Vec<HandlerError>,
    ) -> Self {
        Self {
            event: event.into(),
            identifier: identifier.into(),
            errors,
        }
    }

    /// The event name as passed to the trigger.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The resolved event identifier the handlers were looked up under.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Handler failures in invocation order.
    #[must_use]
    pub fn errors(&self) -> &[HandlerError] {
        &self.errors
    }

    /// Consume the aggregate and return the failures.
    #[must_use]
    pub fn into_errors(self) -> Vec<HandlerError> {
        self.errors
    }

    /// Number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false` for an aggregate returned by a trigger.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Rejected subscription input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The value passed as a handler is not invocable.
    #[error("callback must be a function")]
    InvalidCallback,

    /// The value passed as a listener is not a listener object.
    #[error("payload must be a struct")]
    InvalidPayload,
}

/// Result type for subscription operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
