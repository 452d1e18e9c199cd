//! A single registered handler and its failure-isolated invocation.

use std::any::Any;
use std::error::Error;
use std::io;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};

use eventkit_telemetry::BuildInfo;
use tracing::{error, trace};

use crate::arguments::Args;
use crate::config::ArityPolicy;
use crate::error::{BoxError, HandlerError};
use crate::invocable::BoxedInvocable;

/// A registered handler.
///
/// Once disabled, a callback is never enabled again.
pub struct Callback {
    name: String,
    provenance: String,
    arity: usize,
    enabled: AtomicBool,
    invocable: BoxedInvocable,
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name)
            .field("provenance", &self.provenance)
            .field("arity", &self.arity)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

impl Callback {
    /// Create an enabled callback. The arity is taken from the invocable.
    pub fn new(
        name: impl Into<String>,
        provenance: impl Into<String>,
        invocable: BoxedInvocable,
    ) -> Self {
        Self {
            name: name.into(),
            provenance: provenance.into(),
            arity: invocable.arity(),
            enabled: AtomicBool::new(true),
            invocable,
        }
    }

    /// Listener name, in dotted form.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the callback was registered.
    #[must_use]
    pub fn provenance(&self) -> &str {
        &self.provenance
    }

    /// Declared parameter count.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Handler signature.
    #[must_use]
    pub fn signature(&self) -> &'static str {
        self.invocable.signature()
    }

    /// Check whether the callback may still be invoked.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Permanently disable the callback.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// Invoke the handler with `args`.
    ///
    /// An argument count mismatch disables the callback and logs the
    /// mismatch; it is only returned as an error under
    /// [`ArityPolicy::Report`]. Panics raised by the handler are caught and
    /// returned as errors.
    ///
    /// # Errors
    ///
    /// Returns the handler's failure.
    pub fn call(&self, args: &Args, policy: ArityPolicy) -> Result<(), HandlerError> {
        if args.len() != self.arity {
            let build = BuildInfo::current();
            error!(
                from = %self.provenance,
                name = %self.name,
                want = self.arity,
                got = args.len(),
                kind = self.signature(),
                package = build.package,
                version = build.version,
                commit = build.commit,
                "event callback argument mismatch"
            );

            self.disable();

            return match policy {
                ArityPolicy::Disable => Ok(()),
                ArityPolicy::Report => Err(HandlerError::ArityMismatch {
                    expected: self.arity,
                    actual: args.len(),
                }),
            };
        }

        trace!(name = %self.name, from = %self.provenance, "Invoking callback");

        catch_unwind(AssertUnwindSafe(|| self.invocable.invoke(args)))
            .unwrap_or_else(|payload| Err(panic_to_error(payload)))
    }
}

/// Convert a panic payload into a handler error.
///
/// `HandlerError`, `BoxError` and `io::Error` values pass through unchanged.
/// A `Box<dyn Error + Send>` keeps its message; string payloads become the
/// message. Other error types cannot be recognised behind `Any` and get a
/// fixed message.
fn panic_to_error(payload: Box<dyn Any + Send>) -> HandlerError {
    let payload = match payload.downcast::<HandlerError>() {
        Ok(err) => return *err,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<BoxError>() {
        Ok(err) => return HandlerError::Failed(*err),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<io::Error>() {
        Ok(err) => return HandlerError::Failed(err),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<Box<dyn Error + Send>>() {
        Ok(err) => {
            return HandlerError::Panicked {
                message: err.to_string(),
            };
        },
        Err(payload) => payload,
    };
    let message = match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "handler panicked with a non-string payload".to_string(),
        },
    };
    HandlerError::Panicked { message }
}
