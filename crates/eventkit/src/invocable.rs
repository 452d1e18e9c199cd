//! Invocable handlers with a declared arity.
//!
//! Any `Fn(P1, .., Pn) -> R` with up to eight [`Param`] parameters converts
//! into an [`Invocable`] through [`IntoInvocable`]. The arity is the length of
//! the declared parameter list and is fixed when the handler is converted.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::arguments::{Args, Param};
use crate::error::{BoxError, HandlerError};

/// A handler callable with a positional argument vector.
pub trait Invocable: Send + Sync + 'static {
    /// Number of positional parameters the handler declares.
    fn arity(&self) -> usize;

    /// Human-readable signature, used in provenance strings.
    fn signature(&self) -> &'static str;

    /// Bind `args` to the declared parameters and run the handler.
    ///
    /// Callers guarantee `args.len() == self.arity()`.
    ///
    /// # Errors
    ///
    /// Returns the handler's own error, or [`HandlerError::ArgumentType`]
    /// when an argument cannot be bound.
    fn invoke(&self, args: &Args) -> Result<(), HandlerError>;
}

/// Shared, type-erased invocable.
pub type BoxedInvocable = Arc<dyn Invocable>;

/// Conversion of closures and functions into an [`Invocable`].
///
/// `Marker` only disambiguates the implementations for each arity.
pub trait IntoInvocable<Marker>: Send + Sync + 'static {
    /// Convert into a shared invocable.
    fn into_invocable(self) -> BoxedInvocable;
}

/// Marker for values that already are a [`BoxedInvocable`].
#[derive(Debug)]
pub enum Erased {}

impl IntoInvocable<Erased> for BoxedInvocable {
    fn into_invocable(self) -> BoxedInvocable {
        self
    }
}

/// Convert `f` into a [`BoxedInvocable`].
pub fn into_boxed<M, F: IntoInvocable<M>>(f: F) -> BoxedInvocable {
    f.into_invocable()
}

/// Return values a handler may produce.
///
/// `()` always succeeds. `Result` maps `Err` into [`HandlerError::Failed`];
/// the `Ok` value is discarded. Handlers that never return are accepted too.
pub trait HandlerOutput {
    /// Convert the return value into the invocation outcome.
    ///
    /// # Errors
    ///
    /// Returns the failure the handler reported.
    fn into_outcome(self) -> Result<(), HandlerError>;
}

impl HandlerOutput for () {
    fn into_outcome(self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl<T, E> HandlerOutput for Result<T, E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), HandlerError> {
        self.map(|_| ()).map_err(|e| HandlerError::Failed(e.into()))
    }
}

// `!` cannot be named in type position on stable; the return type of a
// `fn() -> !` pointer can.
trait FnOutput {
    type Output;
}

impl<T> FnOutput for fn() -> T {
    type Output = T;
}

type Never = <fn() -> ! as FnOutput>::Output;

/// Handlers whose body only diverges, such as `|| panic!("..")`.
impl HandlerOutput for Never {
    fn into_outcome(self) -> Result<(), HandlerError> {
        self
    }
}

/// A function wrapped as an [`Invocable`].
pub struct FnInvocable<F, Marker> {
    f: F,
    _marker: PhantomData<fn() -> Marker>,
}

impl<F, Marker> fmt::Debug for FnInvocable<F, Marker> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnInvocable")
            .field("signature", &type_name::<Marker>())
            .finish_non_exhaustive()
    }
}

macro_rules! impl_invocable {
    ($arity:literal; $($param:ident),*) => {
        impl<F, R, $($param,)*> Invocable for FnInvocable<F, fn($($param,)*) -> R>
        where
            F: Fn($($param),*) -> R + Send + Sync + 'static,
            R: HandlerOutput + 'static,
            $($param: Param,)*
        {
            fn arity(&self) -> usize {
                $arity
            }

            fn signature(&self) -> &'static str {
                type_name::<fn($($param),*) -> R>()
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn invoke(&self, args: &Args) -> Result<(), HandlerError> {
                let mut positions = 0_usize..;
                $(
                    let $param = args.bind::<$param>(positions.next().unwrap_or_default())?;
                )*
                (self.f)($($param),*).into_outcome()
            }
        }

        impl<F, R, $($param,)*> IntoInvocable<fn($($param,)*) -> R> for F
        where
            F: Fn($($param),*) -> R + Send + Sync + 'static,
            R: HandlerOutput + 'static,
            $($param: Param,)*
        {
            fn into_invocable(self) -> BoxedInvocable {
                Arc::new(FnInvocable::<F, fn($($param,)*) -> R> {
                    f: self,
                    _marker: PhantomData,
                })
            }
        }
    };
}

impl_invocable!(0;);
impl_invocable!(1; P1);
impl_invocable!(2; P1, P2);
impl_invocable!(3; P1, P2, P3);
impl_invocable!(4; P1, P2, P3, P4);
impl_invocable!(5; P1, P2, P3, P4, P5);
impl_invocable!(6; P1, P2, P3, P4, P5, P6);
impl_invocable!(7; P1, P2, P3, P4, P5, P6, P7);
impl_invocable!(8; P1, P2, P3, P4, P5, P6, P7, P8);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_arity_matches_declared_parameters() {
        assert_eq!(into_boxed(|| {}).arity(), 0);
        assert_eq!(into_boxed(|_: String| {}).arity(), 1);
        assert_eq!(into_boxed(|_: u8, _: u16, _: u32| {}).arity(), 3);
        assert_eq!(
            into_boxed(|_: u8, _: u8, _: u8, _: u8, _: u8, _: u8, _: u8, _: u8| {}).arity(),
            8
        );
    }

    #[test]
    fn test_signature() {
        assert_eq!(into_boxed(|| {}).signature(), "fn()");
        assert!(into_boxed(|_: String| {}).signature().contains("String"));
    }

    #[test]
    fn test_invoke_binds_arguments_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler = into_boxed(move |a: String, b: u32| {
            sink.lock().unwrap().push(format!("{a}:{b}"));
        });

        handler
            .invoke(&Args::new().with("x".to_string()).with(2_u32))
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["x:2".to_string()]);
    }

    #[test]
    fn test_result_output_maps_error() {
        let handler = into_boxed(|| -> Result<(), String> { Err("nope".to_string()) });
        let err = handler.invoke(&Args::new()).unwrap_err();
        assert!(matches!(err, HandlerError::Failed(_)));
        assert_eq!(err.to_string(), "nope");

        let ok = into_boxed(|| -> Result<u32, std::io::Error> { Ok(3) });
        assert!(ok.invoke(&Args::new()).is_ok());
    }

    #[test]
    fn test_diverging_closure_is_invocable() {
        let handler = into_boxed(|| panic!("diverged"));
        assert_eq!(handler.arity(), 0);

        let handler = into_boxed(|_: String| panic!("diverged"));
        assert_eq!(handler.arity(), 1);
    }

    #[test]
    fn test_bind_failure_skips_handler() {
        let called = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&called);
        let handler = into_boxed(move |_: u32| {
            *flag.lock().unwrap() = true;
        });

        let err = handler.invoke(&Args::new().with("wrong")).unwrap_err();
        assert!(matches!(err, HandlerError::ArgumentType { position: 0, .. }));
        assert!(!*called.lock().unwrap());
    }

    #[test]
    fn test_boxed_invocable_passes_through() {
        let boxed = into_boxed(|_: i64| {});
        let again = into_boxed(Arc::clone(&boxed));
        assert!(Arc::ptr_eq(&boxed, &again));
    }

    fn free_function(_: String, _: Option<String>) {}

    #[test]
    fn test_free_function() {
        assert_eq!(into_boxed(free_function).arity(), 2);
    }
}
