//! Positional argument vectors passed to triggers.

use std::any::{Any, type_name};
use std::fmt;

use crate::error::HandlerError;

/// One positional trigger argument: a type-erased value or nil.
pub struct Arg(Option<Box<dyn Any + Send + Sync>>);

impl Arg {
    /// Wrap a value.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    /// An absent argument. Binds as the parameter type's default.
    #[must_use]
    pub fn nil() -> Self {
        Self(None)
    }

    /// Check whether this argument is nil.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the value as `T`, if present and of that type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    fn as_any(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.0.as_deref()
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            f.write_str("nil")
        } else {
            f.write_str("Arg(..)")
        }
    }
}

/// Ordered argument vector for one trigger call.
#[derive(Debug, Default)]
pub struct Args(Vec<Arg>);

impl Args {
    /// Create an empty argument vector.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a value.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.0.push(Arg::value(value));
        self
    }

    /// Append a nil argument.
    #[must_use]
    pub fn nil(mut self) -> Self {
        self.0.push(Arg::nil());
        self
    }

    /// Append an already wrapped argument.
    pub fn push(&mut self, arg: Arg) {
        self.0.push(arg);
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Arg> {
        self.0.get(position)
    }

    /// Bind the argument at `position` to parameter type `P`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::ArgumentType`] if the value has another type.
    pub fn bind<P: Param>(&self, position: usize) -> Result<P, HandlerError> {
        P::bind(self.get(position).and_then(Arg::as_any)).ok_or(HandlerError::ArgumentType {
            position,
            expected: type_name::<P>(),
        })
    }
}

impl From<()> for Args {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl From<Vec<Arg>> for Args {
    fn from(args: Vec<Arg>) -> Self {
        Self(args)
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A type a handler parameter may be declared with.
///
/// Present values are downcast and cloned. Nil binds `Default::default()`,
/// so an `Option<T>` parameter receives `None`.
pub trait Param: Sized + 'static {
    /// Bind an argument, returning `None` when its type does not match.
    fn bind(arg: Option<&(dyn Any + Send + Sync)>) -> Option<Self>;
}

impl<T> Param for T
where
    T: Any + Clone + Default + Send + Sync,
{
    fn bind(arg: Option<&(dyn Any + Send + Sync)>) -> Option<Self> {
        match arg {
            None => Some(T::default()),
            Some(value) => value.downcast_ref::<T>().cloned(),
        }
    }
}

/// Build an [`Args`] vector from values.
///
/// ```rust
/// use eventkit::{Args, args};
///
/// let args: Args = args!["with_args".to_string(), 42_u32];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Args::new()$(.with($value))+
    };
}
