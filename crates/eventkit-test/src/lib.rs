//! Eventkit Test - Shared test utilities for eventkit.
//!
//! This crate provides log capture and recording handlers that can be used
//! across the eventkit crates as a dev-dependency.
//!
//! # Usage
//!
//! ```rust
//! use eventkit::Dispatcher;
//! use eventkit_test::{LogCapture, Recorder};
//!
//! let dispatcher = Dispatcher::new();
//! let recorder = Recorder::new();
//! let logs = LogCapture::new();
//!
//! logs.capture(|| {
//!     dispatcher.subscribe_function("on.test", recorder.handler("called")).unwrap();
//!     dispatcher.trigger("on.test", ()).unwrap();
//! });
//!
//! assert_eq!(recorder.calls(), vec!["called"]);
//! assert!(logs.contains("event triggered"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod logs;
pub mod recorder;

pub use fixtures::*;
pub use logs::*;
pub use recorder::*;
