//! Eventkit Telemetry - Logging setup for applications embedding a dispatcher.
//!
//! The dispatcher itself only emits `tracing` records. This crate provides:
//! - Configurable logging setup with multiple formats and targets
//! - The build metadata (`package`, `version`, `commit`) attached to
//!   subscription and argument-mismatch records
//!
//! # Example
//!
//! ```rust,no_run
//! use eventkit_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), eventkit_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Json)
//!     .with_directive("eventkit=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod build_info;
mod error;
mod logging;

pub use build_info::BuildInfo;
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging,
};
