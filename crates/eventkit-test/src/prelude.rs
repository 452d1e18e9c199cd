//! Prelude module - commonly used test utilities.
//!
//! Use `use eventkit_test::prelude::*;` to import all helpers.

pub use crate::{EventTest, LogCapture, Recorder, raise};
