//! # covid-common
//!
//! Shared types, error taxonomy, and logging setup for the covid-plots workspace.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{CovidError, ErrorKind, Result};
pub use logging::{init_default_logging, init_logging, LogFormat, LoggingConfig};
pub use types::*;
pub use utils::*;
