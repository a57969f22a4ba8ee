//! # covid-plots
//!
//! Command line front end: reads the configuration, loads the three
//! time-series tables once, runs the per-country pipeline for every requested
//! country and writes one chart per country that succeeded.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::{prepare_config, run, Outcome, RunSummary, EXIT_ALL_FAILED, EXIT_FATAL, EXIT_SUCCESS};
pub use cli::Args;
pub use error::{AppError, AppResult};
