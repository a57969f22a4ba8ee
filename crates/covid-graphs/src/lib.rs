//! # covid-graphs
//!
//! Turns a [`covid_series::CountryReport`] into one chart image per country.

pub mod output;
pub mod renderer;
pub mod types;

pub use output::{output_file_name, output_path, prepare_output_dir};
pub use renderer::{ChartSink, PlottersChartSink};
pub use types::*;
