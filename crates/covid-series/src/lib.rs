//! # covid-series
//!
//! The data transformation core: per-region tables in, per-country dated
//! cumulative and daily series out.
//!
//! Flow for one country: [`loader`] reads each metric table once into a
//! [`RawTable`], [`aggregator`] sums the country's rows, [`normalizer`] turns the
//! column labels into a [`DateAxis`], [`delta`] derives the daily series and
//! [`aligner`] joins metrics for cross-metric ratios. [`pipeline`] wires these
//! together and isolates failures per country.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod aligner;
pub mod delta;
pub mod loader;
pub mod normalizer;
pub mod pipeline;
pub mod series;
pub mod table;

pub use aggregator::{aggregate_country, countries};
pub use aligner::{align, percentage_ratio, CombinedView};
pub use delta::{absorbed_revisions, daily_from_cumulative};
pub use loader::{Datasets, TableLayout};
pub use normalizer::{DateParser, Normalized};
pub use pipeline::{BatchOutcome, CountryFailure, CountryReport, MetricPanel, Pipeline, PipelineOptions};
pub use series::{Count, DateAxis, DatedSeries};
pub use table::{RawTable, RegionRow};
