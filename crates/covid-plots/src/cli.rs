//! Command line arguments.

use clap::Parser;
use covid_common::{split_country_list, MetricSelection};
use covid_config::Config;
use std::path::PathBuf;

/// Plot daily and cumulative COVID-19 figures per country.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "covid-plots", author, version, about, long_about = None)]
pub struct Args {
    /// Comma-separated countries to plot; defaults to the configured country
    #[arg(long, value_name = "LIST")]
    pub countries: Option<String>,

    /// Plot confirmed cases
    #[arg(short = 'c', long)]
    pub confirmed: bool,

    /// Plot deaths
    #[arg(short = 'd', long)]
    pub deaths: bool,

    /// Plot recoveries
    #[arg(short = 'r', long)]
    pub recovered: bool,

    /// Configuration file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `covid_series=trace`
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Directory holding the three time-series tables
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory receiving the chart images
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Add a case-fatality-ratio panel
    #[arg(long)]
    pub ratio: bool,

    /// Process countries in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Print the countries of the first selected table and exit
    #[arg(long)]
    pub list_countries: bool,
}

impl Args {
    /// Selected metrics; no flag selects all three.
    pub fn selection(&self) -> MetricSelection {
        MetricSelection::from_flags(self.confirmed, self.deaths, self.recovered)
    }

    /// Requested countries, or the configured default when none are given.
    pub fn country_list(&self, config: &Config) -> Vec<String> {
        let requested = self
            .countries
            .as_deref()
            .map(split_country_list)
            .unwrap_or_default();
        if requested.is_empty() {
            vec![config.defaults.country.clone()]
        } else {
            requested
        }
    }

    /// Apply command line overrides on top of file and environment configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data.directory = dir.display().to_string();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.display().to_string();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.parallel {
            config.batch.parallel = true;
        }
        if self.ratio {
            config.graph.show_fatality_ratio = true;
        }
    }
}
