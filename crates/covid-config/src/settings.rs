//! Application configuration structures

use covid_common::{LoggingConfig, Metric};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::{Validate, ValidationError, ValidationErrors};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input tables
    pub data: DataConfig,

    /// Where rendered charts go
    pub output: OutputConfig,

    /// Values used when the command line leaves something unset
    pub defaults: DefaultsConfig,

    /// Chart rendering settings
    pub graph: GraphSettings,

    /// Multi-country batch settings
    pub batch: BatchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Input table configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the three CSV tables
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid data directory"))]
    pub directory: String,

    /// Confirmed cases table file name
    #[validate(length(min = 1, message = "Confirmed file name cannot be empty"))]
    pub confirmed_file: String,

    /// Deaths table file name
    #[validate(length(min = 1, message = "Deaths file name cannot be empty"))]
    pub deaths_file: String,

    /// Recoveries table file name
    #[validate(length(min = 1, message = "Recovered file name cannot be empty"))]
    pub recovered_file: String,

    /// chrono format of the date column labels
    #[validate(custom(function = "crate::validation::validate_date_format", message = "Date format must round-trip a calendar date"))]
    pub date_format: String,

    /// Number of leading region metadata columns before the first date column
    #[validate(range(min = 1, max = 64, message = "Metadata columns must be between 1 and 64"))]
    pub metadata_columns: usize,

    /// Zero-based index of the country column among the metadata columns
    pub country_column: usize,

    /// Keep only this many date columns of the recovered table; `None` keeps all
    pub recovered_date_limit: Option<usize>,
}

impl DataConfig {
    /// Full path of the table holding `metric`
    pub fn path_for(&self, metric: Metric) -> PathBuf {
        let file = match metric {
            Metric::Confirmed => &self.confirmed_file,
            Metric::Deaths => &self.deaths_file,
            Metric::Recovered => &self.recovered_file,
        };
        PathBuf::from(&self.directory).join(file)
    }

    /// Column limit applied to `metric` before normalization
    pub fn date_limit_for(&self, metric: Metric) -> Option<usize> {
        match metric {
            Metric::Recovered => self.recovered_date_limit,
            Metric::Confirmed | Metric::Deaths => None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one image per country; created if absent
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid output directory"))]
    pub directory: String,
}

/// Fallback values for the invocation surface
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Country plotted when no country list is given
    #[validate(length(min = 1, message = "Default country cannot be empty"))]
    pub country: String,
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphSettings {
    /// Image width in pixels
    #[validate(range(min = 300, max = 8000, message = "Width must be between 300 and 8000 pixels"))]
    pub width: u32,

    /// Image height in pixels
    #[validate(range(min = 300, max = 8000, message = "Height must be between 300 and 8000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(custom(function = "crate::validation::validate_hex_color", message = "Background color must be a #RRGGBB hex color"))]
    pub background_color: String,

    /// Font family for all text
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Title font size
    #[validate(range(min = 8, max = 96, message = "Title font size must be between 8 and 96"))]
    pub title_font_size: u32,

    /// Axis and legend font size
    #[validate(range(min = 6, max = 72, message = "Label font size must be between 6 and 72"))]
    pub label_font_size: u32,

    /// Whether to draw grid lines
    pub show_grid: bool,

    /// Add a deaths / confirmed ratio row
    pub show_fatality_ratio: bool,

    /// Approximate spacing of x-axis ticks in days
    #[validate(range(min = 1, max = 3650, message = "Tick interval must be between 1 and 3650 days"))]
    pub tick_interval_days: u32,
}

/// Batch configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Run countries on a rayon pool
    pub parallel: bool,
}

impl Config {
    /// Validate every section plus the cross-field rules
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.data.validate()?;
        self.output.validate()?;
        self.defaults.validate()?;
        self.graph.validate()?;

        let mut errors = ValidationErrors::new();

        if self.data.country_column >= self.data.metadata_columns {
            let mut err = ValidationError::new("country_column_out_of_range");
            err.message = Some("Country column must be one of the metadata columns".into());
            errors.add("country_column", err);
        }

        if self.data.recovered_date_limit == Some(0) {
            let mut err = ValidationError::new("zero_date_limit");
            err.message = Some("Recovered date limit must be positive or null".into());
            errors.add("recovered_date_limit", err);
        }

        if let Err(mut err) = crate::validation::validate_log_level(&self.logging.level) {
            err.message = Some("Log level must be a valid tracing filter, e.g. info or covid_series=debug".into());
            errors.add("level", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            confirmed_file: "time_series_covid19_confirmed_global.csv".to_string(),
            deaths_file: "time_series_covid19_deaths_global.csv".to_string(),
            recovered_file: "time_series_covid19_recovered_global.csv".to_string(),
            date_format: "%m/%d/%y".to_string(),
            metadata_columns: 4,
            country_column: 1,
            recovered_date_limit: Some(547),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "images".to_string(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: "Germany".to_string(),
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1200,
            background_color: "#FFFFFF".to_string(),
            font_family: "sans-serif".to_string(),
            title_font_size: 28,
            label_font_size: 14,
            show_grid: true,
            show_fatality_ratio: false,
            tick_interval_days: 180,
        }
    }
}
