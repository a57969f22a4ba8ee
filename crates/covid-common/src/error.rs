//! Error types and utilities for covid-plots

use crate::Metric;
use std::fmt;
use thiserror::Error;

/// Result type alias for covid-plots operations
pub type Result<T> = std::result::Result<T, CovidError>;

/// Main error type for covid-plots operations
#[derive(Error, Debug)]
pub enum CovidError {
    /// A source table could not be read or is malformed
    #[error("Failed to load '{source_id}': {message}")]
    Load {
        source_id: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested country has no rows in a metric's table
    #[error("Country '{country}' not found in the {metric} table")]
    UnknownCountry { country: String, metric: Metric },

    /// Joined series share no date
    #[error("No overlapping dates across {series_count} series")]
    EmptyIntersection { series_count: usize },

    /// A single column label could not be read as a date
    #[error("Unparseable date label '{label}'")]
    DateParse { label: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart rendering errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller contract violations and invalid input
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
}

/// Stable, user-facing name of an error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Load,
    UnknownCountry,
    EmptyIntersection,
    DateParse,
    Config,
    Io,
    Graph,
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Load => "LoadError",
            ErrorKind::UnknownCountry => "UnknownCountryError",
            ErrorKind::EmptyIntersection => "EmptyIntersectionError",
            ErrorKind::DateParse => "DateParseError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::Io => "IoError",
            ErrorKind::Graph => "GraphError",
            ErrorKind::Validation => "ValidationError",
        };
        f.write_str(name)
    }
}

impl CovidError {
    /// Create a new load error
    pub fn load(source_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Load {
            source_id: source_id.into(),
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new load error with source
    pub fn load_with_source(
        source_id: impl Into<String>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Load {
            source_id: source_id.into(),
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn unknown_country(country: impl Into<String>, metric: Metric) -> Self {
        Self::UnknownCountry {
            country: country.into(),
            metric,
        }
    }

    pub fn empty_intersection(series_count: usize) -> Self {
        Self::EmptyIntersection { series_count }
    }

    pub fn date_parse(label: impl Into<String>) -> Self {
        Self::DateParse {
            label: label.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Load { .. } => ErrorKind::Load,
            Self::UnknownCountry { .. } => ErrorKind::UnknownCountry,
            Self::EmptyIntersection { .. } => ErrorKind::EmptyIntersection,
            Self::DateParse { .. } => ErrorKind::DateParse,
            Self::Config { .. } => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Graph { .. } => ErrorKind::Graph,
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to CovidError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for CovidError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
