//! Configuration loading utilities

use crate::Config;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Default configuration file names, tried in order
const DEFAULT_CONFIG_FILES: [&str; 2] = ["covid-plots.yaml", "covid-plots.yml"];

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "COVID_PLOTS_CONFIG";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for covid_common::CovidError {
    fn from(err: ConfigError) -> Self {
        covid_common::CovidError::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        debug!("Reading configuration from {}", path.as_ref().display());
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from an explicit path, `COVID_PLOTS_CONFIG`, a default
    /// file in the working directory, or built-in defaults, in that order
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_config(path);
        }

        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self::load_config(path);
        }

        for candidate in DEFAULT_CONFIG_FILES {
            if Path::new(candidate).exists() {
                return Self::load_config(candidate);
            }
        }

        info!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(dir) = env::var("COVID_DATA_DIR") {
            config.data.directory = dir;
        }

        if let Ok(format) = env::var("COVID_DATE_FORMAT") {
            config.data.date_format = format;
        }

        if let Ok(dir) = env::var("COVID_OUTPUT_DIR") {
            config.output.directory = dir;
        }

        if let Ok(country) = env::var("COVID_DEFAULT_COUNTRY") {
            config.defaults.country = country;
        }

        if let Ok(width) = env::var("GRAPH_WIDTH") {
            config.graph.width = parse_env("GRAPH_WIDTH", &width)?;
        }

        if let Ok(height) = env::var("GRAPH_HEIGHT") {
            config.graph.height = parse_env("GRAPH_HEIGHT", &height)?;
        }

        if let Ok(parallel) = env::var("COVID_PARALLEL") {
            config.batch.parallel = parse_env("COVID_PARALLEL", &parallel)?;
        }

        if let Ok(level) = env::var("COVID_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

fn parse_env<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
