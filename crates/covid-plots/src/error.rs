//! Application-wide error types using thiserror.

use covid_common::CovidError;
use covid_config::ConfigError;

/// Errors that abort the whole invocation.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input tables could not be loaded.
    #[error("Data error: {0}")]
    Data(#[source] CovidError),

    /// Output directory could not be prepared.
    #[error("Output error: {0}")]
    Output(#[source] CovidError),
}

impl AppError {
    /// Kind name shown to users, matching the per-country failure lines.
    pub fn kind_name(&self) -> String {
        match self {
            Self::Config(_) => "ConfigError".to_string(),
            Self::Data(err) | Self::Output(err) => err.kind().to_string(),
        }
    }
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let err = AppError::Data(CovidError::load("deaths.csv", "missing"));
        assert_eq!(err.kind_name(), "LoadError");
        assert!(err.to_string().contains("deaths.csv"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let err = AppError::Config(ConfigError::from(io));
        assert_eq!(err.kind_name(), "ConfigError");
    }
}
