//! Custom validation functions used by the configuration schema

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;
use validator::ValidationError;

/// Validate a `#RRGGBB` hex color code
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_hex_color"))
    }
}

/// Validate a chrono date format string by round-tripping a known date through it
pub fn validate_date_format(format: &str) -> Result<(), ValidationError> {
    if format.trim().is_empty() {
        return Err(ValidationError::new("empty_date_format"));
    }

    let probe = NaiveDate::from_ymd_opt(2020, 11, 23).ok_or_else(|| ValidationError::new("probe_date"))?;
    let mut rendered = String::new();
    // chrono reports unknown specifiers through fmt::Error instead of panicking
    if std::fmt::write(&mut rendered, format_args!("{}", probe.format(format))).is_err() {
        return Err(ValidationError::new("invalid_date_format"));
    }

    match NaiveDate::parse_from_str(&rendered, format) {
        Ok(parsed) if parsed == probe => Ok(()),
        _ => Err(ValidationError::new("date_format_not_round_trippable")),
    }
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon stays allowed for Windows drive letters
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

/// Validate a log filter the way the subscriber will parse it
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if level.trim().is_empty() || EnvFilter::try_new(level).is_err() {
        return Err(ValidationError::new("invalid_log_level"));
    }
    Ok(())
}
