//! Test utilities and shared fixtures for the covid-plots workspace.
//!
//! Enabled for other crates through the `testing` feature.

use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests; safe to call from every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// One region row of a fixture table.
#[derive(Debug, Clone)]
pub struct FixtureRow {
    pub province: Option<String>,
    pub country: String,
    pub values: Vec<i64>,
}

impl FixtureRow {
    pub fn new(country: &str, values: &[i64]) -> Self {
        Self {
            province: None,
            country: country.to_string(),
            values: values.to_vec(),
        }
    }

    pub fn with_province(province: &str, country: &str, values: &[i64]) -> Self {
        Self {
            province: Some(province.to_string()),
            country: country.to_string(),
            values: values.to_vec(),
        }
    }
}

/// Renders a table in the `Province/State,Country/Region,Lat,Long,<dates...>` layout.
pub fn time_series_csv(date_labels: &[&str], rows: &[FixtureRow]) -> String {
    let mut out = String::from("Province/State,Country/Region,Lat,Long");
    for label in date_labels {
        out.push(',');
        out.push_str(label);
    }
    out.push('\n');

    for row in rows {
        let province = row.province.as_deref().unwrap_or("");
        out.push_str(&quote(province));
        out.push(',');
        out.push_str(&quote(&row.country));
        out.push_str(",0.0,0.0");
        for value in &row.values {
            out.push(',');
            out.push_str(&value.to_string());
        }
        out.push('\n');
    }
    out
}

/// Writes a fixture table into `dir` and returns its path.
pub fn write_time_series_csv(
    dir: &Path,
    file_name: &str,
    date_labels: &[&str],
    rows: &[FixtureRow],
) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, time_series_csv(date_labels, rows)).expect("Failed to write fixture CSV");
    path
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

fn quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_series_csv_layout() {
        let csv = time_series_csv(
            &["1/22/20", "1/23/20"],
            &[
                FixtureRow::new("Testland", &[0, 3]),
                FixtureRow::with_province("North", "Korea, South", &[1, 2]),
            ],
        );
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20");
        assert_eq!(lines[1], ",Testland,0.0,0.0,0,3");
        assert_eq!(lines[2], "North,\"Korea, South\",0.0,0.0,1,2");
    }
}
