//! Dataset loading from per-region CSV tables

use crate::series::Count;
use crate::table::{RawTable, RegionRow};
use covid_common::{CovidError, Metric, Result};
use covid_config::DataConfig;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Fixed leading-column layout shared by all input tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Number of region metadata columns before the first date column
    pub metadata_columns: usize,
    /// Index of the country label among the metadata columns
    pub country_column: usize,
    /// Index of the province/state label, if the layout has one
    pub province_column: Option<usize>,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            metadata_columns: 4,
            country_column: 1,
            province_column: Some(0),
        }
    }
}

impl From<&DataConfig> for TableLayout {
    fn from(config: &DataConfig) -> Self {
        let province_column = (config.country_column != 0).then_some(0);
        Self {
            metadata_columns: config.metadata_columns,
            country_column: config.country_column,
            province_column,
        }
    }
}

/// Read one metric table from a file.
#[instrument(skip(path, layout), fields(path = %path.display()))]
pub fn load_table(path: &Path, metric: Metric, layout: TableLayout) -> Result<RawTable> {
    let source_id = path.display().to_string();
    let file = std::fs::File::open(path)
        .map_err(|e| CovidError::load_with_source(&source_id, "cannot open table", e))?;
    let table = load_table_from_reader(file, source_id, metric, layout)?;
    info!(
        "Loaded {} table: {} rows, {} date columns",
        metric,
        table.rows.len(),
        table.observation_count()
    );
    Ok(table)
}

/// Read one metric table from any CSV byte source.
pub fn load_table_from_reader<R: Read>(
    reader: R,
    source_id: impl Into<String>,
    metric: Metric,
    layout: TableLayout,
) -> Result<RawTable> {
    let source_id = source_id.into();
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| CovidError::load_with_source(&source_id, "cannot read header row", e))?
        .clone();

    if headers.len() < layout.metadata_columns {
        return Err(CovidError::load(
            &source_id,
            format!(
                "expected at least {} metadata columns, found {} columns",
                layout.metadata_columns,
                headers.len()
            ),
        ));
    }

    let metadata_headers: Vec<String> = headers
        .iter()
        .take(layout.metadata_columns)
        .map(str::to_string)
        .collect();
    let date_labels: Vec<String> = headers
        .iter()
        .skip(layout.metadata_columns)
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record = record.map_err(|e| {
            CovidError::load_with_source(&source_id, format!("malformed row at line {line}"), e)
        })?;

        let country = record
            .get(layout.country_column)
            .unwrap_or_default()
            .trim()
            .to_string();
        let province = layout
            .province_column
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let observations = record
            .iter()
            .skip(layout.metadata_columns)
            .enumerate()
            .map(|(offset, cell)| {
                parse_observation(cell).ok_or_else(|| {
                    CovidError::load(
                        &source_id,
                        format!(
                            "non-numeric value '{}' at line {line}, column '{}'",
                            cell,
                            date_labels.get(offset).map_or("?", String::as_str)
                        ),
                    )
                })
            })
            .collect::<Result<Vec<Count>>>()?;

        rows.push(RegionRow {
            province,
            country,
            observations,
        });
    }

    debug!("Parsed {} rows from {}", rows.len(), source_id);

    Ok(RawTable {
        metric,
        source_id,
        metadata_headers,
        date_labels,
        rows,
    })
}

/// Empty cells count as zero; integral floats such as `12.0` are accepted
/// when they fit in `Count`.
fn parse_observation(raw: &str) -> Option<Count> {
    // `Count::MAX as f64` rounds up to 2^63, which is itself out of range
    const UPPER: f64 = Count::MAX as f64;
    const LOWER: f64 = Count::MIN as f64;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    if let Ok(value) = trimmed.parse::<Count>() {
        return Some(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && (LOWER..UPPER).contains(&value) => Some(value as Count),
        _ => None,
    }
}

/// The metric tables of one invocation, loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    tables: BTreeMap<Metric, RawTable>,
}

impl Datasets {
    /// Load the tables for `metrics` from the configured data directory.
    pub fn load(config: &DataConfig, metrics: impl IntoIterator<Item = Metric>) -> Result<Self> {
        let layout = TableLayout::from(config);
        let mut tables = BTreeMap::new();
        for metric in metrics {
            if tables.contains_key(&metric) {
                continue;
            }
            let table = load_table(&config.path_for(metric), metric, layout)?;
            tables.insert(metric, table);
        }
        let datasets = Self { tables };
        datasets.warn_on_label_mismatch();
        Ok(datasets)
    }

    /// Assemble datasets from already-built tables.
    pub fn from_tables(tables: impl IntoIterator<Item = RawTable>) -> Self {
        let tables = tables.into_iter().map(|t| (t.metric, t)).collect();
        Self { tables }
    }

    pub fn table(&self, metric: Metric) -> Result<&RawTable> {
        self.tables.get(&metric).ok_or_else(|| {
            CovidError::load(metric.to_string(), "table was not loaded for this invocation")
        })
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.tables.contains_key(&metric)
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.tables.keys().copied()
    }

    fn warn_on_label_mismatch(&self) {
        let mut tables = self.tables.values();
        let Some(reference) = tables.next() else {
            return;
        };
        for table in tables {
            if table.date_labels != reference.date_labels {
                warn!(
                    "Date columns of the {} table ({}) differ from the {} table ({})",
                    table.metric,
                    table.date_labels.len(),
                    reference.metric,
                    reference.date_labels.len()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covid_common::test_utils::{time_series_csv, FixtureRow};
    use covid_common::ErrorKind;

    #[test]
    fn test_load_from_reader() {
        let csv = time_series_csv(
            &["1/22/20", "1/23/20", "1/24/20"],
            &[
                FixtureRow::with_province("Bavaria", "Germany", &[1, 2, 3]),
                FixtureRow::new("France", &[0, 0, 7]),
            ],
        );
        let table =
            load_table_from_reader(csv.as_bytes(), "confirmed", Metric::Confirmed, TableLayout::default())
                .unwrap();

        assert_eq!(table.metadata_headers.len(), 4);
        assert_eq!(table.date_labels, vec!["1/22/20", "1/23/20", "1/24/20"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].province.as_deref(), Some("Bavaria"));
        assert_eq!(table.rows[0].country, "Germany");
        assert_eq!(table.rows[1].province, None);
        assert_eq!(table.rows[1].observations, vec![0, 0, 7]);
    }

    #[test]
    fn test_too_few_metadata_columns() {
        let csv = "Country/Region,1/22/20\nGermany,1\n";
        let err = load_table_from_reader(csv.as_bytes(), "bad", Metric::Deaths, TableLayout::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
        assert!(err.to_string().contains("metadata columns"));
    }

    #[test]
    fn test_ragged_row_is_load_error() {
        let csv = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,Germany,0,0,1\n";
        let err = load_table_from_reader(csv.as_bytes(), "ragged", Metric::Confirmed, TableLayout::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_non_numeric_cell_names_column() {
        let csv = "Province/State,Country/Region,Lat,Long,1/22/20\n,Germany,0,0,lots\n";
        let err = load_table_from_reader(csv.as_bytes(), "words", Metric::Confirmed, TableLayout::default())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("lots"));
        assert!(message.contains("1/22/20"));
    }

    #[test]
    fn test_parse_observation() {
        assert_eq!(parse_observation("42"), Some(42));
        assert_eq!(parse_observation(" 7 "), Some(7));
        assert_eq!(parse_observation(""), Some(0));
        assert_eq!(parse_observation("12.0"), Some(12));
        assert_eq!(parse_observation("12.5"), None);
        assert_eq!(parse_observation("NaN"), None);
        assert_eq!(parse_observation("1e30"), None);
        assert_eq!(parse_observation("-1e30"), None);
        assert_eq!(parse_observation("inf"), None);
        assert_eq!(parse_observation("9223372036854775808"), None);
        assert_eq!(parse_observation("1e3"), Some(1000));
    }

    #[test]
    fn test_out_of_range_cell_is_load_error() {
        let csv = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,X,0,0,1,1e30\n";
        let err = load_table_from_reader(csv.as_bytes(), "huge", Metric::Confirmed, TableLayout::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
        let message = err.to_string();
        assert!(message.contains("'1e30'"), "{message}");
        assert!(message.contains("'1/23/20'"), "{message}");
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = load_table(
            Path::new("/nonexistent/confirmed.csv"),
            Metric::Confirmed,
            TableLayout::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_datasets_report_unloaded_metric() {
        let csv = time_series_csv(&["1/22/20"], &[FixtureRow::new("Germany", &[1])]);
        let table =
            load_table_from_reader(csv.as_bytes(), "c", Metric::Confirmed, TableLayout::default()).unwrap();
        let datasets = Datasets::from_tables([table]);

        assert!(datasets.contains(Metric::Confirmed));
        assert!(datasets.table(Metric::Confirmed).is_ok());
        assert_eq!(datasets.table(Metric::Recovered).unwrap_err().kind(), ErrorKind::Load);
    }
}
