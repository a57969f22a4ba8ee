//! In-memory form of one per-region input table

use crate::series::Count;
use covid_common::Metric;

/// One region row: identifying labels plus one observation per date column.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRow {
    pub province: Option<String>,
    pub country: String,
    pub observations: Vec<Count>,
}

/// A whole metric table as read from its source.
///
/// Rows keep source order; `country` labels are not unique.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub metric: Metric,
    pub source_id: String,
    pub metadata_headers: Vec<String>,
    pub date_labels: Vec<String>,
    pub rows: Vec<RegionRow>,
}

impl RawTable {
    pub fn observation_count(&self) -> usize {
        self.date_labels.len()
    }

    /// Rows whose country label equals `country` exactly.
    pub fn rows_for<'a>(&'a self, country: &'a str) -> impl Iterator<Item = &'a RegionRow> + 'a {
        self.rows.iter().filter(move |row| row.country == country)
    }
}
