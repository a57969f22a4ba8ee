//! Region-to-country aggregation

use crate::series::Count;
use crate::table::RawTable;
use covid_common::{CovidError, Result};
use std::collections::HashSet;
use tracing::debug;

/// Element-wise sum of every row of `table` whose country label equals `country`.
///
/// Matching is exact (case-sensitive, no aliases). Returns `UnknownCountry`
/// for the table's metric when nothing matches, and a load error naming the
/// country and date column when a total leaves the `Count` range.
pub fn aggregate_country(table: &RawTable, country: &str) -> Result<Vec<Count>> {
    let mut totals: Vec<Count> = vec![0; table.observation_count()];
    let mut matched = 0_usize;

    for row in table.rows_for(country) {
        matched += 1;
        for (column, (total, value)) in totals.iter_mut().zip(&row.observations).enumerate() {
            *total = total.checked_add(*value).ok_or_else(|| {
                let label = table.date_labels.get(column).map_or("?", String::as_str);
                CovidError::load(
                    &table.source_id,
                    format!("total for '{country}' overflows at column '{label}'"),
                )
            })?;
        }
    }

    if matched == 0 {
        return Err(CovidError::unknown_country(country, table.metric));
    }

    debug!(
        "Aggregated {} {} rows for {}",
        matched, table.metric, country
    );
    Ok(totals)
}

/// Distinct country labels in first-seen order.
pub fn countries(table: &RawTable) -> Vec<&str> {
    let mut seen = HashSet::new();
    table
        .rows
        .iter()
        .map(|row| row.country.as_str())
        .filter(|country| seen.insert(*country))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RegionRow;
    use covid_common::{ErrorKind, Metric};
    use proptest::prelude::*;

    fn row(province: Option<&str>, country: &str, observations: &[Count]) -> RegionRow {
        RegionRow {
            province: province.map(str::to_string),
            country: country.to_string(),
            observations: observations.to_vec(),
        }
    }

    fn table(rows: Vec<RegionRow>) -> RawTable {
        let width = rows.first().map_or(0, |r| r.observations.len());
        RawTable {
            metric: Metric::Confirmed,
            source_id: "memory".to_string(),
            metadata_headers: vec![
                "Province/State".into(),
                "Country/Region".into(),
                "Lat".into(),
                "Long".into(),
            ],
            date_labels: (0..width).map(|i| format!("1/{}/20", i + 1)).collect(),
            rows,
        }
    }

    #[test]
    fn test_sums_all_regions_of_a_country() {
        let t = table(vec![
            row(Some("Australian Capital Territory"), "Australia", &[1, 2, 3]),
            row(None, "Austria", &[10, 10, 10]),
            row(Some("New South Wales"), "Australia", &[4, 5, 6]),
        ]);
        assert_eq!(aggregate_country(&t, "Australia").unwrap(), vec![5, 7, 9]);
        assert_eq!(aggregate_country(&t, "Austria").unwrap(), vec![10, 10, 10]);
    }

    #[test]
    fn test_unknown_country_names_metric() {
        let t = table(vec![row(None, "Germany", &[1])]);
        let err = aggregate_country(&t, "germany").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownCountry);
        match err {
            CovidError::UnknownCountry { country, metric } => {
                assert_eq!(country, "germany");
                assert_eq!(metric, Metric::Confirmed);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_large_totals_do_not_overflow() {
        let big = 900_000_000;
        let t = table(vec![
            row(Some("a"), "World", &[big]),
            row(Some("b"), "World", &[big]),
            row(Some("c"), "World", &[big]),
        ]);
        assert_eq!(aggregate_country(&t, "World").unwrap(), vec![3 * big]);
    }

    #[test]
    fn test_overflowing_total_is_load_error() {
        let huge = 5_000_000_000_000_000_000;
        let t = table(vec![
            row(Some("a"), "X", &[0, huge]),
            row(Some("b"), "X", &[0, huge]),
        ]);
        let err = aggregate_country(&t, "X").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
        let message = err.to_string();
        assert!(message.contains("'X'"), "{message}");
        assert!(message.contains("'1/2/20'"), "{message}");

        let t = table(vec![
            row(Some("a"), "Y", &[Count::MIN]),
            row(Some("b"), "Y", &[-1]),
        ]);
        assert_eq!(aggregate_country(&t, "Y").unwrap_err().kind(), ErrorKind::Load);
    }

    #[test]
    fn test_countries_first_seen_order() {
        let t = table(vec![
            row(Some("x"), "France", &[0]),
            row(None, "Chad", &[0]),
            row(Some("y"), "France", &[0]),
        ]);
        assert_eq!(countries(&t), vec!["France", "Chad"]);
    }

    proptest! {
        #[test]
        fn prop_region_order_does_not_change_total(
            values in prop::collection::vec(prop::collection::vec(0_i64..1_000_000, 5), 1..8),
            rotation in 0_usize..8,
        ) {
            let rows: Vec<RegionRow> = values.iter().map(|v| row(None, "Testland", v)).collect();
            let mut rotated = rows.clone();
            let len = rotated.len();
            rotated.rotate_left(rotation % len);
            rotated.reverse();

            let forward = aggregate_country(&table(rows), "Testland").unwrap();
            let shuffled = aggregate_country(&table(rotated), "Testland").unwrap();
            prop_assert_eq!(forward, shuffled);
        }
    }
}
