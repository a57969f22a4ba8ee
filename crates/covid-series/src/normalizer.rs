//! Column-label to date-axis normalization

use crate::series::{DateAxis, DatedSeries};
use chrono::NaiveDate;
use covid_common::{CovidError, Result};
use std::collections::HashSet;
use tracing::warn;

/// Formats tried, in order, when a label does not match the primary format.
pub const FALLBACK_FORMATS: [&str; 8] = [
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%d.%m.%Y",
    "%m-%d-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%b %d, %Y",
];

/// Parses date column labels: one primary format, then a fixed fallback list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParser {
    primary: String,
    fallbacks: Vec<String>,
}

impl DateParser {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallbacks: FALLBACK_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Parser that only accepts the primary format.
    pub fn strict(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallbacks: Vec::new(),
        }
    }

    pub fn primary_format(&self) -> &str {
        &self.primary
    }

    pub fn parse(&self, label: &str) -> Option<NaiveDate> {
        let label = label.trim();
        std::iter::once(self.primary.as_str())
            .chain(self.fallbacks.iter().map(String::as_str))
            .find_map(|format| NaiveDate::parse_from_str(label, format).ok())
    }

    /// Pairs parseable labels with their values.
    ///
    /// Unparseable labels, and labels repeating an already-seen date, are
    /// dropped together with their value. Input order is kept; nothing is
    /// re-sorted.
    pub fn normalize<T: Clone>(&self, labels: &[String], values: &[T]) -> Result<Normalized<T>> {
        if labels.len() != values.len() {
            return Err(CovidError::validation_field(
                format!(
                    "{} column labels but {} values",
                    labels.len(),
                    values.len()
                ),
                "labels",
            ));
        }

        let mut seen = HashSet::with_capacity(labels.len());
        let mut dates = Vec::with_capacity(labels.len());
        let mut kept = Vec::with_capacity(values.len());
        let mut rejected = Vec::new();

        for (label, value) in labels.iter().zip(values) {
            match self.parse(label) {
                Some(date) if seen.insert(date) => {
                    dates.push(date);
                    kept.push(value.clone());
                }
                Some(date) => {
                    warn!("Dropping column '{}': date {} already on the axis", label, date);
                    rejected.push(CovidError::date_parse(label.as_str()));
                }
                None => {
                    warn!("Dropping column '{}': not a recognised date", label);
                    rejected.push(CovidError::date_parse(label.as_str()));
                }
            }
        }

        let series = DatedSeries::new(DateAxis::new(dates), kept)?;
        Ok(Normalized { series, rejected })
    }
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new("%m/%d/%y")
    }
}

/// Result of normalizing one labelled sequence.
#[derive(Debug)]
pub struct Normalized<T> {
    pub series: DatedSeries<T>,
    /// One `DateParse` event per dropped label, in input order.
    pub rejected: Vec<CovidError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_primary_format() {
        let parser = DateParser::default();
        assert_eq!(parser.parse("1/22/20"), NaiveDate::from_ymd_opt(2020, 1, 22));
        assert_eq!(parser.parse(" 12/31/21 "), NaiveDate::from_ymd_opt(2021, 12, 31));
    }

    #[test]
    fn test_fallback_formats() {
        let parser = DateParser::default();
        assert_eq!(parser.parse("2020-03-01"), NaiveDate::from_ymd_opt(2020, 3, 1));
        assert_eq!(parser.parse("01.03.2020"), NaiveDate::from_ymd_opt(2020, 3, 1));
        assert_eq!(parser.parse("March 1, 2020"), NaiveDate::from_ymd_opt(2020, 3, 1));
        assert_eq!(parser.parse("1 Mar 2020"), NaiveDate::from_ymd_opt(2020, 3, 1));
        assert_eq!(parser.parse("not a date"), None);
        assert_eq!(parser.parse("2/30/20"), None);
    }

    #[test]
    fn test_strict_parser_has_no_fallback() {
        let parser = DateParser::strict("%m/%d/%y");
        assert_eq!(parser.parse("2020-03-01"), None);
    }

    #[test]
    fn test_malformed_labels_are_dropped_with_values() {
        let parser = DateParser::default();
        let result = parser
            .normalize(
                &labels(&["1/22/20", "garbage", "1/24/20", "13/45/20"]),
                &[1_i64, 2, 3, 4],
            )
            .unwrap();

        assert_eq!(result.series.len(), 2);
        assert_eq!(result.series.values(), &[1, 3]);
        assert!(result.series.axis().is_strictly_increasing());
        assert_eq!(result.rejected.len(), 2);
        assert!(result.rejected[0].to_string().contains("garbage"));
    }

    #[test]
    fn test_duplicate_dates_keep_first() {
        let parser = DateParser::default();
        let result = parser
            .normalize(&labels(&["3/1/20", "2020-03-01", "3/2/20"]), &[5_i64, 6, 7])
            .unwrap();
        assert_eq!(result.series.values(), &[5, 7]);
        assert_eq!(result.rejected.len(), 1);
    }

    #[test]
    fn test_unsorted_labels_are_not_reordered() {
        let parser = DateParser::default();
        let result = parser
            .normalize(&labels(&["1/23/20", "1/22/20"]), &[1_i64, 2])
            .unwrap();
        assert_eq!(result.series.values(), &[1, 2]);
        assert!(!result.series.axis().is_strictly_increasing());
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let parser = DateParser::default();
        assert!(parser.normalize(&labels(&["1/22/20"]), &[1_i64, 2]).is_err());
    }

    proptest! {
        #[test]
        fn prop_axis_length_is_n_minus_k(
            good in 1_usize..60,
            bad_positions in prop::collection::vec(0_usize..60, 0..10),
        ) {
            let start = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap();
            let mut all: Vec<String> = (0..good)
                .map(|i| (start + chrono::Duration::days(i as i64)).format("%m/%d/%y").to_string())
                .collect();
            for (n, pos) in bad_positions.iter().enumerate() {
                let at = pos % (all.len() + 1);
                all.insert(at, format!("Unnamed: {n}"));
            }
            let values: Vec<i64> = (0..all.len() as i64).collect();

            let result = DateParser::default().normalize(&all, &values).unwrap();
            prop_assert_eq!(result.series.len(), good);
            prop_assert_eq!(result.rejected.len(), bad_positions.len());
            prop_assert!(result.series.axis().is_strictly_increasing());
        }
    }
}
