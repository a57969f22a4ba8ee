//! Cross-metric alignment on a shared date axis

use crate::series::{Count, DateAxis, DatedSeries};
use chrono::NaiveDate;
use covid_common::{CovidError, Result};
use std::collections::HashMap;

/// Several series re-indexed onto the dates they all share.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedView {
    axis: DateAxis,
    columns: Vec<Vec<Count>>,
}

impl CombinedView {
    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    /// Values of the `index`-th input series on the shared axis.
    pub fn column(&self, index: usize) -> Option<&[Count]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// The `index`-th input series as its own dated series.
    pub fn series(&self, index: usize) -> Option<DatedSeries<Count>> {
        let values = self.columns.get(index)?.clone();
        DatedSeries::new(self.axis.clone(), values).ok()
    }

    /// `numerator / denominator * 100` per date, 0 where the denominator is 0.
    pub fn ratio(&self, numerator: usize, denominator: usize) -> Result<DatedSeries<f64>> {
        let (num, den) = match (self.column(numerator), self.column(denominator)) {
            (Some(num), Some(den)) => (num, den),
            _ => {
                return Err(CovidError::validation(format!(
                    "ratio columns {numerator}/{denominator} out of range for {} series",
                    self.columns.len()
                )))
            }
        };
        DatedSeries::new(self.axis.clone(), percentage_ratio(num, den))
    }
}

/// Inner join of two or more series on their dates.
///
/// The shared axis follows the first series' order; each input is re-indexed
/// onto it. Fails with `EmptyIntersection` when no date is common to all.
pub fn align(series: &[&DatedSeries<Count>]) -> Result<CombinedView> {
    let Some((first, rest)) = series.split_first() else {
        return Err(CovidError::validation("align needs at least two series"));
    };
    if rest.is_empty() {
        return Err(CovidError::validation("align needs at least two series"));
    }

    let axis = first.axis().intersection(rest.iter().map(|s| s.axis()));
    if axis.is_empty() {
        return Err(CovidError::empty_intersection(series.len()));
    }

    let columns = series
        .iter()
        .map(|s| {
            let by_date: HashMap<NaiveDate, Count> = s.points().map(|(d, v)| (d, *v)).collect();
            axis.dates()
                .iter()
                .map(|d| by_date.get(d).copied().unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(CombinedView { axis, columns })
}

/// Element-wise `numerator / denominator * 100`; a zero denominator yields exactly 0.
pub fn percentage_ratio(numerator: &[Count], denominator: &[Count]) -> Vec<f64> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(&n, &d)| {
            if d == 0 {
                0.0
            } else {
                n as f64 / d as f64 * 100.0
            }
        })
        .collect()
}
