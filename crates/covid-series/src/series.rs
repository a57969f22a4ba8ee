//! Date axis and axis-paired value sequences

use chrono::NaiveDate;
use covid_common::{CovidError, Result};
use std::collections::HashSet;

/// Integer count type for observations and their sums.
pub type Count = i64;

/// Ordered calendar dates shared by one or more value sequences.
///
/// Built by the normalizer, which guarantees no duplicates; strict ordering
/// holds as long as the source columns were sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateAxis {
    dates: Vec<NaiveDate>,
}

impl DateAxis {
    pub fn new(dates: Vec<NaiveDate>) -> Self {
        Self { dates }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.dates.windows(2).all(|w| w[0] < w[1])
    }

    /// Dates of `self` that also occur in every axis of `others`, in `self`'s order.
    pub fn intersection<'a>(&self, others: impl IntoIterator<Item = &'a DateAxis>) -> DateAxis {
        let sets: Vec<HashSet<NaiveDate>> = others
            .into_iter()
            .map(|axis| axis.dates.iter().copied().collect())
            .collect();
        let dates = self
            .dates
            .iter()
            .copied()
            .filter(|d| sets.iter().all(|set| set.contains(d)))
            .collect();
        DateAxis::new(dates)
    }
}

/// A value sequence that carries its own date axis.
///
/// Axis and values are only ever constructed and consumed together, so one
/// series' dates cannot end up attached to another series' values.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedSeries<T> {
    axis: DateAxis,
    values: Vec<T>,
}

impl<T> DatedSeries<T> {
    /// Pairs an axis with values; the lengths must match.
    pub fn new(axis: DateAxis, values: Vec<T>) -> Result<Self> {
        if axis.len() != values.len() {
            return Err(CovidError::validation(format!(
                "axis has {} dates but {} values were supplied",
                axis.len(),
                values.len()
            )));
        }
        Ok(Self { axis, values })
    }

    pub fn axis(&self) -> &DateAxis {
        &self.axis
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(date, value)` pairs in axis order.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, &T)> + '_ {
        self.axis.dates.iter().copied().zip(self.values.iter())
    }

    /// Final date and its value.
    pub fn latest(&self) -> Option<(NaiveDate, &T)> {
        self.axis.last().zip(self.values.last())
    }

    /// Applies `f` to each value, keeping the axis.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> DatedSeries<U> {
        DatedSeries {
            axis: self.axis.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }

    pub fn into_parts(self) -> (DateAxis, Vec<T>) {
        (self.axis, self.values)
    }
}
