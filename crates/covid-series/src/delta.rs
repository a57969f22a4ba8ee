//! Cumulative-to-daily differencing

use crate::series::{Count, DatedSeries};
use covid_common::Result;

/// Day-over-day increase of a cumulative sequence.
///
/// `out[0]` is 0 and `out[i] = max(0, c[i] - c[i-1])`. Downward revisions in
/// the source are clamped to zero, so their magnitude is lost from the daily
/// view; [`absorbed_revisions`] reports how much was dropped. Differences
/// saturate at the `Count` bounds.
pub fn daily_from_cumulative(cumulative: &[Count]) -> Vec<Count> {
    let mut daily = Vec::with_capacity(cumulative.len());
    if cumulative.is_empty() {
        return daily;
    }
    daily.push(0);
    daily.extend(cumulative.windows(2).map(|w| w[1].saturating_sub(w[0]).max(0)));
    daily
}

/// Total size of the downward steps clamped away by [`daily_from_cumulative`].
pub fn absorbed_revisions(cumulative: &[Count]) -> Count {
    cumulative
        .windows(2)
        .map(|w| w[0].saturating_sub(w[1]).max(0))
        .fold(0, Count::saturating_add)
}

/// Daily series on the same axis as its cumulative source.
pub fn daily_series(cumulative: &DatedSeries<Count>) -> Result<DatedSeries<Count>> {
    DatedSeries::new(
        cumulative.axis().clone(),
        daily_from_cumulative(cumulative.values()),
    )
}
