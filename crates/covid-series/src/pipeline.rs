//! Per-country pipeline and failure-isolating batch runner

use crate::aggregator::aggregate_country;
use crate::aligner::align;
use crate::delta::{absorbed_revisions, daily_series};
use crate::loader::Datasets;
use crate::normalizer::DateParser;
use crate::series::{Count, DatedSeries};
use chrono::NaiveDate;
use covid_common::{CovidError, ErrorKind, Metric, MetricSelection, Result};
use covid_config::Config;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

/// What one invocation computes, independent of which tables back it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub selection: MetricSelection,
    /// Add a deaths / confirmed percentage series
    pub fatality_ratio: bool,
    /// Run batch countries on the rayon pool
    pub parallel: bool,
    /// Per-metric cap on the number of leading date columns used
    pub date_limits: BTreeMap<Metric, usize>,
}

impl PipelineOptions {
    pub fn new(selection: MetricSelection) -> Self {
        Self {
            selection,
            fatality_ratio: false,
            parallel: false,
            date_limits: BTreeMap::new(),
        }
    }

    /// Options from configuration; `fatality_ratio` is OR-ed with the config flag.
    pub fn from_config(config: &Config, selection: MetricSelection, fatality_ratio: bool) -> Self {
        let date_limits = Metric::ALL
            .into_iter()
            .filter_map(|m| config.data.date_limit_for(m).map(|limit| (m, limit)))
            .collect();
        Self {
            selection,
            fatality_ratio: fatality_ratio || config.graph.show_fatality_ratio,
            parallel: config.batch.parallel,
            date_limits,
        }
    }

    /// Tables that must be loaded to serve these options.
    pub fn required_metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| {
                self.selection.contains(*m)
                    || (self.fatality_ratio && matches!(m, Metric::Confirmed | Metric::Deaths))
            })
            .collect()
    }

    pub fn date_limit(&self, metric: Metric) -> Option<usize> {
        self.date_limits.get(&metric).copied()
    }
}

/// Cumulative and daily series of one metric for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPanel {
    pub metric: Metric,
    pub cumulative: DatedSeries<Count>,
    pub daily: DatedSeries<Count>,
}

/// Everything the chart sink needs for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryReport {
    pub country: String,
    pub selection: MetricSelection,
    /// One panel per selected metric, confirmed/deaths/recovered order
    pub panels: Vec<MetricPanel>,
    /// Deaths as a percentage of confirmed cases on the shared dates
    pub fatality_ratio: Option<DatedSeries<f64>>,
}

impl CountryReport {
    pub fn panel(&self, metric: Metric) -> Option<&MetricPanel> {
        self.panels.iter().find(|p| p.metric == metric)
    }

    /// Latest cumulative value of the first panel, for the chart subtitle.
    pub fn headline(&self) -> Option<(Metric, NaiveDate, Count)> {
        let panel = self.panels.first()?;
        let (date, value) = panel.cumulative.latest()?;
        Some((panel.metric, date, *value))
    }
}

/// A country whose run failed, with the reason.
#[derive(Debug)]
pub struct CountryFailure {
    pub country: String,
    pub error: CovidError,
}

impl CountryFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl fmt::Display for CountryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.country, self.error.kind(), self.error)
    }
}

/// Per-country results of a batch, in request order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reports: Vec<CountryReport>,
    pub failures: Vec<CountryFailure>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.reports.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when nothing succeeded (an empty batch counts as failed).
    pub fn all_failed(&self) -> bool {
        self.reports.is_empty()
    }
}

/// One parameterised pipeline over datasets loaded for this invocation.
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    datasets: &'a Datasets,
    parser: DateParser,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(datasets: &'a Datasets, parser: DateParser, options: PipelineOptions) -> Self {
        Self {
            datasets,
            parser,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Aggregate, normalize and differentiate every selected metric of `country`.
    #[instrument(skip(self), fields(selection = %self.options.selection))]
    pub fn run_country(&self, country: &str) -> Result<CountryReport> {
        let mut panels = Vec::with_capacity(self.options.selection.len());
        for metric in self.options.selection.metrics() {
            let cumulative = self.cumulative_series(country, metric)?;
            let daily = daily_series(&cumulative)?;
            panels.push(MetricPanel {
                metric,
                cumulative,
                daily,
            });
        }

        let fatality_ratio = if self.options.fatality_ratio {
            self.fatality_ratio(country, &panels)?
        } else {
            None
        };

        info!("Prepared {} panels for {}", panels.len(), country);
        Ok(CountryReport {
            country: country.to_string(),
            selection: self.options.selection,
            panels,
            fatality_ratio,
        })
    }

    /// Run every country independently; one failure never stops the others.
    pub fn run_batch(&self, countries: &[String]) -> BatchOutcome {
        let results: Vec<(String, Result<CountryReport>)> = if self.options.parallel {
            countries
                .par_iter()
                .map(|c| (c.clone(), self.run_country(c)))
                .collect()
        } else {
            countries
                .iter()
                .map(|c| (c.clone(), self.run_country(c)))
                .collect()
        };

        let mut outcome = BatchOutcome::default();
        for (country, result) in results {
            match result {
                Ok(report) => outcome.reports.push(report),
                Err(error) => {
                    let failure = CountryFailure { country, error };
                    error!("{}", failure);
                    outcome.failures.push(failure);
                }
            }
        }
        info!(
            "Batch finished: {} succeeded, {} failed",
            outcome.succeeded(),
            outcome.failed()
        );
        outcome
    }

    fn cumulative_series(&self, country: &str, metric: Metric) -> Result<DatedSeries<Count>> {
        let table = self.datasets.table(metric)?;
        let mut totals = aggregate_country(table, country)?;

        let mut labels = table.date_labels.as_slice();
        if let Some(limit) = self.options.date_limit(metric) {
            let keep = limit.min(labels.len());
            labels = &labels[..keep];
            totals.truncate(keep);
        }

        let normalized = self.parser.normalize(labels, &totals)?;
        if !normalized.rejected.is_empty() {
            debug!(
                "{} {}: {} date columns dropped",
                country,
                metric,
                normalized.rejected.len()
            );
        }
        if !normalized.series.axis().is_strictly_increasing() {
            warn!(
                "{} table columns are not in date order; axis is not strictly increasing",
                metric
            );
        }

        let absorbed = absorbed_revisions(normalized.series.values());
        if absorbed > 0 {
            debug!(
                "{} {}: {} of downward revisions clamped in the daily series",
                country, metric, absorbed
            );
        }

        Ok(normalized.series)
    }

    fn fatality_ratio(&self, country: &str, panels: &[MetricPanel]) -> Result<Option<DatedSeries<f64>>> {
        let reuse = |metric: Metric| panels.iter().find(|p| p.metric == metric).map(|p| p.cumulative.clone());
        let deaths = match reuse(Metric::Deaths) {
            Some(series) => series,
            None => self.cumulative_series(country, Metric::Deaths)?,
        };
        let confirmed = match reuse(Metric::Confirmed) {
            Some(series) => series,
            None => self.cumulative_series(country, Metric::Confirmed)?,
        };

        match align(&[&deaths, &confirmed]) {
            Ok(view) => view.ratio(0, 1).map(Some),
            Err(err) if err.kind() == ErrorKind::EmptyIntersection => {
                warn!("{}: skipping fatality ratio: {}", country, err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
