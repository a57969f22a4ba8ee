//! Invocation orchestration: configuration, loading, batch run and rendering.

use crate::cli::Args;
use crate::error::{AppError, AppResult};
use covid_config::{Config, ConfigError, ConfigLoader};
use covid_graphs::{output_path, prepare_output_dir, ChartSink};
use covid_series::{countries, CountryFailure, CountryReport, DateParser, Datasets, Pipeline, PipelineOptions};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// At least one country produced an image.
pub const EXIT_SUCCESS: i32 = 0;
/// No country produced an image.
pub const EXIT_ALL_FAILED: i32 = 1;
/// Configuration or input tables could not be loaded.
pub const EXIT_FATAL: i32 = 2;

/// What one invocation produced.
#[derive(Debug)]
pub enum Outcome {
    /// `--list-countries`: distinct country labels of the first selected table.
    Listed(Vec<String>),
    /// Charts written and per-country failures.
    Plotted(RunSummary),
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Listed(_) => EXIT_SUCCESS,
            Self::Plotted(summary) => summary.exit_code(),
        }
    }
}

/// Images written and countries that failed, in request order.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One path per successfully rendered country.
    pub written: Vec<PathBuf>,
    /// Countries that failed in the pipeline or while rendering.
    pub failures: Vec<CountryFailure>,
}

impl RunSummary {
    /// 0 if any image was written, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.written.is_empty() {
            EXIT_ALL_FAILED
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Load configuration, then layer command line overrides and re-validate.
pub fn prepare_config(args: &Args) -> AppResult<Config> {
    let mut config = ConfigLoader::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    config.validate_all().map_err(ConfigError::from)?;
    Ok(config)
}

/// Run one invocation against `config`, rendering through `sink`.
pub fn run(args: &Args, config: &Config, sink: &dyn ChartSink) -> AppResult<Outcome> {
    let selection = args.selection();
    let options = PipelineOptions::from_config(config, selection, args.ratio);

    if args.list_countries {
        let first = selection.metrics().next().unwrap_or(covid_common::Metric::Confirmed);
        let datasets = Datasets::load(&config.data, [first]).map_err(AppError::Data)?;
        let table = datasets.table(first).map_err(AppError::Data)?;
        let names = countries(table).into_iter().map(str::to_string).collect();
        return Ok(Outcome::Listed(names));
    }

    let datasets = Datasets::load(&config.data, options.required_metrics()).map_err(AppError::Data)?;
    let output_dir = Path::new(&config.output.directory);
    prepare_output_dir(output_dir).map_err(AppError::Output)?;

    let requested = args.country_list(config);
    info!(
        "Processing {} countries for metrics {}",
        requested.len(),
        selection
    );

    let parallel = options.parallel;
    let pipeline = Pipeline::new(&datasets, DateParser::new(&config.data.date_format), options);
    let batch = pipeline.run_batch(&requested);

    let render = |report: &CountryReport| -> Result<PathBuf, CountryFailure> {
        let path = output_path(output_dir, &report.country, report.selection);
        sink.render(report, &path)
            .map(|()| path)
            .map_err(|error| CountryFailure {
                country: report.country.clone(),
                error,
            })
    };
    let rendered: Vec<Result<PathBuf, CountryFailure>> = if parallel {
        batch.reports.par_iter().map(render).collect()
    } else {
        batch.reports.iter().map(render).collect()
    };

    let mut summary = RunSummary {
        written: Vec::with_capacity(rendered.len()),
        failures: batch.failures,
    };
    for result in rendered {
        match result {
            Ok(path) => summary.written.push(path),
            Err(failure) => {
                error!("{}", failure);
                summary.failures.push(failure);
            }
        }
    }

    if summary.written.is_empty() {
        warn!("No chart was produced");
    } else {
        info!(
            "Wrote {} charts to {}",
            summary.written.len(),
            output_dir.display()
        );
    }
    Ok(Outcome::Plotted(summary))
}
