//! Main entry point for covid-plots.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use covid_common::init_logging;
use covid_graphs::{ChartStyle, PlottersChartSink};
use covid_plots::{prepare_config, run, Args, Outcome, EXIT_FATAL};
use tracing::{error, info};

fn main() {
    let args = Args::parse();

    let code = match try_main(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("Error: {err:#}");
            EXIT_FATAL
        }
    };
    std::process::exit(code);
}

fn try_main(args: &Args) -> Result<i32> {
    let config = prepare_config(args).context("Failed to load configuration")?;

    init_logging(&config.logging).map_err(|e| anyhow!("Failed to initialise logging: {e}"))?;
    info!("Starting covid-plots {}", env!("CARGO_PKG_VERSION"));

    let sink = PlottersChartSink::new(ChartStyle::from(&config.graph));
    let outcome = run(args, &config, &sink).map_err(|e| anyhow!("{}: {e}", e.kind_name()))?;

    match &outcome {
        Outcome::Listed(countries) => {
            for country in countries {
                println!("{country}");
            }
        }
        Outcome::Plotted(summary) => {
            for failure in &summary.failures {
                eprintln!("{failure}");
            }
            for path in &summary.written {
                println!("{}", path.display());
            }
        }
    }

    Ok(outcome.exit_code())
}
