//! Integration tests for the covid-plots invocation flow.

use covid_common::test_utils::{create_temp_dir, init_test_logging, write_time_series_csv, FixtureRow};
use covid_common::{CovidError, ErrorKind, Metric, Result};
use covid_config::Config;
use covid_graphs::ChartSink;
use covid_plots::{run, AppError, Args, Outcome, EXIT_ALL_FAILED, EXIT_SUCCESS};
use covid_series::CountryReport;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records what would have been drawn instead of drawing it.
#[derive(Default)]
struct RecordingSink {
    rendered: Mutex<Vec<(String, Vec<Metric>, bool, PathBuf)>>,
    fail_for: Option<String>,
}

impl RecordingSink {
    fn failing_for(country: &str) -> Self {
        Self {
            fail_for: Some(country.to_string()),
            ..Self::default()
        }
    }

    fn rendered(&self) -> Vec<(String, Vec<Metric>, bool, PathBuf)> {
        self.rendered.lock().unwrap().clone()
    }
}

impl ChartSink for RecordingSink {
    fn render(&self, report: &CountryReport, path: &Path) -> Result<()> {
        if self.fail_for.as_deref() == Some(report.country.as_str()) {
            return Err(CovidError::graph("backend unavailable"));
        }
        let metrics = report.panels.iter().map(|p| p.metric).collect();
        self.rendered.lock().unwrap().push((
            report.country.clone(),
            metrics,
            report.fatality_ratio.is_some(),
            path.to_path_buf(),
        ));
        Ok(())
    }
}

const LABELS: [&str; 4] = ["1/22/20", "1/23/20", "1/24/20", "1/25/20"];

fn setup() -> (tempfile::TempDir, Config) {
    init_test_logging();
    let dir = create_temp_dir();
    write_time_series_csv(
        dir.path(),
        "time_series_covid19_confirmed_global.csv",
        &LABELS,
        &[
            FixtureRow::new("Germany", &[1, 2, 4, 8]),
            FixtureRow::new("France", &[0, 3, 3, 9]),
            FixtureRow::new("Onlyconfirmed", &[1, 1, 1, 1]),
        ],
    );
    write_time_series_csv(
        dir.path(),
        "time_series_covid19_deaths_global.csv",
        &LABELS,
        &[
            FixtureRow::new("Germany", &[0, 0, 1, 1]),
            FixtureRow::new("France", &[0, 0, 0, 2]),
        ],
    );
    write_time_series_csv(
        dir.path(),
        "time_series_covid19_recovered_global.csv",
        &LABELS,
        &[
            FixtureRow::new("Germany", &[0, 1, 1, 3]),
            FixtureRow::new("France", &[0, 0, 1, 1]),
        ],
    );

    let mut config = Config::default();
    config.data.directory = dir.path().display().to_string();
    config.output.directory = dir.path().join("images").display().to_string();
    (dir, config)
}

fn args(list: &[&str]) -> Args {
    let mut argv = vec!["covid-plots"];
    argv.extend_from_slice(list);
    <Args as clap::Parser>::parse_from(argv)
}

#[test]
fn test_default_country_all_metrics() {
    let (dir, config) = setup();
    let sink = RecordingSink::default();

    let outcome = run(&args(&[]), &config, &sink).unwrap();
    assert_eq!(outcome.exit_code(), EXIT_SUCCESS);

    let rendered = sink.rendered();
    assert_eq!(rendered.len(), 1);
    let (country, metrics, ratio, path) = &rendered[0];
    assert_eq!(country, "Germany");
    assert_eq!(metrics, &vec![Metric::Confirmed, Metric::Deaths, Metric::Recovered]);
    assert!(!ratio);
    assert_eq!(path, &dir.path().join("images").join("Germany_cdr_plot.png"));
    assert!(dir.path().join("images").is_dir());
}

#[test]
fn test_partial_failure_keeps_other_countries() {
    let (_dir, config) = setup();
    let sink = RecordingSink::default();

    let outcome = run(
        &args(&["--countries", "Germany,Onlyconfirmed,France", "-c", "-d"]),
        &config,
        &sink,
    )
    .unwrap();

    let Outcome::Plotted(summary) = outcome else {
        panic!("expected a plotted outcome");
    };
    assert_eq!(summary.exit_code(), EXIT_SUCCESS);
    assert_eq!(summary.written.len(), 2);
    assert!(summary.written[0].ends_with("Germany_cd_plot.png"));
    assert!(summary.written[1].ends_with("France_cd_plot.png"));

    assert_eq!(summary.failures.len(), 1);
    let failure = &summary.failures[0];
    assert_eq!(failure.kind(), ErrorKind::UnknownCountry);
    assert_eq!(
        failure.to_string(),
        "Onlyconfirmed: UnknownCountryError: Country 'Onlyconfirmed' not found in the deaths table"
    );
}

#[test]
fn test_all_countries_failing_exits_one() {
    let (_dir, config) = setup();
    let sink = RecordingSink::default();

    let outcome = run(&args(&["--countries", "Atlantis,Narnia"]), &config, &sink).unwrap();
    assert_eq!(outcome.exit_code(), EXIT_ALL_FAILED);
    assert!(sink.rendered().is_empty());
}

#[test]
fn test_render_failure_is_per_country() {
    let (_dir, config) = setup();
    let sink = RecordingSink::failing_for("France");

    let outcome = run(&args(&["--countries", "France,Germany", "-c"]), &config, &sink).unwrap();
    let Outcome::Plotted(summary) = outcome else {
        panic!("expected a plotted outcome");
    };
    assert_eq!(summary.written.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].country, "France");
    assert_eq!(summary.failures[0].kind(), ErrorKind::Graph);
}

#[test]
fn test_ratio_and_parallel() {
    let (_dir, config) = setup();
    let sink = RecordingSink::default();

    let outcome = run(
        &args(&["--countries", "France,Germany", "-r", "--ratio", "--parallel"]),
        &config,
        &sink,
    )
    .unwrap();
    assert_eq!(outcome.exit_code(), EXIT_SUCCESS);

    let mut rendered = sink.rendered();
    rendered.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(rendered.len(), 2);
    for (_, metrics, ratio, path) in &rendered {
        assert_eq!(metrics, &vec![Metric::Recovered]);
        assert!(ratio);
        assert!(path.to_string_lossy().ends_with("_r_plot.png"));
    }
}

#[test]
fn test_list_countries() {
    let (_dir, config) = setup();
    let sink = RecordingSink::default();

    let outcome = run(&args(&["--list-countries", "-d"]), &config, &sink).unwrap();
    match outcome {
        Outcome::Listed(names) => assert_eq!(names, vec!["Germany", "France"]),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(sink.rendered().is_empty());
}

#[test]
fn test_missing_table_is_fatal() {
    let (dir, config) = setup();
    std::fs::remove_file(dir.path().join("time_series_covid19_deaths_global.csv")).unwrap();
    let sink = RecordingSink::default();

    let err = run(&args(&["-d"]), &config, &sink).unwrap_err();
    assert!(matches!(err, AppError::Data(_)));
    assert_eq!(err.kind_name(), "LoadError");
}
