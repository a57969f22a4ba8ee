//! Chart sink trait and the plotters implementation

use crate::types::ChartStyle;
use chrono::{Duration, NaiveDate};
use covid_common::{format_plain_count, CovidError, Result};
use covid_series::{Count, CountryReport, DateAxis, DatedSeries, MetricPanel};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Consumes a finished country report and writes its visual output.
pub trait ChartSink: Send + Sync {
    /// Render `report` to `path`.
    fn render(&self, report: &CountryReport, path: &Path) -> Result<()>;
}

/// `Analysis of the Impact of COVID-19 in {country}`
pub fn chart_title(country: &str) -> String {
    format!("Analysis of the Impact of COVID-19 in {country}")
}

/// Latest cumulative value of the first selected metric, e.g. `3,705,262 cases on 09 March 2023`.
pub fn chart_subtitle(report: &CountryReport) -> Option<String> {
    report.headline().map(|(metric, date, value)| {
        format!(
            "{} {} on {}",
            format_plain_count(value as f64),
            metric.noun(),
            date.format("%d %B %Y")
        )
    })
}

/// Number of x ticks for a span so they fall roughly every `interval_days`.
pub fn x_tick_count(span_days: i64, interval_days: u32) -> usize {
    let interval = i64::from(interval_days.max(1));
    let ticks = span_days.max(0) / interval + 1;
    usize::try_from(ticks).unwrap_or(usize::MAX).max(2)
}

/// Points of a series with x as days since the axis start.
fn plot_points<T: Copy + Into<f64>>(series: &DatedSeries<T>) -> Vec<(f64, f64)> {
    let Some(start) = series.axis().first() else {
        return Vec::new();
    };
    series
        .points()
        .map(|(date, value)| ((date - start).num_days() as f64, (*value).into()))
        .collect()
}

fn count_series(series: &DatedSeries<Count>) -> DatedSeries<f64> {
    series.map(|v| *v as f64)
}

fn axis_span(axis: &DateAxis) -> i64 {
    match (axis.first(), axis.last()) {
        (Some(first), Some(last)) => (last - first).num_days(),
        _ => 0,
    }
}

/// One drawable panel: a series plus how to draw it.
struct PanelPlot<'a> {
    start: Option<NaiveDate>,
    span_days: i64,
    points: Vec<(f64, f64)>,
    label: &'a str,
    color: RGBColor,
    bars: bool,
    y_format: fn(&f64) -> String,
}

impl<'a> PanelPlot<'a> {
    fn daily(panel: &MetricPanel, style: &ChartStyle) -> Self {
        Self {
            start: panel.daily.axis().first(),
            span_days: axis_span(panel.daily.axis()),
            points: plot_points(&count_series(&panel.daily)),
            label: panel.metric.daily_label(),
            color: style.palette.daily(panel.metric),
            bars: true,
            y_format: |y| format_plain_count(*y),
        }
    }

    fn total(panel: &MetricPanel, style: &ChartStyle) -> Self {
        Self {
            start: panel.cumulative.axis().first(),
            span_days: axis_span(panel.cumulative.axis()),
            points: plot_points(&count_series(&panel.cumulative)),
            label: panel.metric.total_label(),
            color: style.palette.total(panel.metric),
            bars: false,
            y_format: |y| format_plain_count(*y),
        }
    }

    fn ratio(series: &DatedSeries<f64>, style: &ChartStyle) -> Self {
        Self {
            start: series.axis().first(),
            span_days: axis_span(series.axis()),
            points: plot_points(series),
            label: "Case Fatality Ratio (%)",
            color: style.palette.ratio(),
            bars: false,
            y_format: |y| format!("{y:.2}"),
        }
    }

    fn y_max(&self) -> f64 {
        let max = self.points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
        if max <= 0.0 {
            1.0
        } else {
            max * 1.05
        }
    }
}

/// Writes PNG charts with the plotters bitmap backend.
#[derive(Debug, Clone, Default)]
pub struct PlottersChartSink {
    style: ChartStyle,
}

impl PlottersChartSink {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }
}

impl ChartSink for PlottersChartSink {
    #[instrument(skip(self, report, path), fields(country = %report.country, path = %path.display()))]
    fn render(&self, report: &CountryReport, path: &Path) -> Result<()> {
        if report.panels.is_empty() {
            return Err(CovidError::graph("No panels to render"));
        }

        let root = BitMapBackend::new(path, (self.style.width, self.style.height)).into_drawing_area();
        draw_report(&root, report, &self.style)?;
        root.present()?;

        info!("Rendered chart for {} to {}", report.country, path.display());
        Ok(())
    }
}

/// Draws the whole report onto `root`: title, subtitle, one row per metric, optional ratio row.
pub fn draw_report<DB>(root: &DrawingArea<DB, Shift>, report: &CountryReport, style: &ChartStyle) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&style.background())?;

    let title_font = (style.title_font.family.as_str(), f64::from(style.title_font.size));
    let mut body = root.titled(&chart_title(&report.country), title_font)?;
    if let Some(subtitle) = chart_subtitle(report) {
        let subtitle_font = (
            style.subtitle_font.family.as_str(),
            f64::from(style.subtitle_font.size),
        );
        body = body.titled(&subtitle, subtitle_font)?;
    }

    let rows = report.panels.len() + usize::from(report.fatality_ratio.is_some());
    let row_areas = body.split_evenly((rows, 1));
    debug!("Drawing {} chart rows for {}", rows, report.country);

    for (panel, row) in report.panels.iter().zip(&row_areas) {
        let columns = row.split_evenly((1, 2));
        draw_panel(&columns[0], &PanelPlot::daily(panel, style), style)?;
        draw_panel(&columns[1], &PanelPlot::total(panel, style), style)?;
    }

    if let (Some(ratio), Some(row)) = (&report.fatality_ratio, row_areas.last()) {
        draw_panel(row, &PanelPlot::ratio(ratio, style), style)?;
    }

    Ok(())
}

type PanelChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn panel_chart<'a, DB>(
    area: &'a DrawingArea<DB, Shift>,
    x_max: f64,
    y_max: f64,
    style: &ChartStyle,
) -> Result<PanelChart<'a, DB>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let margins = &style.margins;
    let chart = ChartBuilder::on(area)
        .margin_top(margins.top)
        .margin_right(margins.right)
        .x_label_area_size(margins.bottom)
        .y_label_area_size(margins.left)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;
    Ok(chart)
}

fn draw_panel<DB>(area: &DrawingArea<DB, Shift>, plot: &PanelPlot<'_>, style: &ChartStyle) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let x_max = plot.span_days.max(1) as f64 + 1.0;
    let y_max = plot.y_max();
    let label_font = (style.label_font.family.as_str(), f64::from(style.label_font.size));

    let mut chart = panel_chart(area, x_max, y_max, style)?;

    let start = plot.start;
    let x_format = move |x: &f64| {
        start
            .map(|s| (s + Duration::days(x.round() as i64)).format("%Y-%m").to_string())
            .unwrap_or_default()
    };

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(x_tick_count(plot.span_days, style.tick_interval_days))
        .x_label_formatter(&x_format)
        .y_label_formatter(&plot.y_format)
        .label_style(label_font);
    if let Some(grid_color) = &style.grid.color {
        mesh.light_line_style(crate::types::parse_color(grid_color));
    }
    if !style.grid.show {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let color = plot.color;
    if plot.bars {
        chart
            .draw_series(
                plot.points
                    .iter()
                    .map(|&(x, y)| Rectangle::new([(x, 0.0), (x + 0.9, y)], color.filled())),
            )?
            .label(plot.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    } else {
        chart
            .draw_series(LineSeries::new(plot.points.iter().copied(), color.stroke_width(2)))?
            .label(plot.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(label_font)
        .draw()?;

    Ok(())
}
