//! Chart styling and layout types

use covid_common::Metric;
use covid_config::GraphSettings;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Font configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 14,
        }
    }
}

/// Panel margins, in pixels. `top` and `right` pad the plot area; `bottom`
/// and `left` size the x and y label areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginConfig {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 15,
            right: 20,
            bottom: 40,
            left: 80,
        }
    }
}

/// Grid line configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub show: bool,
    pub color: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            show: true,
            color: None,
        }
    }
}

/// Hex colors for each metric's daily bars and cumulative line, plus the ratio line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricPalette {
    pub daily_cases: String,
    pub daily_deaths: String,
    pub daily_recoveries: String,
    pub total_cases: String,
    pub total_deaths: String,
    pub total_recoveries: String,
    pub ratio: String,
}

impl Default for MetricPalette {
    fn default() -> Self {
        Self {
            daily_cases: "#800080".to_string(),
            daily_deaths: "#800080".to_string(),
            daily_recoveries: "#008000".to_string(),
            total_cases: "#0000FF".to_string(),
            total_deaths: "#FFA500".to_string(),
            total_recoveries: "#00FFFF".to_string(),
            ratio: "#FF0000".to_string(),
        }
    }
}

impl MetricPalette {
    pub fn daily(&self, metric: Metric) -> RGBColor {
        parse_color(match metric {
            Metric::Confirmed => &self.daily_cases,
            Metric::Deaths => &self.daily_deaths,
            Metric::Recovered => &self.daily_recoveries,
        })
    }

    pub fn total(&self, metric: Metric) -> RGBColor {
        parse_color(match metric {
            Metric::Confirmed => &self.total_cases,
            Metric::Deaths => &self.total_deaths,
            Metric::Recovered => &self.total_recoveries,
        })
    }

    pub fn ratio(&self) -> RGBColor {
        parse_color(&self.ratio)
    }
}

/// Everything the renderer needs to know about how a chart looks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub background_color: Option<String>,
    pub title_font: FontConfig,
    pub subtitle_font: FontConfig,
    pub label_font: FontConfig,
    pub margins: MarginConfig,
    pub grid: GridConfig,
    pub palette: MetricPalette,
    /// Approximate spacing between x-axis ticks
    pub tick_interval_days: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&GraphSettings::default())
    }
}

impl From<&GraphSettings> for ChartStyle {
    fn from(settings: &GraphSettings) -> Self {
        let font = |size: u32| FontConfig {
            family: settings.font_family.clone(),
            size,
        };
        Self {
            width: settings.width,
            height: settings.height,
            background_color: Some(settings.background_color.clone()),
            title_font: font(settings.title_font_size),
            subtitle_font: font(settings.title_font_size * 2 / 3),
            label_font: font(settings.label_font_size),
            margins: MarginConfig::default(),
            grid: GridConfig {
                show: settings.show_grid,
                color: None,
            },
            palette: MetricPalette::default(),
            tick_interval_days: settings.tick_interval_days,
        }
    }
}

impl ChartStyle {
    pub fn background(&self) -> RGBColor {
        self.background_color
            .as_deref()
            .map(parse_color)
            .unwrap_or(RGBColor(255, 255, 255))
    }
}

/// Parse a `#RRGGBB` string; anything else is black.
pub fn parse_color(color_str: &str) -> RGBColor {
    if let Some(hex) = color_str.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}
