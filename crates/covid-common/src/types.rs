//! Metric identifiers and metric subset selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reported quantity carried by one input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Metric; 3] = [Metric::Confirmed, Metric::Deaths, Metric::Recovered];

    /// Single-letter flag used on the command line and in output file names.
    pub fn flag(self) -> char {
        match self {
            Metric::Confirmed => 'c',
            Metric::Deaths => 'd',
            Metric::Recovered => 'r',
        }
    }

    /// Lowercase noun used in log lines and chart subtitles.
    pub fn noun(self) -> &'static str {
        match self {
            Metric::Confirmed => "cases",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recoveries",
        }
    }

    /// Series label for the daily panel.
    pub fn daily_label(self) -> &'static str {
        match self {
            Metric::Confirmed => "Daily Confirmed Cases",
            Metric::Deaths => "Daily Deaths",
            Metric::Recovered => "Daily Recoveries",
        }
    }

    /// Series label for the cumulative panel.
    pub fn total_label(self) -> &'static str {
        match self {
            Metric::Confirmed => "Total Confirmed Cases",
            Metric::Deaths => "Total Deaths",
            Metric::Recovered => "Total Recoveries",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Confirmed => "confirmed",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
        };
        f.write_str(name)
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "confirmed" | "cases" => Ok(Metric::Confirmed),
            "d" | "deaths" => Ok(Metric::Deaths),
            "r" | "recovered" | "recoveries" => Ok(Metric::Recovered),
            other => Err(format!("unknown metric '{other}'")),
        }
    }
}

/// Subset of metrics processed in one invocation.
///
/// An empty request means "everything", so a selection built through
/// [`MetricSelection::from_flags`] is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricSelection {
    pub confirmed: bool,
    pub deaths: bool,
    pub recovered: bool,
}

impl MetricSelection {
    /// Every metric selected.
    pub const fn all() -> Self {
        Self {
            confirmed: true,
            deaths: true,
            recovered: true,
        }
    }

    /// Builds a selection from the `-c`/`-d`/`-r` flags; no flag selects all.
    pub fn from_flags(confirmed: bool, deaths: bool, recovered: bool) -> Self {
        if !confirmed && !deaths && !recovered {
            Self::all()
        } else {
            Self {
                confirmed,
                deaths,
                recovered,
            }
        }
    }

    pub fn contains(&self, metric: Metric) -> bool {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
        }
    }

    /// Selected metrics in confirmed/deaths/recovered order.
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::ALL.into_iter().filter(move |m| self.contains(*m))
    }

    pub fn len(&self) -> usize {
        self.metrics().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flag letters of the selected metrics, e.g. `"cd"`.
    pub fn suffix(&self) -> String {
        self.metrics().map(Metric::flag).collect()
    }
}

impl Default for MetricSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for MetricSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.metrics().map(|m| m.to_string()).collect();
        write!(f, "{}", names.join(","))
    }
}
