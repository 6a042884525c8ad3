//! Net volume imbalance
//!
//! Every trade has a buyer and a seller, so raw volume says nothing about
//! direction. Scaling a session's volume by its open-to-close return leaves
//! only the unmatched part: positive for buying pressure, negative for
//! selling pressure.

use crate::momentum::Bar;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Net imbalance of one session: `volume × (close − open) / open`
pub fn daily_imbalance(bar: &Bar) -> f64 {
    if bar.open > 0.0 {
        bar.volume as f64 * (bar.close - bar.open) / bar.open
    } else {
        0.0
    }
}

/// Net imbalance summed over sessions
pub fn net_volume(bars: &[Bar]) -> f64 {
    bars.iter().map(daily_imbalance).sum()
}

/// Net imbalance of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    pub year: i32,
    pub month: u32,
    pub net_volume: f64,
}

impl MonthlyFlow {
    /// Month name and year, e.g. "March 2024"
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{}-{:02}", self.year, self.month))
    }
}

/// Net imbalance per calendar month, oldest first
///
/// Expects chronologically ordered bars.
pub fn monthly_net_volume(bars: &[Bar]) -> Vec<MonthlyFlow> {
    let mut months: Vec<MonthlyFlow> = Vec::new();

    for bar in bars {
        let (year, month) = (bar.date.year(), bar.date.month());
        match months.last_mut() {
            Some(last) if last.year == year && last.month == month => {
                last.net_volume += daily_imbalance(bar);
            }
            _ => months.push(MonthlyFlow {
                year,
                month,
                net_volume: daily_imbalance(bar),
            }),
        }
    }

    months
}

/// Window reported by the volume command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumePeriod {
    /// Latest session only
    Today,
    /// Sessions in the last seven calendar days
    Week,
    /// Monthly breakdown of the last year
    Year,
    /// All of the above
    All,
}

impl VolumePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumePeriod::Today => "1d",
            VolumePeriod::Week => "7d",
            VolumePeriod::Year => "1y",
            VolumePeriod::All => "all",
        }
    }
}

impl fmt::Display for VolumePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VolumePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(VolumePeriod::Today),
            "7d" => Ok(VolumePeriod::Week),
            "1y" => Ok(VolumePeriod::Year),
            "all" => Ok(VolumePeriod::All),
            other => Err(format!(
                "invalid period: {}. Use '1d', '7d', '1y', or 'all'",
                other
            )),
        }
    }
}

/// Net imbalance figures for the requested period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolumeSummary {
    pub today: Option<f64>,
    pub week: Option<f64>,
    pub monthly: Vec<MonthlyFlow>,
}

/// Summarize a one-year history for `period`
pub fn volume_summary(bars: &[Bar], period: VolumePeriod) -> VolumeSummary {
    let Some(latest) = bars.last() else {
        return VolumeSummary::default();
    };

    let want_today = matches!(period, VolumePeriod::Today | VolumePeriod::All);
    let want_week = matches!(period, VolumePeriod::Week | VolumePeriod::All);
    let want_year = matches!(period, VolumePeriod::Year | VolumePeriod::All);

    let week_start = latest.date - Duration::days(7);

    VolumeSummary {
        today: want_today.then(|| daily_imbalance(latest)),
        week: want_week.then(|| {
            bars.iter()
                .filter(|b| b.date > week_start)
                .map(daily_imbalance)
                .sum()
        }),
        monthly: if want_year {
            monthly_net_volume(bars)
        } else {
            Vec::new()
        },
    }
}
