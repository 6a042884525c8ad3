//! Price changes over fixed session offsets

use crate::momentum::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sessions back for the "one week" comparison
const WEEK_SESSIONS: usize = 5;

/// Minimum sessions before the first bar counts as "one year ago"
const YEAR_MIN_SESSIONS: usize = 200;

/// A past close and the move from it to the latest close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub date: NaiveDate,
    pub price: f64,
    /// Percentage move from `price` to the latest close
    pub change_pct: f64,
}

impl PriceChange {
    /// `None` when the past close cannot serve as a base
    fn from_bar(past: &Bar, latest_close: f64) -> Option<Self> {
        if !(past.close.is_finite() && past.close > 0.0) {
            return None;
        }
        Some(Self {
            date: past.date,
            price: past.close,
            change_pct: (latest_close - past.close) / past.close * 100.0,
        })
    }

    pub fn is_up(&self) -> bool {
        self.change_pct >= 0.0
    }
}

/// Latest close with its one day, one week and one year comparisons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChanges {
    pub date: NaiveDate,
    pub price: f64,
    pub one_day: Option<PriceChange>,
    pub one_week: Option<PriceChange>,
    pub one_year: Option<PriceChange>,
}

/// Compare the latest close of a one-year history against earlier sessions
///
/// Returns `None` for an empty history. Each comparison is `None` when the
/// history is too short for it or its past close is not positive.
pub fn price_changes(bars: &[Bar]) -> Option<PriceChanges> {
    let latest = bars.last()?;
    let n = bars.len();

    let back = |sessions: usize, min_len: usize| {
        (n >= min_len)
            .then(|| PriceChange::from_bar(&bars[n - sessions], latest.close))
            .flatten()
    };

    let one_day = back(2, 2);
    let one_week = back(WEEK_SESSIONS, WEEK_SESSIONS);
    let one_year = back(n, YEAR_MIN_SESSIONS);

    Some(PriceChanges {
        date: latest.date,
        price: latest.close,
        one_day,
        one_week,
        one_year,
    })
}
