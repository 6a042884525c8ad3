//! Momentum engine types
//!
//! Bars in, a momentum series out, with the recurrence state in between.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One trading session for a security
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price (only the volume-imbalance analysis reads it)
    pub open: f64,
    /// Closing price
    pub close: f64,
    /// Shares traded
    pub volume: u64,
}

impl Bar {
    /// Create a bar whose open equals its close
    pub fn new(date: NaiveDate, close: f64, volume: u64) -> Self {
        Self {
            date,
            open: close,
            close,
            volume,
        }
    }

    /// Create a bar with a distinct opening price
    pub fn with_open(date: NaiveDate, open: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            close,
            volume,
        }
    }
}

/// Errors raised while running the momentum recurrence
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MomentumError {
    /// Fewer than two bars, so no return can be computed
    #[error("insufficient data: {bars} bar(s), need at least 2")]
    InsufficientData { bars: usize },
    /// Shares outstanding missing, zero, negative or not finite
    #[error("invalid share count: {0}")]
    InvalidShareCount(f64),
    /// A bar carries a price the recurrence cannot use
    #[error("malformed bar #{index} ({date}): {reason}")]
    MalformedBar {
        index: usize,
        date: NaiveDate,
        reason: String,
    },
    /// A bar does not come strictly after its predecessor
    #[error("bar #{index} ({date}) is not after the previous bar")]
    UnorderedBars { index: usize, date: NaiveDate },
}

/// Running state of one recurrence
///
/// A plain value: [`MomentumState::step`] returns the next state instead of
/// mutating anything shared, so each run owns its state outright.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumState {
    /// Total value in the pool
    pub pool: f64,
    /// Pool value per share
    pub momentum_price: f64,
}

impl MomentumState {
    /// Seed the pool at the first close's market cap
    pub fn seed(close: f64, shares_outstanding: f64) -> Self {
        Self {
            pool: close * shares_outstanding,
            momentum_price: close,
        }
    }

    /// Advance one session
    ///
    /// The volume flow is priced at the previous momentum price, not at the
    /// session close, which makes the recurrence path-dependent.
    pub fn step(self, prev_close: f64, close: f64, volume: u64, shares_outstanding: f64) -> Self {
        let daily_return = (close - prev_close) / prev_close;
        let net_volume_flow = volume as f64 * daily_return;
        let net_cash_flow = net_volume_flow * self.momentum_price;
        if net_cash_flow == 0.0 {
            return self;
        }

        let pool = self.pool + net_cash_flow;

        Self {
            pool,
            momentum_price: pool / shares_outstanding,
        }
    }
}

/// Momentum price on a given session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumPoint {
    pub date: NaiveDate,
    pub momentum_price: f64,
}

/// Day-by-day output of one recurrence run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSeries {
    /// Seed session; its momentum price is the seed close
    pub seed: MomentumPoint,
    /// One point per bar after the seed
    pub points: Vec<MomentumPoint>,
}

impl MomentumSeries {
    /// Momentum price after the last session
    pub fn final_price(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.momentum_price)
            .unwrap_or(self.seed.momentum_price)
    }

    /// Number of points after the seed
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Seed followed by every computed point
    pub fn iter_with_seed(&self) -> impl Iterator<Item = &MomentumPoint> {
        std::iter::once(&self.seed).chain(self.points.iter())
    }
}
