//! Market data module
//!
//! The momentum engine never fetches anything itself. Bars, share counts and
//! quotes come through the [`MarketData`] trait; Yahoo Finance and an
//! offline fixture source implement it.

mod fixture;
mod symbol;
mod yahoo;

pub use fixture::{FixtureMarketData, SecurityFixture};
pub use symbol::{Symbol, SymbolError};
pub use yahoo::{YahooClient, YahooConfig, YAHOO_API_URL};

use crate::momentum::Bar;
use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

/// Errors returned by market data sources
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// The provider does not know the symbol
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),
    /// The provider could not supply the data (transport, rate limit, timeout)
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
    /// The provider answered with something we cannot use
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl DataError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::DataUnavailable(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }
}

/// Calendar span covering `years` of daily history
pub fn lookback_span(years: u32) -> Result<Duration, DataError> {
    Duration::try_days(365 * i64::from(years)).ok_or_else(|| {
        DataError::unavailable(format!("lookback of {} years is out of range", years))
    })
}

/// Error for a date that cannot be reached by stepping `span` through the calendar
pub(crate) fn out_of_range(span: Duration) -> DataError {
    DataError::unavailable(format!(
        "lookback of {} days is out of range",
        span.num_days()
    ))
}

/// Trait for market data sources
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Daily bars covering the last `lookback_years`, oldest first
    async fn fetch_history(&self, symbol: &Symbol, lookback_years: u32)
        -> Result<Vec<Bar>, DataError>;
    /// Shares outstanding
    async fn fetch_shares_outstanding(&self, symbol: &Symbol) -> Result<f64, DataError>;
    /// Latest quoted price
    async fn fetch_current_price(&self, symbol: &Symbol) -> Result<f64, DataError>;
    /// Closing price as of `past` ago
    async fn fetch_price_at(&self, symbol: &Symbol, past: Duration) -> Result<f64, DataError>;
}

/// Sort bars by date and drop duplicate dates, keeping the later entry
///
/// Providers occasionally repeat the current session or deliver it out of
/// order; the engine rejects such input, so sources clean it here.
pub fn normalize_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    // Stable sort keeps arrival order within a date, so the last duplicate wins
    bars.sort_by_key(|b| b.date);

    let mut normalized: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match normalized.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => normalized.push(bar),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_normalize_sorts_and_dedupes() {
        let bars = vec![
            Bar::new(day(3), 12.0, 30),
            Bar::new(day(1), 10.0, 10),
            Bar::new(day(2), 11.0, 20),
            Bar::new(day(3), 12.5, 35),
        ];

        let normalized = normalize_bars(bars);
        assert_eq!(normalized.len(), 3);
        assert_eq!(normalized[0].date, day(1));
        assert_eq!(normalized[2].date, day(3));
        assert_eq!(normalized[2].close, 12.5);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_bars(vec![]).is_empty());
    }

    #[test]
    fn test_lookback_span() {
        assert_eq!(lookback_span(3).unwrap(), Duration::days(1095));
        assert!(matches!(
            lookback_span(u32::MAX),
            Err(DataError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_data_error_display() {
        assert_eq!(
            DataError::UnknownSymbol("ZZZZ".to_string()).to_string(),
            "unknown symbol: ZZZZ"
        );
        assert_eq!(
            DataError::unavailable("timed out").to_string(),
            "data unavailable: timed out"
        );
    }
}
