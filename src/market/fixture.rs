//! Offline market data source
//!
//! Serves securities from memory or from a JSON file. Used by the CLI's
//! `--fixture` mode and throughout the test suite.

use super::{lookback_span, normalize_bars, out_of_range, DataError, MarketData, Symbol};
use crate::momentum::Bar;
use async_trait::async_trait;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// One security as stored in a fixture file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityFixture {
    /// Shares outstanding; absent means the provider has no figure
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
    /// Quoted price; defaults to the last close
    #[serde(default)]
    pub current_price: Option<f64>,
    /// Daily bars, any order
    #[serde(default)]
    pub bars: Vec<Bar>,
}

/// In-memory [`MarketData`] implementation
#[derive(Debug, Clone, Default)]
pub struct FixtureMarketData {
    securities: HashMap<Symbol, SecurityFixture>,
    latency: Option<std::time::Duration>,
}

impl FixtureMarketData {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a security
    pub fn with_security(mut self, symbol: Symbol, fixture: SecurityFixture) -> Self {
        self.securities.insert(symbol, fixture);
        self
    }

    /// Delay every fetch, to exercise timeouts
    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Load securities from a JSON object keyed by ticker
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse securities from a JSON object keyed by ticker
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let raw: BTreeMap<String, SecurityFixture> = serde_json::from_str(content)?;

        let mut source = Self::new();
        for (ticker, fixture) in raw {
            let symbol = Symbol::parse(&ticker)
                .map_err(|e| anyhow::anyhow!("Invalid fixture symbol {:?}: {}", ticker, e))?;
            source = source.with_security(symbol, fixture);
        }

        tracing::debug!(securities = source.securities.len(), "Loaded market data fixture");
        Ok(source)
    }

    /// Number of securities held
    pub fn len(&self) -> usize {
        self.securities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }

    async fn lookup(&self, symbol: &Symbol) -> Result<&SecurityFixture, DataError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.securities
            .get(symbol)
            .ok_or_else(|| DataError::UnknownSymbol(symbol.to_string()))
    }

    fn sorted_bars(fixture: &SecurityFixture) -> Vec<Bar> {
        normalize_bars(fixture.bars.clone())
    }
}

#[async_trait]
impl MarketData for FixtureMarketData {
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        lookback_years: u32,
    ) -> Result<Vec<Bar>, DataError> {
        let fixture = self.lookup(symbol).await?;
        let bars = Self::sorted_bars(fixture);

        let Some(last) = bars.last() else {
            return Err(DataError::unavailable(format!("no bars for {}", symbol)));
        };

        let span = lookback_span(lookback_years)?;
        let cutoff = last.date.checked_sub_signed(span).ok_or_else(|| out_of_range(span))?;
        Ok(bars.into_iter().filter(|b| b.date > cutoff).collect())
    }

    async fn fetch_shares_outstanding(&self, symbol: &Symbol) -> Result<f64, DataError> {
        self.lookup(symbol)
            .await?
            .shares_outstanding
            .ok_or_else(|| DataError::unavailable(format!("no shares outstanding for {}", symbol)))
    }

    async fn fetch_current_price(&self, symbol: &Symbol) -> Result<f64, DataError> {
        let fixture = self.lookup(symbol).await?;
        fixture
            .current_price
            .or_else(|| Self::sorted_bars(fixture).last().map(|b| b.close))
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| DataError::unavailable(format!("no price for {}", symbol)))
    }

    async fn fetch_price_at(&self, symbol: &Symbol, past: Duration) -> Result<f64, DataError> {
        let fixture = self.lookup(symbol).await?;
        let bars = Self::sorted_bars(fixture);

        let Some(last) = bars.last() else {
            return Err(DataError::unavailable(format!("no bars for {}", symbol)));
        };

        let target = last.date.checked_sub_signed(past).ok_or_else(|| out_of_range(past))?;
        bars.iter()
            .rev()
            .find(|b| b.date <= target)
            .map(|b| b.close)
            .ok_or_else(|| {
                DataError::unavailable(format!("no price for {} on or before {}", symbol, target))
            })
    }
}
