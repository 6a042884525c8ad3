//! Momentum ranker over a market data source

use super::types::{
    BatchReport, Comparison, ComparisonRecord, FailureKind, PricingError, QuoteRecord,
    SymbolFailure,
};
use crate::market::{MarketData, Symbol, SymbolError};
use crate::momentum::{compute_momentum_series, MomentumSeries};
use crate::report::percentage_value;
use crate::telemetry::{record_batch_duration, record_symbol_outcome, SymbolOutcome};
use futures_util::stream::{self, StreamExt};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Configuration for batch ranking
#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// Symbols computed at the same time
    pub max_concurrency: usize,
    /// Budget for all fetches and computation of one symbol
    pub symbol_timeout: Duration,
    /// How far back the one-year change looks
    pub one_year_lookback: chrono::Duration,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            symbol_timeout: Duration::from_secs(30),
            one_year_lookback: chrono::Duration::days(365),
        }
    }
}

/// Computes momentum prices and ranks symbols by momentum percentage
///
/// Holds no state between calls; every symbol owns its own recurrence.
pub struct MomentumRanker {
    source: Arc<dyn MarketData>,
    config: RankerConfig,
}

impl MomentumRanker {
    /// Create a ranker over the given data source
    pub fn new(source: Arc<dyn MarketData>, config: RankerConfig) -> Self {
        Self { source, config }
    }

    /// Create a ranker with default configuration
    pub fn with_defaults(source: Arc<dyn MarketData>) -> Self {
        Self::new(source, RankerConfig::default())
    }

    /// Momentum price of one symbol
    pub async fn momentum_price(&self, symbol: &str, years: u32) -> Result<f64, PricingError> {
        self.momentum_series(symbol, years)
            .await
            .map(|series| series.final_price())
    }

    /// Full momentum series of one symbol
    pub async fn momentum_series(
        &self,
        symbol: &str,
        years: u32,
    ) -> Result<MomentumSeries, PricingError> {
        let symbol = Symbol::parse(symbol)?;
        let (bars, shares) = tokio::try_join!(
            self.source.fetch_history(&symbol, years),
            self.source.fetch_shares_outstanding(&symbol),
        )?;

        let series = compute_momentum_series(&bars, shares)?;
        tracing::info!(
            %symbol,
            years,
            bars = bars.len(),
            momentum_price = series.final_price(),
            "Computed momentum price"
        );
        Ok(series)
    }

    /// Rank symbols by momentum percentage, highest first
    ///
    /// Symbols are case-insensitive and duplicates collapse to their first
    /// occurrence. Failures never abort the batch; they follow the ranked
    /// records in input order.
    pub async fn rank<S: AsRef<str>>(&self, symbols: &[S], years: u32) -> BatchReport {
        let started = Instant::now();
        let run_id = Uuid::new_v4();

        let mut pending = Vec::new();
        let mut results = Vec::new();

        for (index, (raw, parsed)) in unique_symbols(symbols).into_iter().enumerate() {
            match parsed {
                Ok(symbol) => pending.push((index, symbol)),
                Err(e) => {
                    tracing::warn!(symbol = %raw, error = %e, "Skipping invalid symbol");
                    record_symbol_outcome(SymbolOutcome::Failed);
                    results.push((index, ComparisonRecord::failed(raw, e.into())));
                }
            }
        }

        tracing::info!(%run_id, symbols = pending.len(), years, "Starting momentum batch");

        let ranker = self;
        let computed: Vec<(usize, ComparisonRecord)> = stream::iter(pending)
            .map(move |(index, symbol)| async move {
                let record = ranker.compare(symbol, years).await;
                (index, record)
            })
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;
        results.extend(computed);

        let records = order_records(results);
        let elapsed = started.elapsed();
        record_batch_duration(elapsed);

        let report = BatchReport {
            run_id,
            lookback_years: years,
            records,
        };

        tracing::info!(
            %run_id,
            ranked = report.ranked_count(),
            failed = report.failed_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Momentum batch complete"
        );

        report
    }

    /// Latest quoted price of each symbol, in input order
    ///
    /// Duplicates collapse like [`rank`](Self::rank). A symbol that cannot be
    /// quoted gets a failed record without affecting the others.
    pub async fn quote_prices<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<QuoteRecord> {
        let mut pending = Vec::new();
        let mut results = Vec::new();

        for (index, (raw, parsed)) in unique_symbols(symbols).into_iter().enumerate() {
            match parsed {
                Ok(symbol) => pending.push((index, symbol)),
                Err(e) => results.push((index, QuoteRecord::failed(raw, e.into()))),
            }
        }

        let ranker = self;
        let quoted: Vec<(usize, QuoteRecord)> = stream::iter(pending)
            .map(move |(index, symbol)| async move {
                let outcome = tokio::time::timeout(
                    ranker.config.symbol_timeout,
                    ranker.source.fetch_current_price(&symbol),
                )
                .await
                .map_err(|_| ranker.timed_out())
                .and_then(|price| price.map_err(SymbolFailure::from));

                let record = match outcome {
                    Ok(price) => QuoteRecord::quoted(symbol, price),
                    Err(failure) => {
                        tracing::warn!(%symbol, error = %failure.message, "Quote failed");
                        QuoteRecord::failed(symbol, failure)
                    }
                };
                (index, record)
            })
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;
        results.extend(quoted);

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, record)| record).collect()
    }

    fn timed_out(&self) -> SymbolFailure {
        SymbolFailure::new(
            FailureKind::DataUnavailable,
            format!(
                "timed out after {}s",
                self.config.symbol_timeout.as_secs_f64()
            ),
        )
    }

    /// Compute one symbol's record within the timeout budget
    async fn compare(&self, symbol: Symbol, years: u32) -> ComparisonRecord {
        let outcome =
            tokio::time::timeout(self.config.symbol_timeout, self.try_compare(&symbol, years))
                .await
                .unwrap_or_else(|_| Err(self.timed_out()));

        match outcome {
            Ok(comparison) => {
                record_symbol_outcome(SymbolOutcome::Ranked);
                tracing::debug!(
                    %symbol,
                    momentum_pct = comparison.momentum_pct,
                    "Ranked symbol"
                );
                ComparisonRecord::ranked(symbol, comparison)
            }
            Err(failure) => {
                record_symbol_outcome(SymbolOutcome::Failed);
                tracing::warn!(
                    %symbol,
                    kind = failure.kind.as_str(),
                    error = %failure.message,
                    "Symbol failed"
                );
                ComparisonRecord::failed(symbol, failure)
            }
        }
    }

    async fn try_compare(&self, symbol: &Symbol, years: u32) -> Result<Comparison, SymbolFailure> {
        let (bars, shares, current_price) = tokio::try_join!(
            self.source.fetch_history(symbol, years),
            self.source.fetch_shares_outstanding(symbol),
            self.source.fetch_current_price(symbol),
        )?;

        let momentum_price = compute_momentum_series(&bars, shares)?.final_price();
        let momentum_pct = percentage_value(momentum_price, current_price)?;
        let one_year_change_pct = self.one_year_change(symbol, current_price).await;

        Ok(Comparison {
            momentum_price,
            current_price,
            momentum_pct,
            one_year_change_pct,
        })
    }

    /// Percentage change against the price one year ago, if one exists
    async fn one_year_change(&self, symbol: &Symbol, current_price: f64) -> Option<f64> {
        match self
            .source
            .fetch_price_at(symbol, self.config.one_year_lookback)
            .await
        {
            Ok(past) if past > 0.0 => Some((current_price - past) / past * 100.0),
            Ok(past) => {
                tracing::debug!(%symbol, past, "Ignoring non-positive past price");
                None
            }
            Err(e) => {
                tracing::debug!(%symbol, error = %e, "No one-year price");
                None
            }
        }
    }
}

/// Trimmed symbols with case-insensitive duplicates dropped, each parsed
fn unique_symbols<S: AsRef<str>>(symbols: &[S]) -> Vec<(String, Result<Symbol, SymbolError>)> {
    let mut seen = HashSet::new();
    symbols
        .iter()
        .map(|raw| raw.as_ref().trim())
        .filter(|raw| seen.insert(raw.to_ascii_uppercase()))
        .map(|raw| (raw.to_string(), Symbol::parse(raw)))
        .collect()
}

/// Put records in batch output order
///
/// Ranked records by momentum percentage descending, ties by symbol
/// ascending; failed records after them by input index.
pub fn order_records(records: Vec<(usize, ComparisonRecord)>) -> Vec<ComparisonRecord> {
    let (mut ranked, mut failed): (Vec<_>, Vec<_>) =
        records.into_iter().partition(|(_, r)| r.is_ranked());

    ranked.sort_by(|(_, a), (_, b)| compare_ranked(a, b));
    failed.sort_by_key(|(index, _)| *index);

    ranked
        .into_iter()
        .chain(failed)
        .map(|(_, record)| record)
        .collect()
}

fn compare_ranked(a: &ComparisonRecord, b: &ComparisonRecord) -> Ordering {
    let pct = |r: &ComparisonRecord| r.comparison().map(|c| c.momentum_pct).unwrap_or(f64::MIN);
    pct(b)
        .total_cmp(&pct(a))
        .then_with(|| a.symbol.cmp(&b.symbol))
}
