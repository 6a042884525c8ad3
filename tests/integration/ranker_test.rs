//! Batch ranker integration tests

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use momentum_price::market::{DataError, FixtureMarketData, MarketData, SecurityFixture, Symbol};
use momentum_price::momentum::Bar;
use momentum_price::ranker::{FailureKind, MomentumRanker, RankerConfig};
use momentum_price::report::{render_batch, render_quotes};
use std::sync::Arc;

fn flat_security(close: f64, current_price: f64) -> SecurityFixture {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    SecurityFixture {
        shares_outstanding: Some(1_000_000.0),
        current_price: Some(current_price),
        bars: (0..30)
            .map(|i| Bar::new(start + Duration::days(i), close, 10_000))
            .collect(),
    }
}

fn sym(s: &str) -> Symbol {
    Symbol::parse(s).unwrap()
}

/// Flat histories keep the momentum price at the close, so the quoted price
/// alone decides the percentage.
fn abc_source() -> FixtureMarketData {
    FixtureMarketData::new()
        .with_security(sym("A"), flat_security(154.7, 100.0))
        .with_security(sym("B"), flat_security(87.7, 100.0))
        .with_security(sym("C"), flat_security(59.9, 100.0))
}

#[tokio::test]
async fn test_rank_orders_by_momentum_pct() {
    let ranker = MomentumRanker::with_defaults(Arc::new(abc_source()));
    let report = ranker.rank(&["C", "A", "B"], 3).await;

    let symbols: Vec<&str> = report.records.iter().map(|r| r.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["A", "B", "C"]);

    let pcts: Vec<f64> = report
        .ranked()
        .filter_map(|r| r.comparison())
        .map(|c| c.momentum_pct)
        .collect();
    assert!((pcts[0] - 154.7).abs() < 1e-9);
    assert!((pcts[1] - 87.7).abs() < 1e-9);
    assert!((pcts[2] - 59.9).abs() < 1e-9);

    assert_eq!(
        render_batch(&report),
        "A 154.70% (1Y: N/A)\nB 87.70% (1Y: N/A)\nC 59.90% (1Y: N/A)"
    );
}

#[tokio::test]
async fn test_partial_failure_isolation() {
    let source = abc_source().with_security(
        sym("NOSHARES"),
        SecurityFixture {
            shares_outstanding: None,
            ..flat_security(10.0, 10.0)
        },
    );
    let ranker = MomentumRanker::with_defaults(Arc::new(source));
    let report = ranker
        .rank(&["UNKNOWN", "A", "NOSHARES", "B", "C"], 3)
        .await;

    assert_eq!(report.ranked_count(), 3);
    assert_eq!(report.failed_count(), 2);

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed[0].symbol, "UNKNOWN");
    assert_eq!(failed[0].failure().unwrap().kind, FailureKind::UnknownSymbol);
    assert_eq!(failed[1].symbol, "NOSHARES");
    assert_eq!(
        failed[1].failure().unwrap().kind,
        FailureKind::DataUnavailable
    );

    let text = render_batch(&report);
    assert!(text.ends_with("NOSHARES skipped: data unavailable: no shares outstanding for NOSHARES"));
}

#[tokio::test]
async fn test_insufficient_history_is_a_failure() {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let source = FixtureMarketData::new().with_security(
        sym("IPO"),
        SecurityFixture {
            shares_outstanding: Some(1_000.0),
            current_price: Some(20.0),
            bars: vec![Bar::new(start, 20.0, 100)],
        },
    );
    let ranker = MomentumRanker::with_defaults(Arc::new(source));
    let report = ranker.rank(&["IPO"], 3).await;

    assert_eq!(
        report.records[0].failure().unwrap().kind,
        FailureKind::InsufficientData
    );
}

#[tokio::test]
async fn test_zero_current_price_is_unavailable() {
    let ranker = MomentumRanker::with_defaults(Arc::new(
        FixtureMarketData::new()
            .with_security(sym("ZERO"), flat_security(10.0, 0.0))
            .with_security(sym("NEG"), flat_security(10.0, -2.0)),
    ));
    let report = ranker.rank(&["ZERO", "NEG"], 3).await;

    assert_eq!(report.failed_count(), 2);
    for record in &report.records {
        assert_eq!(record.failure().unwrap().kind, FailureKind::DataUnavailable);
    }
}

/// Passes everything through but quotes every symbol at zero
struct ZeroQuote(FixtureMarketData);

#[async_trait]
impl MarketData for ZeroQuote {
    async fn fetch_history(&self, symbol: &Symbol, years: u32) -> Result<Vec<Bar>, DataError> {
        self.0.fetch_history(symbol, years).await
    }

    async fn fetch_shares_outstanding(&self, symbol: &Symbol) -> Result<f64, DataError> {
        self.0.fetch_shares_outstanding(symbol).await
    }

    async fn fetch_current_price(&self, _symbol: &Symbol) -> Result<f64, DataError> {
        Ok(0.0)
    }

    async fn fetch_price_at(&self, symbol: &Symbol, past: Duration) -> Result<f64, DataError> {
        self.0.fetch_price_at(symbol, past).await
    }
}

#[tokio::test]
async fn test_zero_quote_from_source_is_division_by_zero() {
    let ranker = MomentumRanker::with_defaults(Arc::new(ZeroQuote(abc_source())));
    let report = ranker.rank(&["A"], 3).await;

    assert_eq!(
        report.records[0].failure().unwrap().kind,
        FailureKind::DivisionByZero
    );
}

#[tokio::test]
async fn test_lookback_beyond_calendar_fails_symbol_only() {
    let source = FixtureMarketData::new().with_security(sym("A"), flat_security(10.0, 10.0));
    let ranker = MomentumRanker::with_defaults(Arc::new(source));

    for years in [300_000, u32::MAX] {
        let report = ranker.rank(&["A", "ZZZ"], years).await;
        assert_eq!(report.records.len(), 2);
        assert_eq!(
            report.records[0].failure().unwrap().kind,
            FailureKind::DataUnavailable
        );
        assert_eq!(
            report.records[1].failure().unwrap().kind,
            FailureKind::UnknownSymbol
        );
    }

    assert!(ranker.momentum_price("A", 300_000).await.is_err());
}

#[tokio::test]
async fn test_quote_prices_isolates_failures() {
    let source = abc_source()
        .with_security(sym("ZERO"), flat_security(10.0, 0.0))
        .with_security(sym("EMPTY"), SecurityFixture::default());
    let ranker = MomentumRanker::with_defaults(Arc::new(source));

    let quotes = ranker
        .quote_prices(&["c", "ZERO", "a", "ZZZ", "EMPTY", "C"])
        .await;

    assert_eq!(
        render_quotes(&quotes),
        "C $100.00\n\
         ZERO ERROR: data unavailable: no price for ZERO\n\
         A $100.00\n\
         ZZZ ERROR: unknown symbol: ZZZ\n\
         EMPTY ERROR: data unavailable: no price for EMPTY"
    );
}

#[tokio::test]
async fn test_timeout_becomes_data_unavailable() {
    let source = abc_source().with_latency(std::time::Duration::from_millis(200));
    let config = RankerConfig {
        symbol_timeout: std::time::Duration::from_millis(20),
        ..RankerConfig::default()
    };
    let ranker = MomentumRanker::new(Arc::new(source), config);
    let report = ranker.rank(&["A", "B"], 3).await;

    assert_eq!(report.ranked_count(), 0);
    for record in &report.records {
        let failure = record.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::DataUnavailable);
        assert!(failure.message.contains("timed out"));
    }
    // Input order preserved among failures
    assert_eq!(report.records[0].symbol, "A");
}

#[tokio::test]
async fn test_one_year_change_present_with_long_history() {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let bars: Vec<Bar> = (0..500)
        .map(|i| Bar::new(start + Duration::days(i), 100.0, 1_000))
        .collect();
    let source = FixtureMarketData::new().with_security(
        sym("OLD"),
        SecurityFixture {
            shares_outstanding: Some(1_000_000.0),
            current_price: Some(125.0),
            bars,
        },
    );

    let price = source.fetch_current_price(&sym("OLD")).await.unwrap();
    assert_eq!(price, 125.0);

    let ranker = MomentumRanker::with_defaults(Arc::new(source));
    let report = ranker.rank(&["OLD"], 3).await;
    let comparison = report.records[0].comparison().unwrap();

    assert!((comparison.one_year_change_pct.unwrap() - 25.0).abs() < 1e-9);
    assert!((comparison.momentum_pct - 80.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_empty_batch() {
    let ranker = MomentumRanker::with_defaults(Arc::new(FixtureMarketData::new()));
    let report = ranker.rank::<&str>(&[], 3).await;
    assert!(report.records.is_empty());
    assert_eq!(render_batch(&report), "");
}
