//! End-to-end integration tests

use chrono::Utc;
use momentum_price::cli::AppContext;
use momentum_price::config::Config;
use momentum_price::data::ParquetReader;
use momentum_price::report::{percentage, render_batch};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const FIXTURE: &str = r#"{
    "tiny": {
        "shares_outstanding": 100.0,
        "current_price": 20.58,
        "bars": [
            { "date": "2024-01-03", "open": 10.0, "close": 9.9, "volume": 20 },
            { "date": "2024-01-01", "open": 10.0, "close": 10.0, "volume": 0 },
            { "date": "2024-01-02", "open": 10.0, "close": 11.0, "volume": 50 }
        ]
    },
    "FLAT": {
        "shares_outstanding": 1000.0,
        "bars": [
            { "date": "2024-01-01", "open": 5.0, "close": 5.0, "volume": 10 },
            { "date": "2024-01-02", "open": 5.0, "close": 5.0, "volume": 10 }
        ]
    }
}"#;

fn fixture_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();
    file
}

#[test]
fn test_config_example_loads() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example")).unwrap();
    assert_eq!(config.engine.lookback_years, 3);
    assert_eq!(config.batch.max_concurrency, 8);
    assert!(config.telemetry.metrics_port.is_none());
}

#[tokio::test]
async fn test_fixture_batch_end_to_end() {
    let file = fixture_file();
    let ctx = AppContext::new(Config::default(), Some(file.path())).unwrap();

    let report = ctx.ranker().rank(&["flat", "TINY", "MISSING"], ctx.years(None)).await;

    // TINY: 10.29 / 20.58 = 50%; FLAT: 5 / 5 = 100%
    assert_eq!(
        render_batch(&report),
        "FLAT 100.00% (1Y: N/A)\nTINY 50.00% (1Y: N/A)\nMISSING skipped: unknown symbol: MISSING"
    );
}

#[tokio::test]
async fn test_series_export_round_trip() {
    let file = fixture_file();
    let out = TempDir::new().unwrap();

    let mut config = Config::default();
    config.output.export_dir = out.path().join("exports");
    let ctx = AppContext::new(config, Some(file.path())).unwrap();

    let series = ctx.ranker().momentum_series("TINY", 3).await.unwrap();
    let writer = ctx.writer();
    let path = writer.file_path("momentum_TINY", Utc::now());
    writer.write_momentum_series(&path, "TINY", &series).unwrap();

    let rows = ParquetReader::new(&path).read_momentum_series().unwrap();
    assert_eq!(rows.len(), 3);
    assert!((rows[1].momentum_price - 10.50).abs() < 1e-9);
    assert!((rows[2].momentum_price - 10.29).abs() < 1e-9);
}

#[tokio::test]
async fn test_batch_export_row_count() {
    let file = fixture_file();
    let out = TempDir::new().unwrap();

    let mut config = Config::default();
    config.output.export_dir = out.path().to_path_buf();
    let ctx = AppContext::new(config, Some(file.path())).unwrap();

    let report = ctx.ranker().rank(&["TINY", "NOPE"], 3).await;
    let writer = ctx.writer();
    let path = writer.file_path("comparisons", Utc::now());
    writer.write_comparisons(&path, &report).unwrap();

    assert_eq!(ParquetReader::new(&path).row_count().unwrap(), 2);
}

#[test]
fn test_percentage_operation() {
    assert_eq!(percentage(156.78, 481.20).unwrap(), "32.58%");
    assert!(percentage(1.0, 0.0).is_err());
}

#[test]
fn test_missing_fixture_file() {
    assert!(AppContext::new(Config::default(), Some(std::path::Path::new("/nonexistent.json"))).is_err());
}

#[test]
fn test_fixture_quote_falls_back_to_last_close() {
    use momentum_price::market::Symbol;

    let file = fixture_file();
    let ctx = AppContext::new(Config::default(), Some(file.path())).unwrap();
    let flat = Symbol::parse("flat").unwrap();

    let price = tokio_test::block_on(ctx.source.fetch_current_price(&flat)).unwrap();
    assert_eq!(price, 5.0);
}
