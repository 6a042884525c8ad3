//! Property tests for the recurrence and the batch ordering

use chrono::{Duration, NaiveDate};
use momentum_price::momentum::{compute_momentum_series, Bar};
use momentum_price::ranker::{order_records, Comparison, ComparisonRecord, FailureKind, SymbolFailure};
use proptest::prelude::*;

fn bars(closes: &[f64], volumes: &[u64]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (c, v))| Bar::new(start + Duration::days(i as i64), *c, *v))
        .collect()
}

proptest! {
    #[test]
    fn flat_prices_keep_momentum_at_close(
        close in 0.01f64..10_000.0,
        volumes in prop::collection::vec(0u64..1_000_000_000, 2..200),
        shares in 1.0f64..1e10,
    ) {
        let closes = vec![close; volumes.len()];
        let series = compute_momentum_series(&bars(&closes, &volumes), shares).unwrap();
        for point in series.iter_with_seed() {
            prop_assert_eq!(point.momentum_price, close);
        }
    }

    #[test]
    fn zero_volume_keeps_momentum_at_seed(
        closes in prop::collection::vec(0.01f64..10_000.0, 2..100),
        shares in 1.0f64..1e10,
    ) {
        let volumes = vec![0u64; closes.len()];
        let series = compute_momentum_series(&bars(&closes, &volumes), shares).unwrap();
        prop_assert_eq!(series.final_price(), closes[0]);
    }

    #[test]
    fn series_has_one_point_per_step(
        closes in prop::collection::vec(0.01f64..10_000.0, 2..100),
    ) {
        let volumes = vec![1_000u64; closes.len()];
        let series = compute_momentum_series(&bars(&closes, &volumes), 1e6).unwrap();
        prop_assert_eq!(series.points.len(), closes.len() - 1);
    }

    #[test]
    fn ranked_records_sorted_then_failures_in_input_order(
        entries in prop::collection::vec((-500.0f64..500.0, any::<bool>()), 0..40),
    ) {
        let records: Vec<(usize, ComparisonRecord)> = entries
            .iter()
            .enumerate()
            .map(|(i, (pct, ok))| {
                let symbol = format!("S{:03}", i);
                let record = if *ok {
                    ComparisonRecord::ranked(symbol, Comparison {
                        momentum_price: *pct,
                        current_price: 100.0,
                        momentum_pct: *pct,
                        one_year_change_pct: None,
                    })
                } else {
                    ComparisonRecord::failed(symbol, SymbolFailure::new(FailureKind::UnknownSymbol, "unknown"))
                };
                (i, record)
            })
            .rev()
            .collect();

        let ordered = order_records(records);
        prop_assert_eq!(ordered.len(), entries.len());

        let split = ordered.iter().position(|r| !r.is_ranked()).unwrap_or(ordered.len());
        prop_assert!(ordered[split..].iter().all(|r| !r.is_ranked()));

        for pair in ordered[..split].windows(2) {
            let (a, b) = (pair[0].comparison().unwrap(), pair[1].comparison().unwrap());
            prop_assert!(a.momentum_pct > b.momentum_pct
                || (a.momentum_pct == b.momentum_pct && pair[0].symbol < pair[1].symbol));
        }
        for pair in ordered[split..].windows(2) {
            prop_assert!(pair[0].symbol < pair[1].symbol);
        }
    }
}
