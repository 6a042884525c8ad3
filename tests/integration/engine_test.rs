//! Momentum engine integration tests

use chrono::{Duration, NaiveDate};
use momentum_price::momentum::{
    compute_momentum_series, momentum_price, Bar, MomentumError, MomentumState,
};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 3, 1).unwrap() + Duration::days(offset)
}

#[test]
fn test_worked_scenario() {
    let bars = vec![
        Bar::new(day(0), 10.00, 0),
        Bar::new(day(1), 11.00, 50),
        Bar::new(day(2), 9.90, 20),
    ];

    let series = compute_momentum_series(&bars, 100.0).unwrap();
    assert_eq!(series.seed.momentum_price, 10.00);
    assert_eq!(series.points.len(), 2);
    assert!((series.points[0].momentum_price - 10.50).abs() < 1e-9);
    assert!((series.points[1].momentum_price - 10.29).abs() < 1e-9);
    assert_eq!(series.points[1].date, day(2));

    assert!((momentum_price(&bars, 100.0).unwrap() - 10.29).abs() < 1e-9);
}

#[test]
fn test_seed_equivalence() {
    // One step: close0 + volume × (close1 − close0) × close0 / (close0 × shares)
    let (close0, close1, volume, shares) = (25.0, 27.5, 4_000u64, 10_000.0);
    let bars = vec![Bar::new(day(0), close0, 999), Bar::new(day(1), close1, volume)];

    let expected = close0 + volume as f64 * (close1 - close0) / shares;
    let actual = momentum_price(&bars, shares).unwrap();
    assert!((actual - expected).abs() < 1e-9);

    let state = MomentumState::seed(close0, shares).step(close0, close1, volume, shares);
    assert_eq!(state.momentum_price.to_bits(), actual.to_bits());
}

#[test]
fn test_determinism_over_long_history() {
    let bars: Vec<Bar> = (0..750)
        .map(|i| {
            let close = 50.0 + (i as f64 * 0.37).sin() * 5.0;
            Bar::new(day(i), close, 1_000 + (i as u64 * 7919) % 50_000)
        })
        .collect();

    let first = compute_momentum_series(&bars, 2_500_000.0).unwrap();
    let second = compute_momentum_series(&bars, 2_500_000.0).unwrap();

    assert_eq!(first.points.len(), 749);
    for (a, b) in first.points.iter().zip(&second.points) {
        assert_eq!(a.momentum_price.to_bits(), b.momentum_price.to_bits());
    }
}

#[test]
fn test_rejections() {
    assert_eq!(
        momentum_price(&[Bar::new(day(0), 10.0, 1)], 100.0),
        Err(MomentumError::InsufficientData { bars: 1 })
    );

    let bars = vec![Bar::new(day(0), 10.0, 1), Bar::new(day(1), 11.0, 1)];
    assert!(matches!(
        momentum_price(&bars, 0.0),
        Err(MomentumError::InvalidShareCount(_))
    ));
    assert!(matches!(
        momentum_price(&bars, f64::NAN),
        Err(MomentumError::InvalidShareCount(_))
    ));

    let reversed = vec![Bar::new(day(1), 10.0, 1), Bar::new(day(0), 11.0, 1)];
    assert!(matches!(
        momentum_price(&reversed, 100.0),
        Err(MomentumError::UnorderedBars { .. })
    ));
}
