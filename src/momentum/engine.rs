//! Momentum recurrence
//!
//! Validates the bar series, seeds the pool from the first close and folds
//! [`MomentumState::step`] over the remaining sessions.

use super::types::{Bar, MomentumError, MomentumPoint, MomentumSeries, MomentumState};

/// Compute the full momentum series for one security
///
/// Fails instead of skipping anything: a skipped bar would desynchronize the
/// pool from calendar time.
pub fn compute_momentum_series(
    bars: &[Bar],
    shares_outstanding: f64,
) -> Result<MomentumSeries, MomentumError> {
    if !shares_outstanding.is_finite() || shares_outstanding <= 0.0 {
        return Err(MomentumError::InvalidShareCount(shares_outstanding));
    }

    if bars.len() < 2 {
        return Err(MomentumError::InsufficientData { bars: bars.len() });
    }

    validate_bars(bars)?;

    let seed_bar = &bars[0];
    let seed_state = MomentumState::seed(seed_bar.close, shares_outstanding);
    let mut state = seed_state;
    let mut points = Vec::with_capacity(bars.len() - 1);

    for window in bars.windows(2) {
        let (prev, bar) = (&window[0], &window[1]);
        state = state.step(prev.close, bar.close, bar.volume, shares_outstanding);
        points.push(MomentumPoint {
            date: bar.date,
            momentum_price: state.momentum_price,
        });
    }

    let series = MomentumSeries {
        seed: MomentumPoint {
            date: seed_bar.date,
            momentum_price: seed_state.momentum_price,
        },
        points,
    };

    tracing::debug!(
        bars = bars.len(),
        seed = series.seed.momentum_price,
        final_price = series.final_price(),
        final_pool = state.pool,
        "Computed momentum series"
    );

    Ok(series)
}

/// Final momentum price for one security
pub fn momentum_price(bars: &[Bar], shares_outstanding: f64) -> Result<f64, MomentumError> {
    compute_momentum_series(bars, shares_outstanding).map(|s| s.final_price())
}

/// Check prices and ordering before the pool is touched
fn validate_bars(bars: &[Bar]) -> Result<(), MomentumError> {
    for (index, bar) in bars.iter().enumerate() {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(MomentumError::MalformedBar {
                index,
                date: bar.date,
                reason: format!("non-positive close {}", bar.close),
            });
        }

        if !bar.open.is_finite() {
            return Err(MomentumError::MalformedBar {
                index,
                date: bar.date,
                reason: format!("non-finite open {}", bar.open),
            });
        }

        if index > 0 && bar.date <= bars[index - 1].date {
            return Err(MomentumError::UnorderedBars {
                index,
                date: bar.date,
            });
        }
    }

    Ok(())
}
