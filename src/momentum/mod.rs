//! Momentum price engine
//!
//! Rolls a "betting pool" forward through a security's daily bars. Each
//! session's signed volume flow (`volume × daily return`) is converted into
//! cash at the previous momentum price and added to the pool; the pool
//! divided by shares outstanding is the momentum price.

mod engine;
mod types;

pub use engine::{compute_momentum_series, momentum_price};
pub use types::{Bar, MomentumError, MomentumPoint, MomentumSeries, MomentumState};
