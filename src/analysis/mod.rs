//! Price history analysis
//!
//! Companion figures for the momentum price: how the quoted price moved over
//! the last day, week and year, and the net buying or selling pressure
//! implied by intraday moves.

mod changes;
mod volume;

pub use changes::{price_changes, PriceChange, PriceChanges};
pub use volume::{
    daily_imbalance, monthly_net_volume, net_volume, volume_summary, MonthlyFlow, VolumePeriod,
    VolumeSummary,
};
