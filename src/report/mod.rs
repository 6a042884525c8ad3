//! Presentation formatting
//!
//! Every figure shown to a user goes through here. Values are computed in
//! `f64` and rounded once, at display time, to two decimal places with
//! midpoint-away-from-zero rounding.

mod format;
mod render;

pub use format::{
    format_price, format_shares, format_signed_pct, percentage, percentage_value, round2,
};
pub use render::{
    render_batch, render_price_changes, render_quotes, render_record, render_series,
    render_volume,
};

use thiserror::Error;

/// Formatting errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("division by zero")]
    DivisionByZero,
}
