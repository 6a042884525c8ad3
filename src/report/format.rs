//! Number formatting

use super::FormatError;
use rust_decimal::prelude::*;

/// Round to two decimal places, midpoint away from zero
///
/// `None` for values a `Decimal` cannot hold (NaN, infinities, magnitudes
/// beyond 7.9e28). Negative zero comes back as plain zero.
pub fn round2(value: f64) -> Option<Decimal> {
    let rounded = Decimal::from_f64(value)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Some(Decimal::ZERO)
    } else {
        Some(rounded)
    }
}

fn fixed2(value: f64) -> String {
    match round2(value) {
        Some(d) => format!("{:.2}", d),
        None => format!("{:.2}", value),
    }
}

/// `numerator / denominator × 100`
pub fn percentage_value(numerator: f64, denominator: f64) -> Result<f64, FormatError> {
    if denominator == 0.0 {
        return Err(FormatError::DivisionByZero);
    }
    Ok(numerator / denominator * 100.0)
}

/// `numerator` as a percentage of `denominator`, e.g. `"32.58%"`
pub fn percentage(numerator: f64, denominator: f64) -> Result<String, FormatError> {
    percentage_value(numerator, denominator).map(|pct| format!("{}%", fixed2(pct)))
}

/// Dollar amount, e.g. `"$156.78"` or `"-$3.10"`
pub fn format_price(price: f64) -> String {
    let text = fixed2(price);
    match text.strip_prefix('-') {
        Some(abs) => format!("-${}", abs),
        None => format!("${}", text),
    }
}

/// Percentage with an explicit sign, e.g. `"+12.30%"`
pub fn format_signed_pct(value: f64) -> String {
    let text = fixed2(value);
    if text.starts_with('-') {
        format!("{}%", text)
    } else {
        format!("+{}%", text)
    }
}

/// Whole share count with thousands separators and a sign, e.g. `"+1,234"`
pub fn format_shares(value: f64) -> String {
    let whole = Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_i128())
        .unwrap_or(0);

    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if whole < 0 { '-' } else { '+' };
    format!("{}{}", sign, grouped)
}
