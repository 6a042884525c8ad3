//! Text rendering for terminal output

use super::format::{format_price, format_shares, format_signed_pct, percentage};
use crate::analysis::{PriceChange, PriceChanges, VolumeSummary};
use crate::momentum::MomentumSeries;
use crate::ranker::{BatchReport, ComparisonRecord, QuoteRecord, QuoteStatus, RecordStatus};
use std::fmt::Write;

/// One batch line: `AAPL 32.58% (1Y: +12.30%)` or `ZZZ skipped: <reason>`
pub fn render_record(record: &ComparisonRecord) -> String {
    match &record.status {
        RecordStatus::Ranked(c) => {
            let pct = percentage(c.momentum_price, c.current_price)
                .unwrap_or_else(|_| "N/A".to_string());
            let one_year = c
                .one_year_change_pct
                .map(format_signed_pct)
                .unwrap_or_else(|| "N/A".to_string());
            format!("{} {} (1Y: {})", record.symbol, pct, one_year)
        }
        RecordStatus::Failed(f) => format!("{} skipped: {}", record.symbol, f.message),
    }
}

/// Batch result, one line per record in report order
pub fn render_batch(report: &BatchReport) -> String {
    report
        .records
        .iter()
        .map(render_record)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per quote: `AAPL $187.44` or `ZZZ ERROR: <reason>`
pub fn render_quotes(quotes: &[QuoteRecord]) -> String {
    quotes
        .iter()
        .map(|quote| match &quote.status {
            QuoteStatus::Quoted { price } => format!("{} {}", quote.symbol, format_price(*price)),
            QuoteStatus::Failed(f) => format!("{} ERROR: {}", quote.symbol, f.message),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Date and momentum price table, seed first
pub fn render_series(symbol: &str, series: &MomentumSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} momentum price series", symbol);
    let _ = writeln!(out, "{:<12} {:>14}", "DATE", "MOMENTUM");
    for point in series.iter_with_seed() {
        let _ = writeln!(
            out,
            "{:<12} {:>14}",
            point.date.to_string(),
            format_price(point.momentum_price)
        );
    }
    let _ = write!(out, "Final: {}", format_price(series.final_price()));
    out
}

fn arrow(up: bool) -> &'static str {
    if up {
        "↑"
    } else {
        "↓"
    }
}

fn change_line(label: &str, change: Option<&PriceChange>) -> String {
    match change {
        Some(c) => format!(
            "{}: {} {} (from {} on {})",
            label,
            format_signed_pct(c.change_pct),
            arrow(c.is_up()),
            format_price(c.price),
            c.date
        ),
        None => format!("{}: N/A", label),
    }
}

/// Latest price followed by its day, week and year changes
pub fn render_price_changes(symbol: &str, changes: &PriceChanges) -> String {
    [
        format!(
            "{} {} as of {}",
            symbol,
            format_price(changes.price),
            changes.date
        ),
        change_line("1 day", changes.one_day.as_ref()),
        change_line("1 week", changes.one_week.as_ref()),
        change_line("1 year", changes.one_year.as_ref()),
    ]
    .join("\n")
}

fn flow_line(label: &str, net: f64) -> String {
    let pressure = if net >= 0.0 {
        "buying pressure"
    } else {
        "selling pressure"
    };
    format!(
        "{}: {} shares {} ({})",
        label,
        format_shares(net),
        arrow(net >= 0.0),
        pressure
    )
}

/// Net volume imbalance lines for whatever the summary holds
pub fn render_volume(symbol: &str, summary: &VolumeSummary) -> String {
    let mut lines = vec![format!("{} net volume", symbol)];
    if let Some(today) = summary.today {
        lines.push(flow_line("Today", today));
    }
    if let Some(week) = summary.week {
        lines.push(flow_line("Last 7 days", week));
    }
    for month in &summary.monthly {
        lines.push(flow_line(&month.label(), month.net_volume));
    }
    if lines.len() == 1 {
        lines.push("No volume data".to_string());
    }
    lines.join("\n")
}
