//! Batch ranking types

use crate::market::{DataError, SymbolError};
use crate::momentum::MomentumError;
use crate::report::FormatError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from a single-symbol momentum request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("invalid symbol: {0}")]
    InvalidSymbol(#[from] SymbolError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Momentum(#[from] MomentumError),
}

/// Why a symbol could not be ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidSymbol,
    UnknownSymbol,
    DataUnavailable,
    MalformedResponse,
    InsufficientData,
    InvalidShareCount,
    MalformedBar,
    UnorderedBars,
    DivisionByZero,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidSymbol => "invalid_symbol",
            FailureKind::UnknownSymbol => "unknown_symbol",
            FailureKind::DataUnavailable => "data_unavailable",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::InsufficientData => "insufficient_data",
            FailureKind::InvalidShareCount => "invalid_share_count",
            FailureKind::MalformedBar => "malformed_bar",
            FailureKind::UnorderedBars => "unordered_bars",
            FailureKind::DivisionByZero => "division_by_zero",
        }
    }
}

/// Error attached to a record that could not be ranked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SymbolFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<SymbolError> for SymbolFailure {
    fn from(err: SymbolError) -> Self {
        Self::new(FailureKind::InvalidSymbol, err.to_string())
    }
}

impl From<DataError> for SymbolFailure {
    fn from(err: DataError) -> Self {
        let kind = match err {
            DataError::UnknownSymbol(_) => FailureKind::UnknownSymbol,
            DataError::DataUnavailable(_) => FailureKind::DataUnavailable,
            DataError::MalformedResponse(_) => FailureKind::MalformedResponse,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<MomentumError> for SymbolFailure {
    fn from(err: MomentumError) -> Self {
        let kind = match err {
            MomentumError::InsufficientData { .. } => FailureKind::InsufficientData,
            MomentumError::InvalidShareCount(_) => FailureKind::InvalidShareCount,
            MomentumError::MalformedBar { .. } => FailureKind::MalformedBar,
            MomentumError::UnorderedBars { .. } => FailureKind::UnorderedBars,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<FormatError> for SymbolFailure {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::DivisionByZero => Self::new(FailureKind::DivisionByZero, err.to_string()),
        }
    }
}

impl From<PricingError> for SymbolFailure {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidSymbol(e) => e.into(),
            PricingError::Data(e) => e.into(),
            PricingError::Momentum(e) => e.into(),
        }
    }
}

/// Momentum figures for one successfully ranked symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Final momentum price
    pub momentum_price: f64,
    /// Latest quoted price
    pub current_price: f64,
    /// Momentum price as a percentage of the quoted price
    pub momentum_pct: f64,
    /// Quoted price change over the last year, when a past price exists
    pub one_year_change_pct: Option<f64>,
}

/// Outcome of one symbol in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RecordStatus {
    Ranked(Comparison),
    Failed(SymbolFailure),
}

/// One line of a batch result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub symbol: String,
    #[serde(flatten)]
    pub status: RecordStatus,
}

impl ComparisonRecord {
    pub fn ranked(symbol: impl Into<String>, comparison: Comparison) -> Self {
        Self {
            symbol: symbol.into(),
            status: RecordStatus::Ranked(comparison),
        }
    }

    pub fn failed(symbol: impl Into<String>, failure: SymbolFailure) -> Self {
        Self {
            symbol: symbol.into(),
            status: RecordStatus::Failed(failure),
        }
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        match &self.status {
            RecordStatus::Ranked(c) => Some(c),
            RecordStatus::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&SymbolFailure> {
        match &self.status {
            RecordStatus::Ranked(_) => None,
            RecordStatus::Failed(f) => Some(f),
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self.status, RecordStatus::Ranked(_))
    }
}

/// Quoted price of one symbol in a batch quote, or why it has none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub symbol: String,
    #[serde(flatten)]
    pub status: QuoteStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QuoteStatus {
    Quoted { price: f64 },
    Failed(SymbolFailure),
}

impl QuoteRecord {
    pub fn quoted(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            status: QuoteStatus::Quoted { price },
        }
    }

    pub fn failed(symbol: impl Into<String>, failure: SymbolFailure) -> Self {
        Self {
            symbol: symbol.into(),
            status: QuoteStatus::Failed(failure),
        }
    }

    pub fn price(&self) -> Option<f64> {
        match self.status {
            QuoteStatus::Quoted { price } => Some(price),
            QuoteStatus::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&SymbolFailure> {
        match &self.status {
            QuoteStatus::Quoted { .. } => None,
            QuoteStatus::Failed(f) => Some(f),
        }
    }
}

/// Result of one batch ranking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Identifier for correlating logs and exports
    pub run_id: Uuid,
    /// Years of history each symbol was computed over
    pub lookback_years: u32,
    /// Ranked records first, then failures in input order
    pub records: Vec<ComparisonRecord>,
}

impl BatchReport {
    pub fn ranked_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_ranked()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.records.len() - self.ranked_count()
    }

    pub fn ranked(&self) -> impl Iterator<Item = &ComparisonRecord> {
        self.records.iter().filter(|r| r.is_ranked())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ComparisonRecord> {
        self.records.iter().filter(|r| !r.is_ranked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_failure_from_data_error() {
        let failure: SymbolFailure = DataError::UnknownSymbol("XYZ".to_string()).into();
        assert_eq!(failure.kind, FailureKind::UnknownSymbol);
        assert_eq!(failure.message, "unknown symbol: XYZ");
    }

    #[test]
    fn test_failure_from_momentum_error() {
        let failure: SymbolFailure = MomentumError::MalformedBar {
            index: 4,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            reason: "non-positive close 0".to_string(),
        }
        .into();
        assert_eq!(failure.kind, FailureKind::MalformedBar);
    }

    #[test]
    fn test_failure_from_pricing_error() {
        let err = PricingError::Momentum(MomentumError::InsufficientData { bars: 1 });
        let failure: SymbolFailure = err.into();
        assert_eq!(failure.kind, FailureKind::InsufficientData);
    }

    #[test]
    fn test_record_accessors() {
        let ok = ComparisonRecord::ranked(
            "AAPL",
            Comparison {
                momentum_price: 50.0,
                current_price: 200.0,
                momentum_pct: 25.0,
                one_year_change_pct: None,
            },
        );
        assert!(ok.is_ranked());
        assert_eq!(ok.comparison().unwrap().momentum_pct, 25.0);
        assert!(ok.failure().is_none());

        let bad = ComparisonRecord::failed(
            "ZZZ",
            SymbolFailure::new(FailureKind::UnknownSymbol, "unknown symbol: ZZZ"),
        );
        assert!(!bad.is_ranked());
        assert_eq!(bad.failure().unwrap().kind, FailureKind::UnknownSymbol);
    }

    #[test]
    fn test_record_json_shape() {
        let record = ComparisonRecord::failed(
            "ZZZ",
            SymbolFailure::new(FailureKind::DataUnavailable, "timed out"),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["symbol"], "ZZZ");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "data_unavailable");
    }

    #[test]
    fn test_failure_kind_as_str_matches_serde() {
        let kind = FailureKind::InvalidShareCount;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.as_str()));
    }
}
