//! Batch ranker
//!
//! Computes momentum prices for many symbols independently, converts each
//! into a percentage of the quoted price and sorts the comparison.

mod batch;
mod types;

pub use batch::{order_records, MomentumRanker, RankerConfig};
pub use types::{
    BatchReport, Comparison, ComparisonRecord, FailureKind, PricingError, QuoteRecord,
    QuoteStatus, RecordStatus, SymbolFailure,
};
