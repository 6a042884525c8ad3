//! Data export module
//!
//! Stores momentum series and batch comparisons to Parquet

mod parquet;

pub use parquet::{
    comparison_schema, momentum_series_schema, ParquetReader, ParquetWriter, SeriesRow,
};
