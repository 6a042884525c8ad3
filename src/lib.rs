//! momentum-price: volume-weighted momentum prices for listed securities
//!
//! This library provides the core components for:
//! - The momentum price recurrence over daily bars
//! - Market data from Yahoo Finance or offline fixtures
//! - Concurrent batch ranking by momentum percentage
//! - Price change and net volume analysis
//! - Terminal rendering and Parquet export
//! - Structured logging and Prometheus metrics

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod market;
pub mod momentum;
pub mod ranker;
pub mod report;
pub mod telemetry;
