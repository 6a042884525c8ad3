//! CLI interface for momentum-price
//!
//! Provides subcommands for:
//! - `price`: Momentum price of one symbol
//! - `series`: Momentum price after every session
//! - `batch`: Rank symbols by momentum percentage
//! - `quote`: Latest quoted price
//! - `changes`: Price changes over a day, week and year
//! - `volume`: Net volume imbalance
//! - `percentage`: Format one number as a percentage of another
//! - `config`: Show the resolved configuration

mod batch;
mod changes;
mod percentage;
mod price;
mod quote;
mod series;
mod volume;

pub use batch::{BatchArgs, OutputFormat};
pub use changes::ChangesArgs;
pub use percentage::PercentageArgs;
pub use price::PriceArgs;
pub use quote::QuoteArgs;
pub use series::SeriesArgs;
pub use volume::VolumeArgs;

use crate::config::Config;
use crate::data::ParquetWriter;
use crate::market::{FixtureMarketData, MarketData, YahooClient};
use crate::ranker::MomentumRanker;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "momentum-price")]
#[command(about = "Volume-weighted momentum prices and rankings for listed securities")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    /// Serve market data from a JSON fixture instead of Yahoo Finance
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Momentum price of one symbol
    Price(PriceArgs),
    /// Momentum price after every session
    Series(SeriesArgs),
    /// Rank symbols by momentum price as a percentage of the quoted price
    Batch(BatchArgs),
    /// Latest quoted price of one or more symbols
    Quote(QuoteArgs),
    /// Price changes over the last day, week and year
    Changes(ChangesArgs),
    /// Net volume imbalance
    Volume(VolumeArgs),
    /// Format one number as a percentage of another
    Percentage(PercentageArgs),
    /// Show configuration
    Config,
}

/// Everything a data-backed command needs
pub struct AppContext {
    pub config: Config,
    pub source: Arc<dyn MarketData>,
}

impl AppContext {
    /// Build the data source: the fixture file when given, Yahoo otherwise
    pub fn new(config: Config, fixture: Option<&Path>) -> anyhow::Result<Self> {
        let source: Arc<dyn MarketData> = match fixture {
            Some(path) => {
                let fixture = FixtureMarketData::load(path)?;
                tracing::info!(path = ?path, securities = fixture.len(), "Using fixture data");
                Arc::new(fixture)
            }
            None => Arc::new(YahooClient::with_config(config.provider.yahoo_config())?),
        };

        Ok(Self { config, source })
    }

    /// Create a context over an existing source
    pub fn with_source(config: Config, source: Arc<dyn MarketData>) -> Self {
        Self { config, source }
    }

    pub fn ranker(&self) -> MomentumRanker {
        MomentumRanker::new(self.source.clone(), self.config.batch.ranker_config())
    }

    pub fn writer(&self) -> ParquetWriter {
        ParquetWriter::new(self.config.output.export_dir.clone())
    }

    /// Lookback from the command line, else the configured default
    pub fn years(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.config.engine.lookback_years)
    }
}
