//! Configuration types for momentum-price

use crate::market::{YahooConfig, YAHOO_API_URL};
use crate::ranker::RankerConfig;
use crate::telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
///
/// Every section is optional; missing sections and keys take defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Momentum engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Years of daily history each momentum price is computed over
    #[serde(default = "default_lookback_years")]
    pub lookback_years: u32,
}

fn default_lookback_years() -> u32 {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookback_years: default_lookback_years(),
        }
    }
}

/// Batch ranking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// Symbols computed at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-symbol budget before the symbol is reported unavailable (seconds)
    #[serde(default = "default_symbol_timeout_secs")]
    pub symbol_timeout_secs: u64,

    /// Look-back for the one-year price change (days)
    #[serde(default = "default_one_year_lookback_days")]
    pub one_year_lookback_days: i64,
}

fn default_max_concurrency() -> usize {
    8
}
fn default_symbol_timeout_secs() -> u64 {
    30
}
fn default_one_year_lookback_days() -> i64 {
    365
}

/// Longest one-year look-back accepted, in days
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            symbol_timeout_secs: default_symbol_timeout_secs(),
            one_year_lookback_days: default_one_year_lookback_days(),
        }
    }
}

impl BatchConfig {
    /// Ranker settings for this section
    pub fn ranker_config(&self) -> RankerConfig {
        RankerConfig {
            max_concurrency: self.max_concurrency.max(1),
            symbol_timeout: Duration::from_secs(self.symbol_timeout_secs),
            one_year_lookback: chrono::Duration::try_days(self.one_year_lookback_days)
                .unwrap_or_else(|| chrono::Duration::days(default_one_year_lookback_days())),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_LOOKBACK_DAYS).contains(&self.one_year_lookback_days),
            "batch.one_year_lookback_days must be between 1 and {}, got {}",
            MAX_LOOKBACK_DAYS,
            self.one_year_lookback_days
        );
        Ok(())
    }
}

/// Market data provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL for the Yahoo query API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    YAHOO_API_URL.to_string()
}
fn default_provider_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    YahooConfig::default().user_agent
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_provider_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProviderConfig {
    /// Yahoo client settings for this section
    pub fn yahoo_config(&self) -> YahooConfig {
        YahooConfig {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            ..YahooConfig::default()
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory Parquet exports are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Port for the Prometheus scrape endpoint; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.batch.validate()?;
        Ok(config)
    }
}
