//! Yahoo Finance client
//!
//! Daily bars, quotes and past prices come from the v8 chart endpoint.
//! Shares outstanding come from the v10 quoteSummary endpoint, which needs a
//! session cookie plus a crumb token; the crumb is cached and refreshed once
//! when Yahoo rejects it.

use super::{lookback_span, normalize_bars, out_of_range, DataError, MarketData, Symbol};
use crate::momentum::Bar;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Yahoo query API base URL
pub const YAHOO_API_URL: &str = "https://query1.finance.yahoo.com";

/// Endpoint that hands out the session cookie the crumb is bound to
const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";

/// Configuration for the Yahoo client
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// Base URL for the query API
    pub base_url: String,
    /// URL used to obtain the session cookie
    pub cookie_url: String,
    /// Request timeout
    pub timeout: std::time::Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: YAHOO_API_URL.to_string(),
            cookie_url: YAHOO_COOKIE_URL.to_string(),
            timeout: std::time::Duration::from_secs(10),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) momentum-price/0.1".to_string(),
        }
    }
}

/// Client for Yahoo Finance's unofficial query API
pub struct YahooClient {
    config: YahooConfig,
    client: Client,
    crumb: RwLock<Option<String>>,
}

impl YahooClient {
    /// Create a client with default configuration
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(YahooConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: YahooConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            config,
            client,
            crumb: RwLock::new(None),
        })
    }

    /// Fetch daily chart data between two instants
    async fn fetch_chart(
        &self,
        symbol: &Symbol,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ChartData, DataError> {
        let url = format!("{}/v8/finance/chart/{}", self.config.base_url, symbol);

        tracing::debug!(url = %url, %symbol, from = %from, to = %to, "Fetching Yahoo chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", from.timestamp().to_string()),
                ("period2", to.timestamp().to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(|e| DataError::unavailable(format!("Yahoo transport error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DataError::unavailable(format!("Yahoo body read error: {}", e)))?;

        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(DataError::unavailable(format!(
                "Yahoo chart API error: {} - {}",
                status,
                truncate(&body)
            )));
        }

        parse_chart(&body, symbol)
    }

    /// Return the cached crumb, fetching a fresh one if needed
    async fn crumb(&self) -> Result<String, DataError> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        // Sets the session cookie; the status is irrelevant (usually 404)
        let _ = self.client.get(&self.config.cookie_url).send().await;

        let url = format!("{}/v1/test/getcrumb", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::unavailable(format!("Yahoo crumb transport error: {}", e)))?;

        if !response.status().is_success() {
            return Err(DataError::unavailable(format!(
                "Yahoo crumb request failed: {}",
                response.status()
            )));
        }

        let crumb = response
            .text()
            .await
            .map_err(|e| DataError::unavailable(format!("Yahoo crumb read error: {}", e)))?
            .trim()
            .to_string();

        if crumb.is_empty() || crumb.len() > 64 || crumb.contains('<') {
            return Err(DataError::malformed("Yahoo returned an unusable crumb"));
        }

        tracing::debug!("Obtained Yahoo crumb");
        *self.crumb.write().await = Some(crumb.clone());
        Ok(crumb)
    }

    async fn fetch_key_statistics(
        &self,
        symbol: &Symbol,
        crumb: &str,
    ) -> Result<(StatusCode, String), DataError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.config.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("modules", "defaultKeyStatistics"), ("crumb", crumb)])
            .send()
            .await
            .map_err(|e| DataError::unavailable(format!("Yahoo transport error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DataError::unavailable(format!("Yahoo body read error: {}", e)))?;

        Ok((status, body))
    }
}

#[async_trait]
impl MarketData for YahooClient {
    async fn fetch_history(
        &self,
        symbol: &Symbol,
        lookback_years: u32,
    ) -> Result<Vec<Bar>, DataError> {
        let to = Utc::now();
        let span = lookback_span(lookback_years)?;
        let from = to.checked_sub_signed(span).ok_or_else(|| out_of_range(span))?;
        let chart = self.fetch_chart(symbol, from, to).await?;

        if chart.bars.is_empty() {
            return Err(DataError::unavailable(format!("no bars for {}", symbol)));
        }

        tracing::info!(%symbol, bars = chart.bars.len(), lookback_years, "Fetched history");
        Ok(chart.bars)
    }

    async fn fetch_shares_outstanding(&self, symbol: &Symbol) -> Result<f64, DataError> {
        let crumb = self.crumb().await?;
        let (mut status, mut body) = self.fetch_key_statistics(symbol, &crumb).await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%symbol, %status, "Yahoo rejected crumb, refreshing");
            *self.crumb.write().await = None;
            let crumb = self.crumb().await?;
            (status, body) = self.fetch_key_statistics(symbol, &crumb).await?;
        }

        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(DataError::unavailable(format!(
                "Yahoo quoteSummary error: {} - {}",
                status,
                truncate(&body)
            )));
        }

        parse_shares_outstanding(&body, symbol)
    }

    async fn fetch_current_price(&self, symbol: &Symbol) -> Result<f64, DataError> {
        let to = Utc::now();
        let chart = self.fetch_chart(symbol, to - Duration::days(7), to).await?;

        chart
            .quoted_price()
            .ok_or_else(|| DataError::unavailable(format!("no price for {}", symbol)))
    }

    async fn fetch_price_at(&self, symbol: &Symbol, past: Duration) -> Result<f64, DataError> {
        // Widen the window so weekends and holidays still find a session
        let window = Utc::now()
            .checked_sub_signed(past)
            .and_then(|target| {
                let from = target.checked_sub_signed(Duration::days(10))?;
                let to = target.checked_add_signed(Duration::days(1))?;
                Some((target, from, to))
            });
        let Some((target, from, to)) = window else {
            return Err(out_of_range(past));
        };
        let chart = self.fetch_chart(symbol, from, to).await?;

        let target_date = target.date_naive();
        chart
            .bars
            .iter()
            .rev()
            .find(|b| b.date <= target_date)
            .map(|b| b.close)
            .ok_or_else(|| {
                DataError::unavailable(format!(
                    "no price for {} on or before {}",
                    symbol, target_date
                ))
            })
    }
}

/// Parsed chart payload
#[derive(Debug, Clone)]
struct ChartData {
    bars: Vec<Bar>,
    regular_market_price: Option<f64>,
}

impl ChartData {
    /// Market price, else the last close; only positive finite prices count
    fn quoted_price(&self) -> Option<f64> {
        self.regular_market_price
            .or_else(|| self.bars.last().map(|b| b.close))
            .filter(|p| p.is_finite() && *p > 0.0)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    default_key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    shares_outstanding: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

/// Map an API error object to a typed error
fn api_error(error: ApiError, symbol: &Symbol) -> DataError {
    if error.code.eq_ignore_ascii_case("Not Found") {
        DataError::UnknownSymbol(symbol.to_string())
    } else {
        DataError::unavailable(format!(
            "{}: {}",
            error.code,
            error.description.unwrap_or_default()
        ))
    }
}

/// Parse a v8 chart response into bars
///
/// Sessions without a close are dropped (Yahoo emits nulls for halted days);
/// a negative volume fails the whole response.
fn parse_chart(body: &str, symbol: &Symbol) -> Result<ChartData, DataError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| DataError::malformed(format!("failed to parse Yahoo chart: {}", e)))?;

    if let Some(error) = response.chart.error {
        return Err(api_error(error, symbol));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| DataError::UnknownSymbol(symbol.to_string()))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = result.meta.gmtoffset;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };

        let date = session_date(ts, offset)
            .ok_or_else(|| DataError::malformed(format!("invalid timestamp {}", ts)))?;
        let open = quote.open.get(i).copied().flatten().unwrap_or(close);
        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);
        let volume = u64::try_from(volume).map_err(|_| {
            DataError::malformed(format!("negative volume {} on {}", volume, date))
        })?;

        bars.push(Bar::with_open(date, open, close, volume));
    }

    Ok(ChartData {
        bars: normalize_bars(bars),
        regular_market_price: result.meta.regular_market_price,
    })
}

/// Parse shares outstanding from a quoteSummary response
fn parse_shares_outstanding(body: &str, symbol: &Symbol) -> Result<f64, DataError> {
    let response: QuoteSummaryResponse = serde_json::from_str(body)
        .map_err(|e| DataError::malformed(format!("failed to parse Yahoo quoteSummary: {}", e)))?;

    if let Some(error) = response.quote_summary.error {
        return Err(api_error(error, symbol));
    }

    response
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .and_then(|r| r.default_key_statistics)
        .and_then(|s| s.shares_outstanding)
        .and_then(|v| v.raw)
        .filter(|shares| *shares > 0.0)
        .ok_or_else(|| DataError::unavailable(format!("no shares outstanding for {}", symbol)))
}

/// Calendar date of a session in the exchange's local time
fn session_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp + gmtoffset, 0).map(|dt| dt.date_naive())
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
