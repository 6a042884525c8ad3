//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

const SYMBOLS_TOTAL: &str = "momentum_symbols_total";
const BATCH_DURATION: &str = "momentum_batch_duration_seconds";

/// Outcome of one symbol in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolOutcome {
    /// Momentum percentage computed
    Ranked,
    /// Skipped with an error
    Failed,
}

impl SymbolOutcome {
    fn label(&self) -> &'static str {
        match self {
            SymbolOutcome::Ranked => "ranked",
            SymbolOutcome::Failed => "failed",
        }
    }
}

/// Count one symbol outcome
pub fn record_symbol_outcome(outcome: SymbolOutcome) {
    ::metrics::counter!(SYMBOLS_TOTAL, "outcome" => outcome.label()).increment(1);
}

/// Record wall-clock time of a batch
pub fn record_batch_duration(duration: Duration) {
    ::metrics::histogram!(BATCH_DURATION).record(duration.as_secs_f64());
}

/// Serve `/metrics` on the given port
///
/// Must be called from within a Tokio runtime.
pub fn install_prometheus(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}
