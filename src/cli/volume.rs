//! Volume command implementation

use super::AppContext;
use crate::analysis::{volume_summary, VolumePeriod};
use crate::market::Symbol;
use crate::report::render_volume;
use clap::Args;

#[derive(Args, Debug)]
pub struct VolumeArgs {
    /// Ticker symbol, e.g. AAPL
    pub symbol: String,

    /// Window: 1d, 7d, 1y or all
    #[arg(short, long, default_value = "1d")]
    pub period: VolumePeriod,
}

impl VolumeArgs {
    pub async fn execute(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let symbol = Symbol::parse(&self.symbol)?;
        let bars = ctx.source.fetch_history(&symbol, 1).await?;

        let summary = volume_summary(&bars, self.period);
        tracing::debug!(%symbol, period = %self.period, bars = bars.len(), "Computed net volume");
        println!("{}", render_volume(symbol.as_str(), &summary));
        Ok(())
    }
}
