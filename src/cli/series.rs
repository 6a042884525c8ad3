//! Series command implementation

use super::AppContext;
use crate::market::Symbol;
use crate::report::render_series;
use chrono::Utc;
use clap::Args;

#[derive(Args, Debug)]
pub struct SeriesArgs {
    /// Ticker symbol, e.g. AAPL
    pub symbol: String,

    /// Years of history (defaults to the configured lookback)
    #[arg(short, long)]
    pub years: Option<u32>,

    /// Also write the series to Parquet in the export directory
    #[arg(long)]
    pub export: bool,
}

impl SeriesArgs {
    pub async fn execute(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let symbol = Symbol::parse(&self.symbol)?;
        let series = ctx
            .ranker()
            .momentum_series(symbol.as_str(), ctx.years(self.years))
            .await?;

        println!("{}", render_series(symbol.as_str(), &series));

        if self.export {
            let writer = ctx.writer();
            let path = writer.file_path(&format!("momentum_{}", symbol), Utc::now());
            writer.write_momentum_series(&path, symbol.as_str(), &series)?;
            tracing::info!(path = ?path, "Exported momentum series");
            println!("Exported to {}", path.display());
        }

        Ok(())
    }
}
