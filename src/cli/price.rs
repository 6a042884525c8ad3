//! Price command implementation

use super::AppContext;
use crate::report::format_price;
use clap::Args;

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Ticker symbol, e.g. AAPL
    pub symbol: String,

    /// Years of history (defaults to the configured lookback)
    #[arg(short, long)]
    pub years: Option<u32>,
}

impl PriceArgs {
    pub async fn execute(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let years = ctx.years(self.years);
        let price = ctx.ranker().momentum_price(&self.symbol, years).await?;

        println!(
            "{} momentum price ({}y): {}",
            self.symbol.trim().to_ascii_uppercase(),
            years,
            format_price(price)
        );
        Ok(())
    }
}
