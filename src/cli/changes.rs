//! Changes command implementation

use super::AppContext;
use crate::analysis::price_changes;
use crate::market::Symbol;
use crate::report::render_price_changes;
use clap::Args;

#[derive(Args, Debug)]
pub struct ChangesArgs {
    /// Ticker symbol, e.g. AAPL
    pub symbol: String,
}

impl ChangesArgs {
    pub async fn execute(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let symbol = Symbol::parse(&self.symbol)?;
        let bars = ctx.source.fetch_history(&symbol, 1).await?;

        match price_changes(&bars) {
            Some(changes) => println!("{}", render_price_changes(symbol.as_str(), &changes)),
            None => anyhow::bail!("no price history for {}", symbol),
        }
        Ok(())
    }
}
