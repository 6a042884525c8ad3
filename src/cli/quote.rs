//! Quote command implementation

use super::batch::OutputFormat;
use super::AppContext;
use crate::report::render_quotes;
use clap::Args;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Ticker symbols, e.g. AAPL MSFT
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl QuoteArgs {
    pub async fn execute(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let quotes = ctx.ranker().quote_prices(self.symbols.as_slice()).await;

        match self.format {
            OutputFormat::Table => println!("{}", render_quotes(&quotes)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quotes)?),
        }

        Ok(())
    }
}
