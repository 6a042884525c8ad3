//! Batch command implementation

use super::AppContext;
use crate::report::render_batch;
use chrono::Utc;
use clap::{Args, ValueEnum};

/// How batch results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per symbol
    Table,
    /// The full report as JSON
    Json,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Ticker symbols, e.g. AAPL MSFT NVDA
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Years of history (defaults to the configured lookback)
    #[arg(short, long)]
    pub years: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Also write the comparison to Parquet in the export directory
    #[arg(long)]
    pub export: bool,
}

impl BatchArgs {
    pub async fn execute(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let report = ctx
            .ranker()
            .rank(self.symbols.as_slice(), ctx.years(self.years))
            .await;

        match self.format {
            OutputFormat::Table => println!("{}", render_batch(&report)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }

        if self.export {
            let writer = ctx.writer();
            let path = writer.file_path("comparisons", Utc::now());
            writer.write_comparisons(&path, &report)?;
            tracing::info!(path = ?path, run_id = %report.run_id, "Exported comparisons");
        }

        Ok(())
    }
}
