//! Percentage command implementation

use crate::report::percentage;
use clap::Args;

#[derive(Args, Debug)]
pub struct PercentageArgs {
    /// Value to express as a percentage
    #[arg(allow_negative_numbers = true)]
    pub numerator: f64,

    /// Value that counts as 100%
    #[arg(allow_negative_numbers = true)]
    pub denominator: f64,
}

impl PercentageArgs {
    pub fn execute(&self) -> anyhow::Result<()> {
        println!("{}", percentage(self.numerator, self.denominator)?);
        Ok(())
    }
}
