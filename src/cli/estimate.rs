//! Estimate command implementation

use super::{build_pool, print_report, resolve_now};
use crate::config::Config;
use crate::math::{format_fixed, format_fixed_signed};
use clap::Args;

#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Symbol of the quote token
    #[arg(long)]
    pub token_in: String,

    /// Symbol of the priced token
    #[arg(long)]
    pub token_out: String,

    /// Estimation timestamp (unix seconds), defaults to now
    #[arg(long)]
    pub now: Option<u64>,
}

impl EstimateArgs {
    pub fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let pool = build_pool(config)?;
        let now = resolve_now(self.now)?;

        let estimation = pool.estimate(&self.token_in, &self.token_out, now)?;
        print_report(
            json,
            &[
                ("mean", format_fixed_signed(estimation.mean)),
                ("variance", format_fixed(estimation.variance)),
                ("success", estimation.success.to_string()),
            ],
        )
    }
}
