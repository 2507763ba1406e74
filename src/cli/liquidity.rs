//! Single-asset join and exit commands

use super::{build_pool, fixed, print_report, resolve_now, token_amount, token_decimals};
use crate::config::Config;
use crate::math::{format_fixed, format_units};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct JoinArgs {
    /// Symbol of the token deposited
    #[arg(long)]
    pub token_in: String,

    /// Amount deposited
    #[arg(long)]
    pub amount: Decimal,

    /// Quote timestamp (unix seconds), defaults to now
    #[arg(long)]
    pub now: Option<u64>,
}

impl JoinArgs {
    pub fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let pool = build_pool(config)?;
        let now = resolve_now(self.now)?;
        let amount_in = token_amount(&pool, &self.token_in, "amount", self.amount)?;

        let quote = pool.quote_join_single_asset(&self.token_in, amount_in, now)?;
        print_report(
            json,
            &[
                ("pool_amount_out", format_fixed(quote.pool_amount_out)),
                ("total_weight", format_fixed(quote.total_weight)),
                ("total_supply", format_fixed(pool.total_supply())),
            ],
        )
    }
}

#[derive(Args, Debug)]
pub struct ExitArgs {
    /// Symbol of the token withdrawn
    #[arg(long)]
    pub token_out: String,

    /// Pool shares burned
    #[arg(long)]
    pub shares: Decimal,

    /// Quote timestamp (unix seconds), defaults to now
    #[arg(long)]
    pub now: Option<u64>,
}

impl ExitArgs {
    pub fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let pool = build_pool(config)?;
        let now = resolve_now(self.now)?;
        let pool_amount_in = fixed("shares", self.shares)?;

        let quote = pool.quote_exit_single_asset(&self.token_out, pool_amount_in, now)?;
        let decimals = token_decimals(&pool, &self.token_out)?;
        print_report(
            json,
            &[
                ("amount_out", format_units(quote.amount_out, decimals)),
                ("total_weight", format_fixed(quote.total_weight)),
                ("total_supply", format_fixed(pool.total_supply())),
            ],
        )
    }
}
