//! Swap quote commands

use super::{build_pool, fixed, print_report, resolve_now, token_amount, token_decimals};
use crate::config::Config;
use crate::feed::PriceFeed;
use crate::math::{format_fixed, format_units, U256};
use crate::pool::Pool;
use crate::pool::SwapQuote;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct QuoteInArgs {
    /// Symbol of the token sold
    #[arg(long)]
    pub token_in: String,

    /// Symbol of the token bought
    #[arg(long)]
    pub token_out: String,

    /// Exact amount sold
    #[arg(long)]
    pub amount: Decimal,

    /// Minimum amount bought
    #[arg(long)]
    pub min_out: Option<Decimal>,

    /// Maximum spot price in token units, unbounded when omitted
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Quote timestamp (unix seconds), defaults to now
    #[arg(long)]
    pub now: Option<u64>,
}

impl QuoteInArgs {
    pub fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let pool = build_pool(config)?;
        let now = resolve_now(self.now)?;
        let amount_in = token_amount(&pool, &self.token_in, "amount", self.amount)?;
        let min_out = match self.min_out {
            Some(min_out) => token_amount(&pool, &self.token_out, "min_out", min_out)?,
            None => U256::ZERO,
        };
        let max_price = optional_fixed("max_price", self.max_price, U256::MAX)?;

        tracing::info!(
            token_in = %self.token_in,
            token_out = %self.token_out,
            now,
            "Quoting exact-in swap"
        );
        let quote = pool.quote_exact_in(
            &self.token_in,
            amount_in,
            &self.token_out,
            min_out,
            max_price,
            now,
        )?;
        print_quote(json, &pool, &self.token_in, &self.token_out, "amount_out", &quote)
    }
}

#[derive(Args, Debug)]
pub struct QuoteOutArgs {
    /// Symbol of the token sold
    #[arg(long)]
    pub token_in: String,

    /// Symbol of the token bought
    #[arg(long)]
    pub token_out: String,

    /// Exact amount bought
    #[arg(long)]
    pub amount: Decimal,

    /// Maximum amount sold, unbounded when omitted
    #[arg(long)]
    pub max_in: Option<Decimal>,

    /// Maximum spot price in token units, unbounded when omitted
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Quote timestamp (unix seconds), defaults to now
    #[arg(long)]
    pub now: Option<u64>,
}

impl QuoteOutArgs {
    pub fn execute(&self, config: &Config, json: bool) -> anyhow::Result<()> {
        let pool = build_pool(config)?;
        let now = resolve_now(self.now)?;
        let amount_out = token_amount(&pool, &self.token_out, "amount", self.amount)?;
        let max_in = match self.max_in {
            Some(max_in) => token_amount(&pool, &self.token_in, "max_in", max_in)?,
            None => U256::MAX,
        };
        let max_price = optional_fixed("max_price", self.max_price, U256::MAX)?;

        tracing::info!(
            token_in = %self.token_in,
            token_out = %self.token_out,
            now,
            "Quoting exact-out swap"
        );
        let quote = pool.quote_exact_out(
            &self.token_in,
            max_in,
            &self.token_out,
            amount_out,
            max_price,
            now,
        )?;
        print_quote(json, &pool, &self.token_in, &self.token_in, "amount_in", &quote)
    }
}

fn optional_fixed(
    name: &'static str,
    value: Option<Decimal>,
    default: U256,
) -> anyhow::Result<U256> {
    value.map_or(Ok(default), |v| fixed(name, v))
}

/// `amount_token` is the token the quoted amount is denominated in
fn print_quote<F: PriceFeed>(
    json: bool,
    pool: &Pool<F>,
    token_in: &str,
    amount_token: &str,
    amount_label: &str,
    quote: &SwapQuote,
) -> anyhow::Result<()> {
    let amount_decimals = token_decimals(pool, amount_token)?;
    let in_decimals = token_decimals(pool, token_in)?;
    print_report(
        json,
        &[
            (amount_label, format_units(quote.amount, amount_decimals)),
            ("regime", quote.regime.to_string()),
            ("spread", format_fixed(quote.swap_result.spread)),
            ("tax_base", format_units(quote.swap_result.tax_base, in_decimals)),
            ("spot_price_before", format_fixed(quote.price_result.spot_price_before)),
            ("spot_price_after", format_fixed(quote.spot_price_after)),
            ("oracle_price_in", quote.price_result.price_in.to_string()),
            ("oracle_price_out", quote.price_result.price_out.to_string()),
        ],
    )
}
