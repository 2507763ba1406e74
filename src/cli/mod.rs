//! CLI interface for oracle-amm
//!
//! Provides subcommands for:
//! - `quote-in` / `quote-out`: Price a swap against the recorded oracle history
//! - `join` / `exit`: Price a single-asset deposit or withdrawal
//! - `estimate`: Show the GBM estimation of a pair
//! - `config`: Show the validated configuration

mod estimate;
mod liquidity;
mod quote;

pub use estimate::EstimateArgs;
pub use liquidity::{ExitArgs, JoinArgs};
pub use quote::{QuoteInArgs, QuoteOutArgs};

use crate::config::{to_fixed_point, to_units, Config};
use crate::feed::{InMemoryPriceFeed, PriceFeed};
use crate::math::{format_fixed, U256};
use crate::pool::Pool;
use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "oracle-amm")]
#[command(about = "Oracle-aware weighted AMM pricing against recorded price feeds")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Quote a swap of an exact input amount
    QuoteIn(QuoteInArgs),
    /// Quote a swap for an exact output amount
    QuoteOut(QuoteOutArgs),
    /// Quote a single-asset join
    Join(JoinArgs),
    /// Quote a single-asset exit
    Exit(ExitArgs),
    /// Show the GBM estimation of a pair
    Estimate(EstimateArgs),
    /// Show the validated configuration
    Config,
}

/// Build the pool described by the configuration
pub fn build_pool(config: &Config) -> anyhow::Result<Pool<InMemoryPriceFeed>> {
    let path = &config.oracle.history_path;
    let feed = InMemoryPriceFeed::load(path)
        .with_context(|| format!("Could not load price history from {}", path.display()))?;
    let pool = Pool::new(
        feed,
        config.pool_config()?,
        config.bound_tokens()?,
        config.initial_supply()?,
    )?;
    Ok(pool)
}

/// Quote timestamp, defaulting to the current time
fn resolve_now(now: Option<u64>) -> anyhow::Result<u64> {
    match now {
        Some(now) => Ok(now),
        None => Ok(u64::try_from(chrono::Utc::now().timestamp())?),
    }
}

fn fixed(name: &'static str, value: Decimal) -> anyhow::Result<U256> {
    Ok(to_fixed_point(name, value)?)
}

/// Decimals of a bound token
fn token_decimals<F: PriceFeed>(pool: &Pool<F>, symbol: &str) -> anyhow::Result<u8> {
    Ok(pool.token(symbol)?.decimals)
}

/// Amount of `symbol` in its own token units
fn token_amount<F: PriceFeed>(
    pool: &Pool<F>,
    symbol: &str,
    name: &'static str,
    value: Decimal,
) -> anyhow::Result<U256> {
    Ok(to_units(name, value, token_decimals(pool, symbol)?)?)
}

/// Print labelled values as aligned text or a JSON object
fn print_report(json: bool, fields: &[(&str, String)]) -> anyhow::Result<()> {
    if json {
        let object: serde_json::Map<String, serde_json::Value> = fields
            .iter()
            .map(|(key, value)| (key.to_string(), serde_json::Value::String(value.clone())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&object)?);
    } else {
        for (key, value) in fields {
            println!("  {:<20} {}", format!("{}:", key), value);
        }
    }
    Ok(())
}

/// Print the validated configuration
pub fn print_config(config: &Config, json: bool) -> anyhow::Result<()> {
    let pool = config.pool_config()?;
    let mut fields = vec![
        ("swap_fee", format_fixed(pool.swap_fee)),
        ("max_price_unpeg_ratio", format_fixed(pool.max_price_unpeg_ratio)),
        ("fallback_spread", format_fixed(pool.fallback_spread)),
        ("gbm.z", format_fixed(pool.gbm.z)),
        ("gbm.horizon", format_fixed(pool.gbm.horizon)),
        ("lookback.in_round", pool.lookback_in_round.to_string()),
        ("lookback.in_sec", pool.lookback_in_sec.to_string()),
        ("lookback.step", pool.lookback_step_in_round.to_string()),
        ("history", config.oracle.history_path.display().to_string()),
    ];
    let tokens: Vec<String> = config
        .tokens
        .iter()
        .map(|t| format!("{} (weight {}, balance {})", t.symbol, t.weight, t.balance))
        .collect();
    fields.push(("tokens", tokens.join(", ")));
    print_report(json, &fields)
}
