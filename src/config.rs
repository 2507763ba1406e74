//! Configuration types for oracle-amm
//!
//! Values are written as human decimals (`swap_fee = 0.0025`) and converted
//! to 18-decimal fixed point when the pool configuration is built.

use crate::error::ConfigError;
use crate::math::{format_fixed, from_int, ONE, U256};
use crate::model::GbmParameters;
use crate::pool::BoundToken;
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Smallest swap fee, 1e-6
pub const MIN_FEE: U256 = U256::from_limbs([1_000_000_000_000, 0, 0, 0]);
/// Largest swap fee, 0.1
pub const MAX_FEE: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);
/// Smallest unpeg ratio, 1.00125
pub const MIN_MAX_PRICE_UNPEG_RATIO: U256 = U256::from_limbs([1_001_250_000_000_000_000, 0, 0, 0]);
/// Largest unpeg ratio, 1.1
pub const MAX_MAX_PRICE_UNPEG_RATIO: U256 = U256::from_limbs([1_100_000_000_000_000_000, 0, 0, 0]);
/// Largest fallback spread, 0.1
pub const MAX_FALLBACK_SPREAD: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);
/// Smallest forecast horizon, one second
pub const MIN_HORIZON: U256 = ONE;
/// Largest quantile multiplier
pub const MAX_Z: U256 = U256::from_limbs([6_000_000_000_000_000_000, 0, 0, 0]);
pub const MIN_LOOKBACK_IN_ROUND: usize = 1;
pub const MAX_LOOKBACK_IN_ROUND: usize = 100;
pub const MIN_LOOKBACK_IN_SEC: u64 = 1;
pub const MIN_LOOKBACK_STEP_IN_ROUND: u128 = 1;
/// Largest token decimals accepted for balances and amounts
pub const MAX_TOKEN_DECIMALS: u8 = 36;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub pool: PoolSettings,
    #[serde(default)]
    pub gbm: GbmConfig,
    #[serde(default)]
    pub lookback: LookbackConfig,
    pub oracle: OracleConfig,
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Pool fee and protection settings
#[derive(Debug, Clone, Deserialize)]
pub struct PoolSettings {
    pub swap_fee: Decimal,
    pub max_price_unpeg_ratio: Decimal,

    /// Spread used when the GBM estimation or in-block history is unavailable
    #[serde(default = "default_fallback_spread")]
    pub fallback_spread: Decimal,

    /// Pool shares minted to the initial liquidity provider
    #[serde(default = "default_initial_supply")]
    pub initial_supply: Decimal,
}

fn default_fallback_spread() -> Decimal {
    Decimal::new(3, 3) // 0.003
}
fn default_initial_supply() -> Decimal {
    Decimal::new(100, 0)
}

/// GBM spread configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GbmConfig {
    /// Quantile multiplier of the spread
    #[serde(default = "default_z")]
    pub z: Decimal,

    /// Forecast horizon (seconds)
    #[serde(default = "default_horizon_secs")]
    pub horizon_secs: Decimal,
}

fn default_z() -> Decimal {
    Decimal::new(6, 1) // 0.6
}
fn default_horizon_secs() -> Decimal {
    Decimal::new(300, 0)
}

impl Default for GbmConfig {
    fn default() -> Self {
        Self {
            z: default_z(),
            horizon_secs: default_horizon_secs(),
        }
    }
}

/// Estimator lookback window
#[derive(Debug, Clone, Deserialize)]
pub struct LookbackConfig {
    /// Maximum number of rounds sampled per feed
    #[serde(default = "default_in_round")]
    pub in_round: usize,

    /// Maximum window (seconds)
    #[serde(default = "default_in_sec")]
    pub in_sec: u64,

    /// Round id stride between samples
    #[serde(default = "default_step_in_round")]
    pub step_in_round: u64,
}

fn default_in_round() -> usize {
    5
}
fn default_in_sec() -> u64 {
    3600
}
fn default_step_in_round() -> u64 {
    1
}

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            in_round: default_in_round(),
            in_sec: default_in_sec(),
            step_in_round: default_step_in_round(),
        }
    }
}

/// Recorded oracle history
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// JSON round history loaded into the in-memory feed
    pub history_path: PathBuf,
}

/// A token bound to the pool
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub symbol: String,
    /// Oracle identifier in the history file
    pub oracle: String,
    /// Token decimals
    #[serde(default = "default_token_decimals")]
    pub decimals: u8,
    pub balance: Decimal,
    pub weight: Decimal,
}

fn default_token_decimals() -> u8 {
    18
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// Validated pool parameters in fixed point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub swap_fee: U256,
    pub max_price_unpeg_ratio: U256,
    pub fallback_spread: U256,
    pub gbm: GbmParameters,
    pub lookback_in_round: usize,
    pub lookback_in_sec: u64,
    pub lookback_step_in_round: u128,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            swap_fee: U256::from(2_500_000_000_000_000u64),
            max_price_unpeg_ratio: U256::from(1_050_000_000_000_000_000u64),
            fallback_spread: U256::from(3_000_000_000_000_000u64),
            gbm: GbmParameters {
                z: U256::from(600_000_000_000_000_000u64),
                horizon: from_int(300),
            },
            lookback_in_round: default_in_round(),
            lookback_in_sec: default_in_sec(),
            lookback_step_in_round: 1,
        }
    }
}

fn check_fixed(name: &'static str, value: U256, min: U256, max: U256) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfBounds {
            name,
            value: format_fixed(value),
            min: format_fixed(min),
            max: format_fixed(max),
        });
    }
    Ok(())
}

fn check_count<T: PartialOrd + ToString>(
    name: &'static str,
    value: T,
    min: T,
    max: Option<T>,
) -> Result<(), ConfigError> {
    let above_max = max.as_ref().is_some_and(|max| value > *max);
    if value < min || above_max {
        return Err(ConfigError::OutOfBounds {
            name,
            value: value.to_string(),
            min: min.to_string(),
            max: max.map_or_else(|| "inf".to_string(), |max| max.to_string()),
        });
    }
    Ok(())
}

impl PoolConfig {
    /// Check every parameter against its bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fixed("swap_fee", self.swap_fee, MIN_FEE, MAX_FEE)?;
        check_fixed(
            "max_price_unpeg_ratio",
            self.max_price_unpeg_ratio,
            MIN_MAX_PRICE_UNPEG_RATIO,
            MAX_MAX_PRICE_UNPEG_RATIO,
        )?;
        check_fixed("fallback_spread", self.fallback_spread, U256::ZERO, MAX_FALLBACK_SPREAD)?;
        check_fixed("gbm.z", self.gbm.z, U256::ZERO, MAX_Z)?;
        check_fixed("gbm.horizon", self.gbm.horizon, MIN_HORIZON, U256::MAX)?;
        check_count(
            "lookback.in_round",
            self.lookback_in_round,
            MIN_LOOKBACK_IN_ROUND,
            Some(MAX_LOOKBACK_IN_ROUND),
        )?;
        check_count("lookback.in_sec", self.lookback_in_sec, MIN_LOOKBACK_IN_SEC, None)?;
        check_count(
            "lookback.step_in_round",
            self.lookback_step_in_round,
            MIN_LOOKBACK_STEP_IN_ROUND,
            None,
        )?;
        Ok(())
    }
}

/// Convert a non-negative decimal to 18-decimal fixed point
///
/// Digits beyond the 18th decimal are truncated.
pub fn to_fixed_point(name: &'static str, value: Decimal) -> Result<U256, ConfigError> {
    to_units(name, value, 18)
}

/// Convert a non-negative decimal to an integer amount with `decimals` places
///
/// Digits beyond `decimals` are truncated.
pub fn to_units(name: &'static str, value: Decimal, decimals: u8) -> Result<U256, ConfigError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ConfigError::Negative {
            name,
            value: value.to_string(),
        });
    }
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(ConfigError::OutOfBounds {
            name,
            value: decimals.to_string(),
            min: "0".to_string(),
            max: MAX_TOKEN_DECIMALS.to_string(),
        });
    }

    let mantissa = U256::from(value.mantissa().unsigned_abs());
    let scale = value.scale();
    let decimals = u32::from(decimals);
    let units = if scale <= decimals {
        mantissa * U256::from(10u64).pow(U256::from(decimals - scale))
    } else {
        mantissa / U256::from(10u64).pow(U256::from(scale - decimals))
    };
    Ok(units)
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validated fixed-point pool parameters
    pub fn pool_config(&self) -> Result<PoolConfig, ConfigError> {
        let config = PoolConfig {
            swap_fee: to_fixed_point("pool.swap_fee", self.pool.swap_fee)?,
            max_price_unpeg_ratio: to_fixed_point(
                "pool.max_price_unpeg_ratio",
                self.pool.max_price_unpeg_ratio,
            )?,
            fallback_spread: to_fixed_point("pool.fallback_spread", self.pool.fallback_spread)?,
            gbm: GbmParameters {
                z: to_fixed_point("gbm.z", self.gbm.z)?,
                horizon: to_fixed_point("gbm.horizon_secs", self.gbm.horizon_secs)?,
            },
            lookback_in_round: self.lookback.in_round,
            lookback_in_sec: self.lookback.in_sec,
            lookback_step_in_round: u128::from(self.lookback.step_in_round),
        };
        config.validate()?;
        Ok(config)
    }

    /// Initial pool share supply in fixed point
    pub fn initial_supply(&self) -> Result<U256, ConfigError> {
        to_fixed_point("pool.initial_supply", self.pool.initial_supply)
    }

    /// Tokens to bind, with balances in token units and weights in fixed point
    pub fn bound_tokens(&self) -> Result<Vec<BoundToken>, ConfigError> {
        self.tokens
            .iter()
            .map(|token| {
                Ok(BoundToken {
                    symbol: token.symbol.clone(),
                    oracle: token.oracle.clone(),
                    decimals: token.decimals,
                    balance: to_units("tokens.balance", token.balance, token.decimals)?,
                    weight: to_fixed_point("tokens.weight", token.weight)?,
                })
            })
            .collect()
    }
}
