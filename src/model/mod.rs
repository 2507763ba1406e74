//! Statistical model module
//!
//! Estimates the drift and variance of a token pair's relative-price
//! log-return process (GBM) from sparse oracle history.

mod gbm;
mod history;

pub use gbm::{pair_returns, return_statistics, GbmEstimator};
pub use history::{historical_prices, HistoricalPrices};

use crate::math::{I256, U256};

/// Lookback window of the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalPricesParameters {
    /// Maximum number of samples per series (1..=100)
    pub lookback_in_round: usize,
    /// Maximum window length in seconds
    pub lookback_in_sec: u64,
    /// Time of the pricing call
    pub timestamp: u64,
    /// Round id stride between samples
    pub lookback_step_in_round: u128,
}

/// Spread parameters of the GBM model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GbmParameters {
    /// Quantile multiplier, fixed point
    pub z: U256,
    /// Forecast horizon in seconds, fixed point
    pub horizon: U256,
}

/// Per-second drift and variance of the log-return process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GbmEstimation {
    pub mean: I256,
    pub variance: U256,
    pub success: bool,
}

impl GbmEstimation {
    /// Result of an estimation that could not be carried out
    pub const fn failed() -> Self {
        Self {
            mean: I256::ZERO,
            variance: U256::ZERO,
            success: false,
        }
    }
}
