//! Error types shared across the pricing core

use alloy_primitives::U256;
use thiserror::Error;

/// Fixed-point and exponential math errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Math error - arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Math error - arithmetic underflow")]
    ArithmeticUnderflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("Math error - pow base out of range: {0}")]
    PowBaseOutOfRange(U256),
    #[error("Math error - exponent out of bounds")]
    ExponentOutOfBounds,
    #[error("Math error - logarithm of a non-positive value")]
    LogArgumentNotPositive,
}

/// Price feed errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Latest round is older than the staleness timeout
    #[error("Stale oracle {oracle}: updated at {timestamp}, now {now}")]
    StaleOracle {
        oracle: String,
        timestamp: u64,
        now: u64,
    },
    /// Latest round reported a zero or negative answer
    #[error("Non-positive price from oracle {0}")]
    NonPositivePrice(String),
    #[error("Round {round_id} not found for oracle {oracle}")]
    RoundNotFound { oracle: String, round_id: u128 },
    #[error("Unknown price feed: {0}")]
    UnknownFeed(String),
    #[error("Price feed unavailable: {0}")]
    FeedUnavailable(String),
    #[error("Invalid price history fixture: {0}")]
    InvalidFixture(String),
}

/// Economic guard and pool state errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("Spot price before swap exceeds max price")]
    BadLimitPrice,
    #[error("Spot price after swap exceeds max price")]
    LimitPrice,
    #[error("Amount in exceeds limit")]
    LimitIn,
    #[error("Amount out below limit")]
    LimitOut,
    #[error("Amount in exceeds max in ratio")]
    MaxInRatio,
    #[error("Amount out exceeds max out ratio")]
    MaxOutRatio,
    #[error("Math approximation check failed")]
    MathApproximation,
    #[error("Price unpeg ratio {ratio} exceeds {max}")]
    MaxPriceUnpegRatio { ratio: U256, max: U256 },
    #[error("Unknown token: {0}")]
    UnknownToken(String),
    #[error("Token in and token out are the same: {0}")]
    SameToken(String),
    #[error("Duplicate token: {0}")]
    DuplicateToken(String),
    #[error("Invalid token count {0}, expected 2 to 8")]
    InvalidTokenCount(usize),
    #[error("Weight of {token} out of bounds: {weight}")]
    WeightOutOfBounds { token: String, weight: U256 },
    #[error("Total weight exceeds maximum: {0}")]
    MaxTotalWeight(U256),
    #[error("Balance of {token} below minimum: {balance}")]
    MinBalance { token: String, balance: U256 },
    #[error("Invalid pool amount")]
    InvalidPoolAmount,
    #[error("Expected {expected} token amounts, got {actual}")]
    AmountsLength { expected: usize, actual: usize },
    #[error("Computed token amount is zero")]
    ZeroAmount,
}

/// Configuration bound violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfBounds {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },
    #[error("{name} must not be negative: {value}")]
    Negative { name: &'static str, value: String },
}

/// Crate-wide error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
