//! Price feed module
//!
//! The oracle capability consumed by the pricing core, a validating reader
//! on top of it, and an in-memory feed replaying recorded round history.

mod memory;
mod reader;
mod types;

pub use memory::InMemoryPriceFeed;
pub use reader::{token_relative_price, PriceFeedReader, ORACLE_TIMEOUT};
pub use types::{LatestRound, RoundData};

use crate::error::OracleError;
use std::sync::Arc;

/// Trait for price feed implementations
///
/// Feeds are addressed by an oracle identifier. `round_data` reports a
/// missing round as [`OracleError::RoundNotFound`].
pub trait PriceFeed: Send + Sync {
    /// Most recent round of the feed
    fn latest_round_data(&self, oracle: &str) -> Result<RoundData, OracleError>;
    /// A specific historical round
    fn round_data(&self, oracle: &str, round_id: u128) -> Result<RoundData, OracleError>;
    /// Decimals of the feed's answers
    fn decimals(&self, oracle: &str) -> Result<u8, OracleError>;
    /// Human-readable feed description, e.g. "ETH / USD"
    fn description(&self, oracle: &str) -> Result<String, OracleError>;
}

impl<T: PriceFeed + ?Sized> PriceFeed for Arc<T> {
    fn latest_round_data(&self, oracle: &str) -> Result<RoundData, OracleError> {
        (**self).latest_round_data(oracle)
    }

    fn round_data(&self, oracle: &str, round_id: u128) -> Result<RoundData, OracleError> {
        (**self).round_data(oracle, round_id)
    }

    fn decimals(&self, oracle: &str) -> Result<u8, OracleError> {
        (**self).decimals(oracle)
    }

    fn description(&self, oracle: &str) -> Result<String, OracleError> {
        (**self).description(oracle)
    }
}
