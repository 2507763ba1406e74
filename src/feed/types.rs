//! Price feed types

use alloy_primitives::{I256, U256};
use serde::Serialize;

/// A raw round as reported by a price feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundData {
    /// Round identifier, monotonic per feed (phase-encoded, fits 80 bits)
    pub round_id: u128,
    /// Answer scaled by the feed's own decimals; may be non-positive
    pub price: I256,
    /// Update time (seconds since epoch)
    pub timestamp: u64,
}

/// A validated latest round: positive price, fresh timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestRound {
    /// Feed identifier the round was read from
    pub oracle: String,
    pub round_id: u128,
    /// Positive answer scaled by the feed's decimals
    pub price: U256,
    pub timestamp: u64,
}
