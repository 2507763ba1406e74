//! Pool types

use crate::math::U256;
use crate::pricing::{PriceResult, Regime, SwapResult};

/// A token bound to the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundToken {
    pub symbol: String,
    /// Identifier of the token's price feed
    pub oracle: String,
    /// Token decimals, without the oracle's
    pub decimals: u8,
    pub balance: U256,
    /// Denormalized weight
    pub weight: U256,
}

/// Outcome of a swap quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
    /// Amount out for exact-in swaps, amount in for exact-out swaps
    pub amount: U256,
    pub spot_price_after: U256,
    pub swap_result: SwapResult,
    pub price_result: PriceResult,
    pub regime: Regime,
}

/// Outcome of a single-asset join quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinQuote {
    pub pool_amount_out: U256,
    /// Spread-adjusted total weight the shares were priced with
    pub total_weight: U256,
}

/// Outcome of a single-asset exit quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitQuote {
    pub amount_out: U256,
    /// Spread-adjusted total weight the withdrawal was priced with
    pub total_weight: U256,
}
