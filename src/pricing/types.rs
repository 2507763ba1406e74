//! Pricing engine types

use crate::feed::LatestRound;
use crate::math::U256;
use serde::Serialize;

/// Pricing state of a bound token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRecord {
    /// Token decimals plus oracle decimals
    pub decimals: u8,
    pub balance: U256,
    /// Denormalized weight
    pub weight: U256,
}

/// A token's record together with its oracle round, built per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGlobal {
    pub info: TokenRecord,
    pub latest_round: LatestRound,
}

/// Per-call pricing knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapParameters {
    /// Exact amount of the swap (tokenIn for exact-in, tokenOut for exact-out)
    pub amount: U256,
    pub fee: U256,
    pub fallback_spread: U256,
}

/// Oracle inputs of an MMM pricing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleContext {
    /// Amount of tokenIn worth one unit of tokenOut
    pub relative_price: U256,
    /// Worst relative price seen in the current block, zero when unknown
    pub recent_price_upper_bound: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapResult {
    /// Computed amount out (exact-in) or amount in (exact-out)
    pub amount: U256,
    /// Spread applied, zero when none
    pub spread: U256,
    /// Portion of the amount priced with the spread
    pub tax_base: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceResult {
    pub spot_price_before: U256,
    pub spot_price_after: U256,
    /// Oracle price of tokenIn
    pub price_in: U256,
    /// Oracle price of tokenOut
    pub price_out: U256,
}

/// State of tokenOut relative to the oracle equilibrium over a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Scarce before and after the trade
    Shortage,
    /// Plentiful before and after the trade
    Abundance,
    /// Crosses the equilibrium
    Mixed,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Shortage => "shortage",
            Regime::Abundance => "abundance",
            Regime::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
