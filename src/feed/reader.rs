//! Validating reads over a [`PriceFeed`]

use super::{LatestRound, PriceFeed};
use crate::error::{MathError, OracleError};
use crate::math::fixed_point;
use crate::math::{ONE, U256};

/// Maximum age of a latest round, in seconds
pub const ORACLE_TIMEOUT: u64 = 120;

/// Reads rounds from a feed, rejecting stale or non-positive latest rounds
pub struct PriceFeedReader<'a, F: PriceFeed + ?Sized> {
    feed: &'a F,
}

impl<'a, F: PriceFeed + ?Sized> PriceFeedReader<'a, F> {
    /// Create a reader over the given feed
    pub fn new(feed: &'a F) -> Self {
        Self { feed }
    }

    /// Fetch and validate the latest round of `oracle` at time `now`
    pub fn latest_round(&self, oracle: &str, now: u64) -> Result<LatestRound, OracleError> {
        let round = self.feed.latest_round_data(oracle)?;

        if round.price <= alloy_primitives::I256::ZERO {
            return Err(OracleError::NonPositivePrice(oracle.to_string()));
        }
        if now.saturating_sub(round.timestamp) > ORACLE_TIMEOUT {
            return Err(OracleError::StaleOracle {
                oracle: oracle.to_string(),
                timestamp: round.timestamp,
                now,
            });
        }

        Ok(LatestRound {
            oracle: oracle.to_string(),
            round_id: round.round_id,
            price: round.price.into_raw(),
            timestamp: round.timestamp,
        })
    }

    /// `(price, timestamp)` of a historical round, `(0, 0)` when unavailable
    pub fn round_data(&self, oracle: &str, round_id: u128) -> (U256, u64) {
        match self.feed.round_data(oracle, round_id) {
            Ok(round) if round.price > alloy_primitives::I256::ZERO && round.timestamp > 0 => {
                (round.price.into_raw(), round.timestamp)
            }
            Ok(_) => (U256::ZERO, 0),
            Err(e) => {
                tracing::trace!(oracle, round_id, error = %e, "Round unavailable");
                (U256::ZERO, 0)
            }
        }
    }

    /// Worst-case relative price seen within the current block
    ///
    /// Walks back from each latest round while its timestamp equals `now`,
    /// keeping the lowest tokenIn price and the highest tokenOut price,
    /// the first round of an earlier block included. Returns zero when the
    /// history runs out before leaving the block.
    pub fn max_relative_price_in_last_block(
        &self,
        latest_in: &LatestRound,
        decimals_in: u8,
        latest_out: &LatestRound,
        decimals_out: u8,
        now: u64,
    ) -> Result<U256, MathError> {
        let Some(min_price_in) = self.extreme_price_in_block(latest_in, now, std::cmp::min) else {
            return Ok(U256::ZERO);
        };
        let Some(max_price_out) = self.extreme_price_in_block(latest_out, now, std::cmp::max) else {
            return Ok(U256::ZERO);
        };

        token_relative_price(min_price_in, decimals_in, max_price_out, decimals_out)
    }

    fn extreme_price_in_block(
        &self,
        latest: &LatestRound,
        now: u64,
        pick: fn(U256, U256) -> U256,
    ) -> Option<U256> {
        let mut extreme = latest.price;
        let mut timestamp = latest.timestamp;
        let mut round_id = latest.round_id;

        while timestamp == now {
            round_id = round_id.checked_sub(1)?;
            let (price, ts) = self.round_data(&latest.oracle, round_id);
            if price.is_zero() {
                return None;
            }
            extreme = pick(extreme, price);
            timestamp = ts;
        }

        Some(extreme)
    }
}

fn pow10(exponent: u8) -> Result<U256, MathError> {
    let ten = U256::from(10u8);
    (0..exponent).try_fold(U256::from(1u8), |acc, _| {
        acc.checked_mul(ten).ok_or(MathError::ArithmeticOverflow)
    })
}

/// Amount of tokenIn worth one unit of tokenOut, in fixed point
///
/// Decimals are the sum of token and oracle decimals of each side.
pub fn token_relative_price(
    price_in: U256,
    decimals_in: u8,
    price_out: U256,
    decimals_out: u8,
) -> Result<U256, MathError> {
    let raw = fixed_point::div(price_out, price_in)?;
    match decimals_in.cmp(&decimals_out) {
        std::cmp::Ordering::Equal => Ok(raw),
        std::cmp::Ordering::Greater => raw
            .checked_mul(pow10(decimals_in - decimals_out)?)
            .ok_or(MathError::ArithmeticOverflow),
        std::cmp::Ordering::Less => {
            let scale = pow10(decimals_out - decimals_in)?
                .checked_mul(ONE)
                .ok_or(MathError::ArithmeticOverflow)?;
            fixed_point::div(raw, scale)
        }
    }
}
