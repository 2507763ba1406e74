//! Pool module
//!
//! Composes the price feed, the GBM estimator and the pricing engine into
//! quotes, and applies successful quotes to the pool's balances.

mod orchestrator;
mod types;

pub use orchestrator::Pool;
pub use types::{BoundToken, ExitQuote, JoinQuote, SwapQuote};

use crate::math::U256;

/// Largest swap-in amount as a share of the balance, 1/2
pub const MAX_IN_RATIO: U256 = U256::from_limbs([500_000_000_000_000_000, 0, 0, 0]);
/// Largest swap-out amount as a share of the balance, 1/3 + 1 wei
pub const MAX_OUT_RATIO: U256 = U256::from_limbs([333_333_333_333_333_334, 0, 0, 0]);

pub const MIN_WEIGHT: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
pub const MAX_WEIGHT: U256 = U256::from_limbs([13_106_511_852_580_896_768, 2, 0, 0]);
pub const MAX_TOTAL_WEIGHT: U256 = MAX_WEIGHT;
pub const MIN_BALANCE: U256 = U256::from_limbs([1_000_000, 0, 0, 0]);

pub const MIN_BOUND_TOKENS: usize = 2;
pub const MAX_BOUND_TOKENS: usize = 8;

/// Pool shares minted when the pool is created
pub const INIT_POOL_SUPPLY: U256 = U256::from_limbs([7_766_279_631_452_241_920, 5, 0, 0]);
