//! Pricing engine module
//!
//! Constant-weighted pool formulas and their oracle-aware variants.

mod mmm;
mod types;
mod weighted;

pub use mmm::{
    adaptive_fees, calc_adaptive_fee_given_in_and_out, calc_in_given_out_mmm,
    calc_out_given_in_mmm, check_price_unpeg, log_spread_factor, mmm_weight,
    token_balance_at_equilibrium, total_weight_mmm,
};
pub use types::{
    OracleContext, PriceResult, Regime, SwapParameters, SwapResult, TokenGlobal, TokenRecord,
};
pub use weighted::{
    calc_in_given_out, calc_out_given_in, calc_pool_in_given_single_out,
    calc_pool_out_given_single_in, calc_single_in_given_pool_out, calc_single_out_given_pool_in,
    calc_spot_price, EXIT_FEE,
};
