//! Constant-weighted pool formulas
//!
//! The invariant is `Π balance_i ^ weight_i`. All powers go through
//! [`fixed_point::pow`], so bases must stay within its domain.

use crate::error::MathError;
use crate::math::fixed_point::{add, div, mul, pow, sub};
use crate::math::{ONE, U256};

type Result<T> = std::result::Result<T, MathError>;

/// Exit fee charged on pool shares, currently disabled
pub const EXIT_FEE: U256 = U256::ZERO;

/// Price of tokenOut in tokenIn, fee included
///
/// `(balance_in / weight_in) / (balance_out / weight_out) / (1 - fee)`
pub fn calc_spot_price(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    fee: U256,
) -> Result<U256> {
    let numer = div(balance_in, weight_in)?;
    let denom = div(balance_out, weight_out)?;
    let ratio = div(numer, denom)?;
    let scale = div(ONE, sub(ONE, fee)?)?;
    mul(ratio, scale)
}

/// `balance_out * (1 - (balance_in / (balance_in + amount_in * (1 - fee)))^(weight_in / weight_out))`
pub fn calc_out_given_in(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    amount_in: U256,
    fee: U256,
) -> Result<U256> {
    let weight_ratio = div(weight_in, weight_out)?;
    let adjusted_in = mul(amount_in, sub(ONE, fee)?)?;
    let y = div(balance_in, add(balance_in, adjusted_in)?)?;
    let foo = pow(y, weight_ratio)?;
    let bar = sub(ONE, foo)?;
    mul(balance_out, bar)
}

/// `balance_in * ((balance_out / (balance_out - amount_out))^(weight_out / weight_in) - 1) / (1 - fee)`
pub fn calc_in_given_out(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    amount_out: U256,
    fee: U256,
) -> Result<U256> {
    let weight_ratio = div(weight_out, weight_in)?;
    let diff = sub(balance_out, amount_out)?;
    let y = div(balance_out, diff)?;
    let foo = sub(pow(y, weight_ratio)?, ONE)?;
    div(mul(balance_in, foo)?, sub(ONE, fee)?)
}

/// Pool shares minted for a single-asset deposit
///
/// Only the part of the deposit that is implicitly swapped into the other
/// tokens, `1 - normalized_weight`, pays the fee.
pub fn calc_pool_out_given_single_in(
    balance_in: U256,
    weight_in: U256,
    pool_supply: U256,
    total_weight: U256,
    amount_in: U256,
    fee: U256,
) -> Result<U256> {
    let normalized_weight = div(weight_in, total_weight)?;
    let zaz = mul(sub(ONE, normalized_weight)?, fee)?;
    let amount_in_after_fee = mul(amount_in, sub(ONE, zaz)?)?;

    let new_balance_in = add(balance_in, amount_in_after_fee)?;
    let token_in_ratio = div(new_balance_in, balance_in)?;

    let pool_ratio = pow(token_in_ratio, normalized_weight)?;
    let new_pool_supply = mul(pool_ratio, pool_supply)?;
    sub(new_pool_supply, pool_supply)
}

/// Deposit needed to mint `pool_amount_out` shares
pub fn calc_single_in_given_pool_out(
    balance_in: U256,
    weight_in: U256,
    pool_supply: U256,
    total_weight: U256,
    pool_amount_out: U256,
    fee: U256,
) -> Result<U256> {
    let normalized_weight = div(weight_in, total_weight)?;
    let new_pool_supply = add(pool_supply, pool_amount_out)?;
    let pool_ratio = div(new_pool_supply, pool_supply)?;

    let boo = div(ONE, normalized_weight)?;
    let token_in_ratio = pow(pool_ratio, boo)?;
    let new_balance_in = mul(token_in_ratio, balance_in)?;
    let amount_in_after_fee = sub(new_balance_in, balance_in)?;

    let zar = mul(sub(ONE, normalized_weight)?, fee)?;
    div(amount_in_after_fee, sub(ONE, zar)?)
}

/// Tokens paid out for burning `pool_amount_in` shares
pub fn calc_single_out_given_pool_in(
    balance_out: U256,
    weight_out: U256,
    pool_supply: U256,
    total_weight: U256,
    pool_amount_in: U256,
    fee: U256,
) -> Result<U256> {
    let normalized_weight = div(weight_out, total_weight)?;
    let pool_amount_in_after_exit_fee = mul(pool_amount_in, sub(ONE, EXIT_FEE)?)?;
    let new_pool_supply = sub(pool_supply, pool_amount_in_after_exit_fee)?;
    let pool_ratio = div(new_pool_supply, pool_supply)?;

    let token_out_ratio = pow(pool_ratio, div(ONE, normalized_weight)?)?;
    let new_balance_out = mul(token_out_ratio, balance_out)?;
    let amount_out_before_fee = sub(balance_out, new_balance_out)?;

    let zaz = mul(sub(ONE, normalized_weight)?, fee)?;
    mul(amount_out_before_fee, sub(ONE, zaz)?)
}

/// Pool shares burned to withdraw exactly `amount_out`
pub fn calc_pool_in_given_single_out(
    balance_out: U256,
    weight_out: U256,
    pool_supply: U256,
    total_weight: U256,
    amount_out: U256,
    fee: U256,
) -> Result<U256> {
    let normalized_weight = div(weight_out, total_weight)?;
    let zoo = sub(ONE, normalized_weight)?;
    let zar = mul(zoo, fee)?;
    let amount_out_before_fee = div(amount_out, sub(ONE, zar)?)?;

    let new_balance_out = sub(balance_out, amount_out_before_fee)?;
    let token_out_ratio = div(new_balance_out, balance_out)?;

    let pool_ratio = pow(token_out_ratio, normalized_weight)?;
    let new_pool_supply = mul(pool_ratio, pool_supply)?;
    let pool_amount_in_after_exit_fee = sub(pool_supply, new_pool_supply)?;
    div(pool_amount_in_after_exit_fee, sub(ONE, EXIT_FEE)?)
}
