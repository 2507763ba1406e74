//! Oracle-aware pricing (market-maker model)
//!
//! The oracle relative price defines an equilibrium balance for the pair.
//! While tokenOut is scarce relative to it (shortage), its weight is
//! inflated by a spread derived from the GBM statistics so the pool charges
//! for expected adverse moves. While tokenOut is plentiful (abundance), the
//! plain curve applies with an adaptive fee guarding against in-block
//! oracle updates. A trade crossing the equilibrium is split in two legs.

use super::types::{OracleContext, Regime, SwapParameters, SwapResult, TokenRecord};
use super::weighted::{calc_in_given_out, calc_out_given_in};
use crate::error::{MathError, PoolError};
use crate::math::fixed_point::{self, add, div, mul, sub};
use crate::math::log_exp;
use crate::math::{I256, ONE, U256};
use crate::model::{GbmEstimation, GbmParameters};

type Result<T> = std::result::Result<T, MathError>;

/// Balance of token 1 at which the pool price of token 2 equals `relative_price`
///
/// Keeps the invariant `balance_1^w1 * balance_2^w2` unchanged:
/// `(balance_2 * relative_price * w1 / w2)^(w2 / W) * balance_1^(w1 / W)`.
pub fn token_balance_at_equilibrium(
    balance_1: U256,
    weight_1: U256,
    balance_2: U256,
    weight_2: U256,
    relative_price: U256,
) -> Result<U256> {
    let total_weight = add(weight_1, weight_2)?;
    let scaled = div(mul(mul(balance_2, relative_price)?, weight_1)?, weight_2)?;
    let foo = log_exp::pow(scaled, div(weight_2, total_weight)?)?;
    let bar = log_exp::pow(balance_1, div(weight_1, total_weight)?)?;
    mul(foo, bar)
}

/// `mean * horizon + z * sqrt(2 * variance * horizon)`
pub fn log_spread_factor(mean: I256, variance: U256, z: U256, horizon: U256) -> Result<I256> {
    let drift = fixed_point::mul_signed(mean, fixed_point::to_signed(horizon)?)?;
    let two_variance = variance
        .checked_mul(U256::from(2u8))
        .ok_or(MathError::ArithmeticOverflow)?;
    let diffusion = mul(z, log_exp::sqrt(mul(two_variance, horizon)?)?)?;
    fixed_point::add_signed(drift, fixed_point::to_signed(diffusion)?)
}

/// Spread-adjusted weight and the spread applied
///
/// The weight is scaled up in shortage and down in abundance. A failed
/// estimation falls back to a fixed spread.
pub fn mmm_weight(
    shortage: bool,
    fallback_spread: U256,
    weight: U256,
    estimation: &GbmEstimation,
    gbm: &GbmParameters,
) -> Result<(U256, U256)> {
    if !estimation.success {
        let factor = add(ONE, fallback_spread)?;
        let adjusted = if shortage {
            mul(weight, factor)?
        } else {
            div(weight, factor)?
        };
        return Ok((adjusted, fallback_spread));
    }

    let log = log_spread_factor(estimation.mean, estimation.variance, gbm.z, gbm.horizon)?;
    if log <= I256::ZERO {
        return Ok((weight, U256::ZERO));
    }

    let spread_factor = log_exp::exp(log)?.into_raw();
    // below one is rounding noise
    if spread_factor <= ONE {
        return Ok((weight, U256::ZERO));
    }

    let adjusted = if shortage {
        mul(weight, spread_factor)?
    } else {
        div(weight, spread_factor)?
    };
    Ok((adjusted, spread_factor - ONE))
}

/// Fee of a trade pricing tokenOut at `balance_out / (balance_out - amount_out)`
///
/// `(balance_in + amount_in - balance_in * (balance_out / (balance_out - amount_out))^(w_out / w_in)) / amount_in`,
/// zero when negative.
pub fn calc_adaptive_fee_given_in_and_out(
    balance_in: U256,
    amount_in: U256,
    weight_in: U256,
    balance_out: U256,
    amount_out: U256,
    weight_out: U256,
) -> Result<U256> {
    let weight_ratio = div(weight_out, weight_in)?;
    let y = div(balance_out, sub(balance_out, amount_out)?)?;
    let foo = mul(balance_in, fixed_point::pow(y, weight_ratio)?)?;
    let after_swap_balance_in = add(balance_in, amount_in)?;
    if foo > after_swap_balance_in {
        return Ok(U256::ZERO);
    }
    div(after_swap_balance_in - foo, amount_in)
}

/// Fee of an abundance trade of `amount_in`
///
/// The base fee, raised when the oracle moved up within the current block,
/// or to the fallback spread when the in-block history is unavailable.
pub fn adaptive_fees(
    token_in: &TokenRecord,
    amount_in: U256,
    token_out: &TokenRecord,
    params: &SwapParameters,
    oracle: &OracleContext,
) -> Result<U256> {
    // Prior-block price unreadable: never charge less than the base fee.
    if oracle.recent_price_upper_bound.is_zero() {
        return Ok(params.fee.max(params.fallback_spread));
    }
    if oracle.recent_price_upper_bound <= oracle.relative_price {
        return Ok(params.fee);
    }

    let amount_out = div(amount_in, oracle.recent_price_upper_bound)?;
    let adaptive = calc_adaptive_fee_given_in_and_out(
        token_in.balance,
        amount_in,
        token_in.weight,
        token_out.balance,
        amount_out,
        token_out.weight,
    )?;
    Ok(params.fee.max(adaptive))
}

/// Amount of tokenOut for `params.amount` of tokenIn
pub fn calc_out_given_in_mmm(
    token_in: &TokenRecord,
    token_out: &TokenRecord,
    params: &SwapParameters,
    oracle: &OracleContext,
    estimation: &GbmEstimation,
    gbm: &GbmParameters,
) -> Result<(SwapResult, Regime)> {
    let balance_in_at_equilibrium = token_balance_at_equilibrium(
        token_in.balance,
        token_in.weight,
        token_out.balance,
        token_out.weight,
        oracle.relative_price,
    )?;

    if token_in.balance < balance_in_at_equilibrium
        && params.amount < balance_in_at_equilibrium - token_in.balance
    {
        let fee = adaptive_fees(token_in, params.amount, token_out, params, oracle)?;
        let amount = calc_out_given_in(
            token_in.balance,
            token_in.weight,
            token_out.balance,
            token_out.weight,
            params.amount,
            fee,
        )?;
        let result = SwapResult {
            amount,
            spread: fee,
            tax_base: U256::ZERO,
        };
        return Ok((result, Regime::Abundance));
    }

    let (adjusted_weight_out, spread) =
        mmm_weight(true, params.fallback_spread, token_out.weight, estimation, gbm)?;

    if token_in.balance >= balance_in_at_equilibrium {
        let amount = calc_out_given_in(
            token_in.balance,
            token_in.weight,
            token_out.balance,
            adjusted_weight_out,
            params.amount,
            params.fee,
        )?;
        let result = SwapResult {
            amount,
            spread,
            tax_base: params.amount,
        };
        return Ok((result, Regime::Shortage));
    }

    // up to equilibrium without spread, the remainder with it
    let first_leg_in = balance_in_at_equilibrium - token_in.balance;
    let fee = adaptive_fees(token_in, first_leg_in, token_out, params, oracle)?;
    let first_leg_out = calc_out_given_in(
        token_in.balance,
        token_in.weight,
        token_out.balance,
        token_out.weight,
        first_leg_in,
        fee,
    )?;

    let second_leg_in = sub(params.amount, first_leg_in)?;
    let second_leg_out = calc_out_given_in(
        balance_in_at_equilibrium,
        token_in.weight,
        sub(token_out.balance, first_leg_out)?,
        adjusted_weight_out,
        second_leg_in,
        params.fee,
    )?;

    let result = SwapResult {
        amount: add(first_leg_out, second_leg_out)?,
        spread,
        tax_base: second_leg_in,
    };
    Ok((result, Regime::Mixed))
}

/// Amount of tokenIn needed for exactly `params.amount` of tokenOut
pub fn calc_in_given_out_mmm(
    token_in: &TokenRecord,
    token_out: &TokenRecord,
    params: &SwapParameters,
    oracle: &OracleContext,
    estimation: &GbmEstimation,
    gbm: &GbmParameters,
) -> Result<(SwapResult, Regime)> {
    let balance_out_at_equilibrium = token_balance_at_equilibrium(
        token_out.balance,
        token_out.weight,
        token_in.balance,
        token_in.weight,
        div(ONE, oracle.relative_price)?,
    )?;

    if token_out.balance > balance_out_at_equilibrium
        && params.amount < token_out.balance - balance_out_at_equilibrium
    {
        let fee = adaptive_fees(
            token_in,
            mul(params.amount, oracle.relative_price)?,
            token_out,
            params,
            oracle,
        )?;
        let amount = calc_in_given_out(
            token_in.balance,
            token_in.weight,
            token_out.balance,
            token_out.weight,
            params.amount,
            fee,
        )?;
        let result = SwapResult {
            amount,
            spread: fee,
            tax_base: U256::ZERO,
        };
        return Ok((result, Regime::Abundance));
    }

    let (adjusted_weight_out, spread) =
        mmm_weight(true, params.fallback_spread, token_out.weight, estimation, gbm)?;

    if token_out.balance <= balance_out_at_equilibrium {
        let amount = calc_in_given_out(
            token_in.balance,
            token_in.weight,
            token_out.balance,
            adjusted_weight_out,
            params.amount,
            params.fee,
        )?;
        let result = SwapResult {
            amount,
            spread,
            tax_base: amount,
        };
        return Ok((result, Regime::Shortage));
    }

    let first_leg_out = token_out.balance - balance_out_at_equilibrium;
    let fee = adaptive_fees(
        token_in,
        mul(first_leg_out, oracle.relative_price)?,
        token_out,
        params,
        oracle,
    )?;
    let first_leg_in = calc_in_given_out(
        token_in.balance,
        token_in.weight,
        token_out.balance,
        token_out.weight,
        first_leg_out,
        fee,
    )?;

    let second_leg_out = sub(params.amount, first_leg_out)?;
    let second_leg_in = calc_in_given_out(
        add(token_in.balance, first_leg_in)?,
        token_in.weight,
        balance_out_at_equilibrium,
        adjusted_weight_out,
        second_leg_out,
        params.fee,
    )?;

    let result = SwapResult {
        amount: add(first_leg_in, second_leg_in)?,
        spread,
        tax_base: second_leg_in,
    };
    Ok((result, Regime::Mixed))
}

/// Effective total weight of a single-asset join or exit
///
/// Every non-pivot token is adjusted as if it alone were in shortage
/// (join) or in abundance (exit); the pivot keeps its weight.
pub fn total_weight_mmm(
    is_join: bool,
    fallback_spread: U256,
    pivot_weight: U256,
    others: &[(U256, GbmEstimation)],
    gbm: &GbmParameters,
) -> Result<U256> {
    others.iter().try_fold(pivot_weight, |total, (weight, estimation)| {
        let (adjusted, _) = mmm_weight(is_join, fallback_spread, *weight, estimation, gbm)?;
        add(total, adjusted)
    })
}

/// Reject a trade whose price drifts too far from the oracle
///
/// `spot_price_after * (1 - fee) / relative_price` must not exceed
/// `max_price_unpeg_ratio`.
pub fn check_price_unpeg(
    spot_price_after: U256,
    fee: U256,
    relative_price: U256,
    max_price_unpeg_ratio: U256,
) -> crate::error::Result<()> {
    let ratio = div(mul(spot_price_after, sub(ONE, fee)?)?, relative_price)?;
    if ratio > max_price_unpeg_ratio {
        return Err(PoolError::MaxPriceUnpegRatio {
            ratio,
            max: max_price_unpeg_ratio,
        }
        .into());
    }
    Ok(())
}
