//! Integration tests for the pricing engine

use oracle_amm::math::{fixed_point, from_int, log_exp, I256, ONE, U256};
use oracle_amm::model::{GbmEstimation, GbmParameters};
use oracle_amm::pricing::{
    calc_in_given_out_mmm, calc_out_given_in, calc_out_given_in_mmm, calc_spot_price,
    check_price_unpeg, OracleContext, Regime, SwapParameters, TokenRecord,
};

const FEE: u64 = 2_500_000_000_000_000;
const FALLBACK_SPREAD: u64 = 3_000_000_000_000_000;

fn record(balance: u64, weight: u64) -> TokenRecord {
    TokenRecord {
        decimals: 26,
        balance: from_int(balance),
        weight: from_int(weight),
    }
}

fn params(amount: U256) -> SwapParameters {
    SwapParameters {
        amount,
        fee: U256::from(FEE),
        fallback_spread: U256::from(FALLBACK_SPREAD),
    }
}

fn oracle(relative_price: U256) -> OracleContext {
    OracleContext {
        relative_price,
        recent_price_upper_bound: relative_price,
    }
}

fn estimation(variance: u64) -> GbmEstimation {
    GbmEstimation {
        mean: I256::ZERO,
        variance: U256::from(variance),
        success: true,
    }
}

fn gbm() -> GbmParameters {
    GbmParameters {
        z: U256::from(600_000_000_000_000_000u64),
        horizon: from_int(300),
    }
}

fn assert_close(actual: U256, expected: U256, tolerance: u64) {
    let (diff, _) = fixed_point::sub_sign(actual, expected);
    assert!(
        diff <= U256::from(tolerance),
        "{} differs from {} by {}",
        actual,
        expected,
        diff
    );
}

#[test]
fn test_no_spread_matches_weighted_formula() {
    let (result, regime) = calc_out_given_in_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(10)),
        &oracle(ONE),
        &estimation(0),
        &gbm(),
    )
    .unwrap();

    let fee = U256::from(FEE);
    let plain =
        calc_out_given_in(from_int(1_000), from_int(5), from_int(1_000), from_int(5), from_int(10), fee)
            .unwrap();
    assert_eq!(regime, Regime::Shortage);
    assert_eq!(result.amount, plain);
    assert_eq!(result.amount, U256::from(9_876_482_091_140_870_000u64));
}

#[test]
fn test_volatility_spread_reduces_output() {
    let (result, regime) = calc_out_given_in_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(10)),
        &oracle(ONE),
        &estimation(1_000_000_000_000),
        &gbm(),
    )
    .unwrap();

    assert_eq!(regime, Regime::Shortage);
    assert_eq!(result.spread, U256::from(14_805_469_496_211_706u64));
    assert_eq!(result.amount, U256::from(9_733_093_031_709_641_000u64));
    assert!(result.amount < U256::from(9_876_482_091_140_870_000u64));
}

#[test]
fn test_failed_estimation_uses_fallback_spread() {
    let (result, _) = calc_out_given_in_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(10)),
        &oracle(ONE),
        &GbmEstimation::failed(),
        &gbm(),
    )
    .unwrap();
    assert_eq!(result.spread, U256::from(FALLBACK_SPREAD));
    assert_eq!(result.amount, U256::from(9_847_087_193_347_647_000u64));
}

#[test]
fn test_regimes_follow_equilibrium() {
    // tokenIn is cheap: equilibrium balance of tokenIn is ~1048.8
    let relative_price = U256::from(1_100_000_000_000_000_000u64);

    let (small, regime) = calc_out_given_in_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(10)),
        &oracle(relative_price),
        &estimation(1_000_000_000_000),
        &gbm(),
    )
    .unwrap();
    assert_eq!(regime, Regime::Abundance);
    assert_eq!(small.spread, U256::from(FEE));
    assert_eq!(small.tax_base, U256::ZERO);

    let (large, regime) = calc_out_given_in_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(100)),
        &oracle(relative_price),
        &estimation(1_000_000_000_000),
        &gbm(),
    )
    .unwrap();
    assert_eq!(regime, Regime::Mixed);
    assert_eq!(large.amount, U256::from(90_066_641_351_234_431_644u128));
    assert_eq!(large.tax_base, U256::from(51_191_151_829_848_453_340u128));
}

#[test]
fn test_abundance_without_block_history_charges_fallback() {
    let context = OracleContext {
        relative_price: U256::from(1_100_000_000_000_000_000u64),
        recent_price_upper_bound: U256::ZERO,
    };
    let (result, regime) = calc_out_given_in_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(10)),
        &context,
        &estimation(0),
        &gbm(),
    )
    .unwrap();
    assert_eq!(regime, Regime::Abundance);
    assert_eq!(result.spread, U256::from(FALLBACK_SPREAD));
    assert_eq!(result.amount, U256::from(9_871_580_343_970_613_000u64));
}

#[test]
fn test_in_given_out_inverts_out_given_in() {
    let (out, _) = calc_out_given_in_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(10)),
        &oracle(ONE),
        &estimation(1_000_000_000_000),
        &gbm(),
    )
    .unwrap();
    let (back, _) = calc_in_given_out_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(out.amount),
        &oracle(ONE),
        &estimation(1_000_000_000_000),
        &gbm(),
    )
    .unwrap();
    assert_eq!(back.amount, U256::from(9_999_999_999_663_123_810u64));
    assert_close(back.amount, from_int(10), 1_000_000_000);
}

#[test]
fn test_output_monotonic_in_amount() {
    let mut previous = U256::ZERO;
    for amount in [1u64, 5, 10, 50, 100, 200] {
        let (result, _) = calc_out_given_in_mmm(
            &record(1_000, 5),
            &record(1_000, 5),
            &params(from_int(amount)),
            &oracle(U256::from(1_100_000_000_000_000_000u64)),
            &estimation(1_000_000_000_000),
            &gbm(),
        )
        .unwrap();
        assert!(result.amount > previous, "output not increasing at {}", amount);
        previous = result.amount;
    }
}

#[test]
fn test_spot_price_rises_after_swap() {
    let (weight, fee) = (from_int(5), U256::from(FEE));
    let before = calc_spot_price(from_int(1_000), weight, from_int(1_000), weight, fee).unwrap();
    let out = calc_out_given_in(from_int(1_000), weight, from_int(1_000), weight, from_int(10), fee)
        .unwrap();
    let after = calc_spot_price(from_int(1_010), weight, from_int(1_000) - out, weight, fee).unwrap();
    assert!(after > before);
    assert!(before <= fixed_point::div(from_int(10), out).unwrap());
}

#[test]
fn test_power_identity() {
    let base = U256::from(1_500_000_000_000_000_000u64);
    let a = fixed_point::pow(base, U256::from(300_000_000_000_000_000u64)).unwrap();
    let b = fixed_point::pow(base, U256::from(700_000_000_000_000_000u64)).unwrap();
    assert_close(fixed_point::mul(a, b).unwrap(), base, 1_000_000_000);

    let quarter = log_exp::pow(from_int(2), U256::from(250_000_000_000_000_000u64)).unwrap();
    let half = log_exp::pow(from_int(2), ONE / U256::from(2u8)).unwrap();
    assert_close(fixed_point::mul(quarter, quarter).unwrap(), half, 1_000);
}

#[test]
fn test_unpeg_boundary_with_fee() {
    let max = U256::from(1_050_000_000_000_000_000u64);
    let fee = U256::from(FEE);
    // spot * (1 - fee) == max exactly
    let spot = fixed_point::div(max, ONE - fee).unwrap();
    assert_eq!(fixed_point::mul(spot, ONE - fee).unwrap(), max);
    assert!(check_price_unpeg(spot, fee, ONE, max).is_ok());
    assert!(check_price_unpeg(spot + from_int(1) / U256::from(100u8), fee, ONE, max).is_err());
}

#[test]
fn test_in_block_price_rise_raises_abundance_fee() {
    let context = OracleContext {
        relative_price: U256::from(1_100_000_000_000_000_000u64),
        recent_price_upper_bound: U256::from(1_200_000_000_000_000_000u64),
    };
    let (result, regime) = calc_out_given_in_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(10)),
        &context,
        &estimation(0),
        &gbm(),
    )
    .unwrap();
    assert_eq!(regime, Regime::Abundance);
    assert_eq!(result.spread, U256::from(159_663_865_546_218_500u64));
    assert!(result.spread > U256::from(FEE));
    // output is capped at the in-block worst price: 10 / 1.2
    assert_eq!(result.amount, U256::from(8_333_333_333_333_333_000u64));
    assert_eq!(result.tax_base, U256::ZERO);

    let (result, regime) = calc_in_given_out_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(10)),
        &context,
        &estimation(0),
        &gbm(),
    )
    .unwrap();
    assert_eq!(regime, Regime::Abundance);
    assert_eq!(result.spread, U256::from(158_957_106_812_447_455u64));
    assert_eq!(result.amount, U256::from(12_010_101_010_101_010_377u64));
}

#[test]
fn test_in_given_out_abundance() {
    // tokenOut balance at equilibrium is ~953.46, so 10 out stays above it
    let (result, regime) = calc_in_given_out_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(10)),
        &oracle(U256::from(1_100_000_000_000_000_000u64)),
        &estimation(1_000_000_000_000),
        &gbm(),
    )
    .unwrap();
    assert_eq!(regime, Regime::Abundance);
    assert_eq!(result.spread, U256::from(FEE));
    assert_eq!(result.tax_base, U256::ZERO);
    assert_eq!(result.amount, U256::from(10_126_325_915_799_600_000u64));
}

#[test]
fn test_in_given_out_mixed_taxes_shortage_leg() {
    let relative_price = U256::from(1_100_000_000_000_000_000u64);
    let (out, regime) = calc_out_given_in_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(from_int(100)),
        &oracle(relative_price),
        &estimation(1_000_000_000_000),
        &gbm(),
    )
    .unwrap();
    assert_eq!(regime, Regime::Mixed);

    let (back, regime) = calc_in_given_out_mmm(
        &record(1_000, 5),
        &record(1_000, 5),
        &params(out.amount),
        &oracle(relative_price),
        &estimation(1_000_000_000_000),
        &gbm(),
    )
    .unwrap();
    assert_eq!(regime, Regime::Mixed);
    assert_eq!(back.amount, U256::from(99_998_100_553_109_064_442u128));
    assert_eq!(back.spread, U256::from(14_805_469_496_211_706u64));
    // only the tokenIn paid past equilibrium is taxed
    assert_eq!(back.tax_base, U256::from(51_066_924_442_681_448_402u128));
    assert!(back.tax_base < back.amount);
}
