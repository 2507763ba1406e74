//! Integration tests for the pool orchestrator over recorded oracle history

use oracle_amm::cli::build_pool;
use oracle_amm::config::Config;
use oracle_amm::error::{Error, OracleError, PoolError};
use oracle_amm::feed::InMemoryPriceFeed;
use oracle_amm::math::{from_int, U256};
use oracle_amm::pool::Pool;

const NOW: u64 = 1_650_003_600;

fn config() -> Config {
    let mut config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    config.oracle.history_path =
        concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/history.json").into();
    config
}

fn pool() -> Pool<InMemoryPriceFeed> {
    build_pool(&config()).unwrap()
}

fn milli(n: u64) -> U256 {
    from_int(n) / U256::from(1_000u64)
}

fn assert_between(value: U256, low: U256, high: U256) {
    assert!(low < value && value < high, "{} outside ({}, {})", value, low, high);
}

#[test]
fn test_pool_from_config() {
    let pool = pool();
    assert_eq!(pool.tokens().len(), 2);
    assert_eq!(pool.total_supply(), from_int(100));
    assert_eq!(pool.token("DAI").unwrap().balance, from_int(305_000));
}

#[test]
fn test_quote_exact_in_near_oracle_price() {
    let pool = pool();
    let quote = pool
        .quote_exact_in("WETH", from_int(1), "DAI", U256::ZERO, U256::MAX, NOW)
        .unwrap();
    assert_between(quote.amount, from_int(2_900), from_int(3_050));
    assert!(quote.price_result.spot_price_after > quote.price_result.spot_price_before);
    assert_eq!(quote.price_result.price_in, U256::from(305_000_000_000u64));

    let quote = pool
        .quote_exact_in("DAI", from_int(3_000), "WETH", U256::ZERO, U256::MAX, NOW)
        .unwrap();
    assert_between(quote.amount, milli(900), from_int(1));
}

#[test]
fn test_quote_exact_out() {
    let quote = pool()
        .quote_exact_out("WETH", U256::MAX, "DAI", from_int(1_000), U256::MAX, NOW)
        .unwrap();
    assert_between(quote.amount, milli(300), milli(400));

    let err = pool()
        .quote_exact_out("WETH", milli(100), "DAI", from_int(1_000), U256::MAX, NOW)
        .unwrap_err();
    assert_eq!(err, Error::Pool(PoolError::LimitIn));
}

#[test]
fn test_swap_updates_balances() {
    let mut pool = pool();
    let quote = pool
        .swap_exact_amount_in("WETH", from_int(1), "DAI", U256::ZERO, U256::MAX, NOW)
        .unwrap();
    assert_eq!(pool.token("WETH").unwrap().balance, from_int(101));
    assert_eq!(pool.token("DAI").unwrap().balance, from_int(305_000) - quote.amount);
    assert_eq!(pool.total_supply(), from_int(100));
}

#[test]
fn test_large_swap_breaks_peg() {
    let err = pool()
        .quote_exact_in("WETH", from_int(20), "DAI", U256::ZERO, U256::MAX, NOW)
        .unwrap_err();
    assert!(matches!(err, Error::Pool(PoolError::MaxPriceUnpegRatio { .. })));
}

#[test]
fn test_max_in_ratio() {
    let err = pool()
        .quote_exact_in("WETH", from_int(51), "DAI", U256::ZERO, U256::MAX, NOW)
        .unwrap_err();
    assert_eq!(err, Error::Pool(PoolError::MaxInRatio));
}

#[test]
fn test_max_price_limits() {
    let err = pool()
        .quote_exact_in("WETH", from_int(1), "DAI", U256::ZERO, U256::from(1u8), NOW)
        .unwrap_err();
    assert_eq!(err, Error::Pool(PoolError::BadLimitPrice));
}

#[test]
fn test_stale_oracle() {
    let err = pool()
        .quote_exact_in("WETH", from_int(1), "DAI", U256::ZERO, U256::MAX, NOW + 200)
        .unwrap_err();
    assert!(matches!(err, Error::Oracle(OracleError::StaleOracle { .. })));
}

#[test]
fn test_single_asset_join_and_exit() {
    let mut pool = pool();
    let join = pool.join_swap_extern_amount_in("WETH", from_int(1), U256::ZERO, NOW).unwrap();
    assert_between(join.pool_amount_out, milli(400), milli(500));
    assert_eq!(pool.total_supply(), from_int(100) + join.pool_amount_out);
    assert_eq!(pool.token("WETH").unwrap().balance, from_int(101));

    let quote = self::pool().quote_exit_single_asset("WETH", from_int(1), NOW).unwrap();
    assert_between(quote.amount_out, milli(1_900), from_int(2));

    let err = self::pool().quote_exit_single_asset("WETH", from_int(100), NOW).unwrap_err();
    assert_eq!(err, Error::Pool(PoolError::InvalidPoolAmount));
}

#[test]
fn test_estimate_pair() {
    let estimation = pool().estimate("WETH", "DAI", NOW).unwrap();
    assert!(estimation.success);
}

#[test]
fn test_six_decimal_token_tracks_oracle() {
    let mut config = config();
    config.tokens[1].decimals = 6;
    let pool = build_pool(&config).unwrap();
    let dai = |n: u64| U256::from(n) * U256::from(1_000_000u64);
    assert_eq!(pool.token("DAI").unwrap().balance, dai(305_000));

    let quote = pool
        .quote_exact_in("DAI", dai(3_000), "WETH", U256::ZERO, U256::MAX, NOW)
        .unwrap();
    assert_between(quote.amount, milli(900), from_int(1));

    let quote = pool
        .quote_exact_in("WETH", from_int(1), "DAI", U256::ZERO, U256::MAX, NOW)
        .unwrap();
    assert_between(quote.amount, dai(2_900), dai(3_050));

    // same trade on the 18-decimal pool, rescaled to 6 decimals
    let wide = self::pool()
        .quote_exact_in("WETH", from_int(1), "DAI", U256::ZERO, U256::MAX, NOW)
        .unwrap()
        .amount
        / U256::from(1_000_000_000_000u64);
    assert_between(quote.amount, wide - U256::from(1_000u64), wide + U256::from(1_000u64));
}
