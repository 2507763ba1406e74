//! Integration tests for configuration loading

use oracle_amm::config::{Config, PoolConfig};
use oracle_amm::error::ConfigError;
use oracle_amm::math::{from_int, U256};
use oracle_amm::telemetry::LogFormat;
use std::io::Write;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_example_config_loads() {
    let file = write_config(include_str!("../../config.toml.example"));
    let config = Config::load(file.path()).unwrap();

    let pool = config.pool_config().unwrap();
    assert_eq!(pool.swap_fee, U256::from(2_500_000_000_000_000u64));
    assert_eq!(pool, PoolConfig::default());
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);

    let tokens = config.bound_tokens().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].weight, from_int(25));
}

#[test]
fn test_out_of_bounds_fee_rejected() {
    let file = write_config(
        r#"
        [pool]
        swap_fee = 0.5
        max_price_unpeg_ratio = 1.05

        [oracle]
        history_path = "history.json"
        "#,
    );
    let config = Config::load(file.path()).unwrap();
    assert!(matches!(
        config.pool_config(),
        Err(ConfigError::OutOfBounds { name: "swap_fee", .. })
    ));
}

#[test]
fn test_negative_balance_rejected() {
    let file = write_config(
        r#"
        [pool]
        swap_fee = 0.0025
        max_price_unpeg_ratio = 1.05

        [oracle]
        history_path = "history.json"

        [[tokens]]
        symbol = "WETH"
        oracle = "eth-usd"
        balance = -1
        weight = 5
        "#,
    );
    let config = Config::load(file.path()).unwrap();
    assert!(matches!(
        config.bound_tokens(),
        Err(ConfigError::Negative { name: "tokens.balance", .. })
    ));
}

#[test]
fn test_malformed_config_is_an_error() {
    let file = write_config("[pool]\nswap_fee = \"cheap\"\n");
    assert!(Config::load(file.path()).is_err());
}
