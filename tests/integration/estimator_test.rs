//! Integration tests for history sampling and GBM estimation

use oracle_amm::feed::{InMemoryPriceFeed, LatestRound, PriceFeedReader};
use oracle_amm::math::{I256, U256};
use oracle_amm::model::{historical_prices, GbmEstimation, GbmEstimator, HistoricalPricesParameters};

const NOW: u64 = 1_650_003_600;

fn price(value: u64) -> I256 {
    I256::from_raw(U256::from(value))
}

fn params(in_round: usize, in_sec: u64) -> HistoricalPricesParameters {
    HistoricalPricesParameters {
        lookback_in_round: in_round,
        lookback_in_sec: in_sec,
        timestamp: NOW,
        lookback_step_in_round: 1,
    }
}

fn fixture() -> InMemoryPriceFeed {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/history.json");
    InMemoryPriceFeed::load(path).unwrap()
}

const ETH: &str = "0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419";
const DAI: &str = "0xAed0c38402a5d19df6E4c03F4E2DceD6e29c1ee9";

#[test]
fn test_latest_round_older_than_window() {
    let mut feed = InMemoryPriceFeed::new();
    feed.add_feed("X", 8, "X / USD");
    feed.push_round("X", 1, price(100), NOW - 5_000);
    feed.push_round("X", 2, price(110), NOW - 4_000);

    let reader = PriceFeedReader::new(&feed);
    // built by hand: the round is too old to pass the staleness check
    let latest = LatestRound {
        oracle: "X".to_string(),
        round_id: 2,
        price: U256::from(110u64),
        timestamp: NOW - 4_000,
    };
    let history = historical_prices(&reader, &latest, &params(10, 3_600));
    assert_eq!(history.prices, vec![U256::from(110u64)]);
    assert_eq!(history.start_index, 0);
    assert!(history.no_more_data_point);
}

#[test]
fn test_fixture_history_walk() {
    let feed = fixture();
    let reader = PriceFeedReader::new(&feed);
    let latest = reader.latest_round(ETH, NOW).unwrap();

    let history = historical_prices(&reader, &latest, &params(5, 3_600));
    assert_eq!(history.prices.len(), 5);
    assert_eq!(history.start_index, 4);
    assert!(!history.no_more_data_point);
    assert_eq!(history.oldest_timestamp(), 1_650_001_200);

    // a shorter window stops on the first sample past the boundary
    let history = historical_prices(&reader, &latest, &params(10, 1_000));
    assert_eq!(history.timestamps, vec![NOW, 1_650_003_000, 1_650_002_400]);
    assert!(history.no_more_data_point);
}

#[test]
fn test_fixture_estimation() {
    let feed = fixture();
    let reader = PriceFeedReader::new(&feed);
    let latest_eth = reader.latest_round(ETH, NOW).unwrap();
    let latest_dai = reader.latest_round(DAI, NOW).unwrap();

    let estimation = GbmEstimator::new(&feed)
        .estimate(&latest_eth, &latest_dai, &params(5, 3_600))
        .unwrap();
    assert!(estimation.success);
    // DAI lost value against ETH over the window
    assert!(estimation.mean < I256::ZERO);
    assert!(estimation.variance > U256::ZERO);
}

#[test]
fn test_constant_prices_have_no_drift_or_variance() {
    let mut feed = InMemoryPriceFeed::new();
    feed.add_feed("IN", 8, "IN / USD");
    feed.add_feed("OUT", 8, "OUT / USD");
    for k in 0..6u64 {
        feed.push_round("IN", u128::from(k + 1), price(200_000_000), NOW - 500 + 100 * k);
        feed.push_round("OUT", u128::from(k + 1), price(100_000_000), NOW - 470 + 90 * k);
    }

    let reader = PriceFeedReader::new(&feed);
    let latest_in = reader.latest_round("IN", NOW).unwrap();
    let latest_out = reader.latest_round("OUT", NOW).unwrap();
    let estimation = GbmEstimator::new(&feed)
        .estimate(&latest_in, &latest_out, &params(10, 3_600))
        .unwrap();

    assert_eq!(
        estimation,
        GbmEstimation {
            mean: I256::ZERO,
            variance: U256::ZERO,
            success: true,
        }
    );
}

#[test]
fn test_single_round_feeds_fail() {
    let mut feed = InMemoryPriceFeed::new();
    feed.add_feed("IN", 8, "IN / USD");
    feed.add_feed("OUT", 8, "OUT / USD");
    feed.push_round("IN", 1, price(100), NOW - 10);
    feed.push_round("OUT", 1, price(100), NOW - 20);

    let reader = PriceFeedReader::new(&feed);
    let latest_in = reader.latest_round("IN", NOW).unwrap();
    let latest_out = reader.latest_round("OUT", NOW).unwrap();
    let estimation = GbmEstimator::new(&feed)
        .estimate(&latest_in, &latest_out, &params(10, 3_600))
        .unwrap();
    assert_eq!(estimation, GbmEstimation::failed());
}
