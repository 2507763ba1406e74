//! In-memory price feed replaying recorded rounds
//!
//! Loads the JSON history dump format:
//!
//! ```json
//! { "ETH": { "oracle": "0x5f4e...", "data": [
//!     { "round_id": "110680464442257320164", "price": "200000000000", "timestamp": "1650000000" }
//! ] } }
//! ```
//!
//! Rounds may be listed in any order; the highest round id is the latest.

use super::{PriceFeed, RoundData};
use crate::error::OracleError;
use alloy_primitives::I256;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Default answer decimals of USD-quoted feeds
const DEFAULT_DECIMALS: u8 = 8;

#[derive(Debug, Deserialize)]
struct FeedFixture {
    oracle: String,
    #[serde(default)]
    decimals: Option<u8>,
    #[serde(default)]
    description: Option<String>,
    data: Vec<RoundFixture>,
}

#[derive(Debug, Deserialize)]
struct RoundFixture {
    round_id: String,
    price: String,
    timestamp: String,
}

#[derive(Debug, Clone, Default)]
struct FeedHistory {
    decimals: u8,
    description: String,
    rounds: BTreeMap<u128, RoundData>,
}

/// Deterministic feed backed by recorded rounds
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceFeed {
    feeds: HashMap<String, FeedHistory>,
}

impl InMemoryPriceFeed {
    /// Create an empty feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feed with no rounds
    pub fn add_feed(&mut self, oracle: impl Into<String>, decimals: u8, description: impl Into<String>) {
        self.feeds.insert(
            oracle.into(),
            FeedHistory {
                decimals,
                description: description.into(),
                rounds: BTreeMap::new(),
            },
        );
    }

    /// Record a round; unknown feeds are registered with default decimals
    pub fn push_round(&mut self, oracle: &str, round_id: u128, price: I256, timestamp: u64) {
        let history = self
            .feeds
            .entry(oracle.to_string())
            .or_insert_with(|| FeedHistory {
                decimals: DEFAULT_DECIMALS,
                description: oracle.to_string(),
                rounds: BTreeMap::new(),
            });
        history.rounds.insert(
            round_id,
            RoundData {
                round_id,
                price,
                timestamp,
            },
        );
    }

    /// Load feeds from a JSON history dump
    pub fn from_json(json: &str) -> Result<Self, OracleError> {
        let fixtures: BTreeMap<String, FeedFixture> =
            serde_json::from_str(json).map_err(|e| OracleError::InvalidFixture(e.to_string()))?;

        let mut feed = Self::new();
        for (symbol, fixture) in fixtures {
            feed.add_feed(
                fixture.oracle.clone(),
                fixture.decimals.unwrap_or(DEFAULT_DECIMALS),
                fixture.description.unwrap_or_else(|| format!("{} / USD", symbol)),
            );
            for round in fixture.data {
                let round_id = parse_int::<u128>(&round.round_id)?;
                let timestamp = parse_int::<u64>(&round.timestamp)?;
                let price = I256::from_dec_str(&round.price)
                    .map_err(|e| OracleError::InvalidFixture(format!("price {}: {}", round.price, e)))?;
                feed.push_round(&fixture.oracle, round_id, price, timestamp);
            }
        }

        tracing::debug!(feeds = feed.feeds.len(), "Loaded price history");
        Ok(feed)
    }

    /// Load feeds from a JSON history file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    fn history(&self, oracle: &str) -> Result<&FeedHistory, OracleError> {
        self.feeds
            .get(oracle)
            .ok_or_else(|| OracleError::UnknownFeed(oracle.to_string()))
    }
}

fn parse_int<T: std::str::FromStr>(value: &str) -> Result<T, OracleError> {
    value
        .parse()
        .map_err(|_| OracleError::InvalidFixture(format!("not an integer: {}", value)))
}

impl PriceFeed for InMemoryPriceFeed {
    fn latest_round_data(&self, oracle: &str) -> Result<RoundData, OracleError> {
        self.history(oracle)?
            .rounds
            .values()
            .next_back()
            .copied()
            .ok_or_else(|| OracleError::FeedUnavailable(oracle.to_string()))
    }

    fn round_data(&self, oracle: &str, round_id: u128) -> Result<RoundData, OracleError> {
        self.history(oracle)?
            .rounds
            .get(&round_id)
            .copied()
            .ok_or_else(|| OracleError::RoundNotFound {
                oracle: oracle.to_string(),
                round_id,
            })
    }

    fn decimals(&self, oracle: &str) -> Result<u8, OracleError> {
        Ok(self.history(oracle)?.decimals)
    }

    fn description(&self, oracle: &str) -> Result<String, OracleError> {
        Ok(self.history(oracle)?.description.clone())
    }
}
