//! Sampling of a feed's recent rounds

use super::HistoricalPricesParameters;
use crate::feed::{LatestRound, PriceFeed, PriceFeedReader};
use crate::math::U256;

/// Samples of one feed, latest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalPrices {
    pub prices: Vec<U256>,
    pub timestamps: Vec<u64>,
    /// Index of the oldest usable sample
    pub start_index: usize,
    /// Whether the walk ended on the time boundary rather than running out
    /// of rounds
    pub no_more_data_point: bool,
}

impl HistoricalPrices {
    /// Timestamp of the oldest usable sample
    pub fn oldest_timestamp(&self) -> u64 {
        self.timestamps[self.start_index]
    }
}

/// Walk a feed backward from its latest round
///
/// Rounds are visited every `lookback_step_in_round` ids, collecting at most
/// `lookback_in_round` samples. The first sample older than
/// `timestamp - lookback_in_sec` is kept and ends the walk on the time
/// boundary. A missing round or running out of round ids ends it early.
pub fn historical_prices<F: PriceFeed + ?Sized>(
    reader: &PriceFeedReader<'_, F>,
    latest: &LatestRound,
    params: &HistoricalPricesParameters,
) -> HistoricalPrices {
    let capacity = params.lookback_in_round.max(1);
    let mut prices = Vec::with_capacity(capacity);
    let mut timestamps = Vec::with_capacity(capacity);
    prices.push(latest.price);
    timestamps.push(latest.timestamp);

    let time_limit = params.timestamp.saturating_sub(params.lookback_in_sec);
    if latest.timestamp < time_limit {
        return HistoricalPrices {
            prices,
            timestamps,
            start_index: 0,
            no_more_data_point: true,
        };
    }

    let mut round_id = latest.round_id;
    while prices.len() < capacity {
        round_id = match round_id.checked_sub(params.lookback_step_in_round) {
            Some(id) if id > 0 => id,
            _ => break,
        };

        let (price, timestamp) = reader.round_data(&latest.oracle, round_id);
        if price.is_zero() {
            break;
        }
        prices.push(price);
        timestamps.push(timestamp);

        if timestamp < time_limit {
            let start_index = prices.len() - 1;
            return HistoricalPrices {
                prices,
                timestamps,
                start_index,
                no_more_data_point: true,
            };
        }
    }

    let start_index = prices.len() - 1;
    HistoricalPrices {
        prices,
        timestamps,
        start_index,
        no_more_data_point: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::InMemoryPriceFeed;
    use crate::math::I256;

    fn feed(rounds: &[(u128, u64, u64)]) -> InMemoryPriceFeed {
        let mut feed = InMemoryPriceFeed::new();
        feed.add_feed("ETH", 8, "ETH / USD");
        for &(id, price, ts) in rounds {
            feed.push_round("ETH", id, I256::from_raw(U256::from(price)), ts);
        }
        feed
    }

    fn params(in_round: usize, in_sec: u64, now: u64, step: u128) -> HistoricalPricesParameters {
        HistoricalPricesParameters {
            lookback_in_round: in_round,
            lookback_in_sec: in_sec,
            timestamp: now,
            lookback_step_in_round: step,
        }
    }

    #[test]
    fn test_latest_older_than_window() {
        let feed = feed(&[(4, 100, 500), (5, 110, 600)]);
        let reader = PriceFeedReader::new(&feed);
        let latest = reader.latest_round("ETH", 700).unwrap();

        let history = historical_prices(&reader, &latest, &params(10, 50, 700, 1));
        assert_eq!(history.prices, vec![U256::from(110u8)]);
        assert_eq!(history.timestamps, vec![600]);
        assert_eq!(history.start_index, 0);
        assert!(history.no_more_data_point);
    }

    #[test]
    fn test_walk_stops_past_time_boundary() {
        let feed = feed(&[(1, 90, 100), (2, 95, 200), (3, 100, 300), (4, 105, 400)]);
        let reader = PriceFeedReader::new(&feed);
        let latest = reader.latest_round("ETH", 400).unwrap();

        // boundary at 250: the round at 200 is kept, the walk stops there
        let history = historical_prices(&reader, &latest, &params(10, 150, 400, 1));
        assert_eq!(history.timestamps, vec![400, 300, 200]);
        assert_eq!(history.start_index, 2);
        assert!(history.no_more_data_point);
    }

    #[test]
    fn test_walk_runs_out_of_rounds() {
        let feed = feed(&[(1, 90, 100), (2, 95, 200), (3, 100, 300)]);
        let reader = PriceFeedReader::new(&feed);
        let latest = reader.latest_round("ETH", 300).unwrap();

        let history = historical_prices(&reader, &latest, &params(10, 1_000, 300, 1));
        assert_eq!(history.timestamps, vec![300, 200, 100]);
        assert_eq!(history.start_index, 2);
        assert!(!history.no_more_data_point);
        assert_eq!(history.oldest_timestamp(), 100);
    }

    #[test]
    fn test_walk_respects_round_count_and_step() {
        let rounds: Vec<_> = (1..=10).map(|i| (i as u128, 100 + i, 1_000 + i * 10)).collect();
        let feed = feed(&rounds);
        let reader = PriceFeedReader::new(&feed);
        let latest = reader.latest_round("ETH", 1_100).unwrap();

        let history = historical_prices(&reader, &latest, &params(3, 1_000, 1_100, 2));
        // rounds 10, 8, 6
        assert_eq!(history.timestamps, vec![1_100, 1_080, 1_060]);
        assert_eq!(history.prices[2], U256::from(106u8));
        assert!(!history.no_more_data_point);
    }

    #[test]
    fn test_walk_stops_on_missing_round() {
        let feed = feed(&[(1, 90, 100), (3, 100, 300)]);
        let reader = PriceFeedReader::new(&feed);
        let latest = reader.latest_round("ETH", 300).unwrap();

        let history = historical_prices(&reader, &latest, &params(10, 1_000, 300, 1));
        assert_eq!(history.timestamps, vec![300]);
        assert_eq!(history.start_index, 0);
        assert!(!history.no_more_data_point);
    }
}
