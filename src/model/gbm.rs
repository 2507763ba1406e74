//! Geometric Brownian Motion estimator
//!
//! Estimates the per-second drift and variance of `ln(price_out / price_in)`
//! from the two feeds' recent rounds. Samples are sparse and irregular: the
//! two series are merged by timestamp, holding each price constant between
//! its updates, and the seconds of the window without a sample count as
//! returns equal to the mean.

use super::{historical_prices, GbmEstimation, HistoricalPrices, HistoricalPricesParameters};
use crate::error::MathError;
use crate::feed::{LatestRound, PriceFeed, PriceFeedReader};
use crate::math::fixed_point;
use crate::math::log_exp;
use crate::math::{I256, U256};

/// Pair statistics estimator over a price feed
pub struct GbmEstimator<'a, F: PriceFeed + ?Sized> {
    reader: PriceFeedReader<'a, F>,
}

impl<'a, F: PriceFeed + ?Sized> GbmEstimator<'a, F> {
    /// Create an estimator reading from the given feed
    pub fn new(feed: &'a F) -> Self {
        Self {
            reader: PriceFeedReader::new(feed),
        }
    }

    /// Estimate the log-return statistics of tokenOut priced in tokenIn
    ///
    /// Returns an unsuccessful estimation, not an error, when the history
    /// is too short to produce a return.
    pub fn estimate(
        &self,
        latest_in: &LatestRound,
        latest_out: &LatestRound,
        params: &HistoricalPricesParameters,
    ) -> Result<GbmEstimation, MathError> {
        let mut params = *params;

        let history_in = historical_prices(&self.reader, latest_in, &params);
        params.lookback_in_sec = reduced_lookback(&params, &history_in);

        let history_out = historical_prices(&self.reader, latest_out, &params);
        params.lookback_in_sec = reduced_lookback(&params, &history_out);

        estimate_from_histories(history_in, history_out, params.lookback_in_sec, params.timestamp)
    }
}

fn reduced_lookback(params: &HistoricalPricesParameters, history: &HistoricalPrices) -> u64 {
    params
        .lookback_in_sec
        .min(params.timestamp.saturating_sub(history.oldest_timestamp()))
}

fn estimate_from_histories(
    mut history_in: HistoricalPrices,
    mut history_out: HistoricalPrices,
    lookback_in_sec: u64,
    now: u64,
) -> Result<GbmEstimation, MathError> {
    if history_in.start_index == 0 && history_out.start_index == 0 {
        tracing::debug!("Single sample per feed, no return to estimate");
        return Ok(GbmEstimation::failed());
    }

    let window_start = if history_in.no_more_data_point && history_out.no_more_data_point {
        // both series reach past the window: their oldest prices hold from its start
        let window_start = now.saturating_sub(lookback_in_sec);
        history_in.timestamps[history_in.start_index] = window_start;
        history_out.timestamps[history_out.start_index] = window_start;
        window_start
    } else {
        let window_start = history_in.oldest_timestamp().max(history_out.oldest_timestamp());
        history_in.start_index = trim_start(&history_in, window_start);
        history_out.start_index = trim_start(&history_out, window_start);
        if history_in.start_index == 0 && history_out.start_index == 0 {
            tracing::debug!(window_start, "No overlapping history");
            return Ok(GbmEstimation::failed());
        }
        history_in.timestamps[history_in.start_index] = window_start;
        history_out.timestamps[history_out.start_index] = window_start;
        window_start
    };

    let window = now.saturating_sub(window_start);
    if window <= 1 {
        tracing::debug!(window, "Estimation window too short");
        return Ok(GbmEstimation::failed());
    }

    let returns = pair_returns(&history_in, &history_out)?;
    return_statistics(&returns, window)
}

/// Latest start index whose sample is at or before `boundary`
fn trim_start(history: &HistoricalPrices, boundary: u64) -> usize {
    let mut start = history.start_index;
    while start > 0 && history.timestamps[start - 1] <= boundary {
        start -= 1;
    }
    start
}

/// Log-returns of the merged `price_out / price_in` series
///
/// Both series are walked from their start index toward the latest sample.
/// At each step the series with the earlier next timestamp advances, both
/// on a tie; a step landing on the previous point's timestamp replaces that
/// point instead of producing a return.
pub fn pair_returns(
    history_in: &HistoricalPrices,
    history_out: &HistoricalPrices,
) -> Result<Vec<I256>, MathError> {
    let mut i = history_in.start_index;
    let mut j = history_out.start_index;
    let start = history_in.timestamps[i].max(history_out.timestamps[j]);

    // (timestamp, price_in, price_out)
    let mut points = vec![(start, history_in.prices[i], history_out.prices[j])];

    while i > 0 || j > 0 {
        let next_in = if i > 0 { history_in.timestamps[i - 1] } else { u64::MAX };
        let next_out = if j > 0 { history_out.timestamps[j - 1] } else { u64::MAX };

        let timestamp = next_in.min(next_out);
        if next_in <= next_out {
            i -= 1;
        }
        if next_out <= next_in {
            j -= 1;
        }

        let point = (timestamp, history_in.prices[i], history_out.prices[j]);
        match points.last_mut() {
            Some(last) if last.0 == timestamp => *last = point,
            _ => points.push(point),
        }
    }

    points
        .windows(2)
        .map(|pair| {
            let (_, in_old, out_old) = pair[0];
            let (_, in_new, out_new) = pair[1];
            let numerator = out_new
                .checked_mul(in_old)
                .ok_or(MathError::ArithmeticOverflow)?;
            let denominator = out_old
                .checked_mul(in_new)
                .ok_or(MathError::ArithmeticOverflow)?;
            let ratio = fixed_point::div(numerator, denominator)?;
            log_exp::ln(fixed_point::to_signed(ratio)?)
        })
        .collect()
}

/// Mean and variance of `returns` spread over `window` seconds
///
/// Seconds without a return contribute `mean²` to the variance.
pub fn return_statistics(returns: &[I256], window: u64) -> Result<GbmEstimation, MathError> {
    let n = returns.len() as u64;
    if n > window {
        tracing::warn!(returns = n, window, "More returns than seconds in window");
        return Ok(GbmEstimation::failed());
    }
    if window <= 1 {
        return Ok(GbmEstimation::failed());
    }

    let sum = returns
        .iter()
        .try_fold(I256::ZERO, |acc, r| fixed_point::add_signed(acc, *r))?;
    let mean = sum / I256::from_raw(U256::from(window));

    let mean_squared = fixed_point::mul(mean.unsigned_abs(), mean.unsigned_abs())?;
    let mut variance = U256::from(window - n)
        .checked_mul(mean_squared)
        .ok_or(MathError::ArithmeticOverflow)?;
    for r in returns {
        let deviation = fixed_point::sub_signed(*r, mean)?.unsigned_abs();
        variance = fixed_point::add(variance, fixed_point::mul(deviation, deviation)?)?;
    }
    let variance = variance / U256::from(window - 1);

    tracing::debug!(
        mean = %crate::math::format_fixed_signed(mean),
        variance = %crate::math::format_fixed(variance),
        returns = n,
        window,
        "GBM estimation"
    );

    Ok(GbmEstimation {
        mean,
        variance,
        success: true,
    })
}
