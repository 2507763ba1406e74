//! Pool orchestrator
//!
//! Every quote reads fresh oracle rounds at the caller-supplied `now`,
//! prices through the pricing engine and runs the limit checks. The
//! mutating operations apply a quote only once every check has passed.

use super::types::{BoundToken, ExitQuote, JoinQuote, SwapQuote};
use super::{
    MAX_BOUND_TOKENS, MAX_IN_RATIO, MAX_OUT_RATIO, MAX_TOTAL_WEIGHT, MAX_WEIGHT, MIN_BALANCE,
    MIN_BOUND_TOKENS, MIN_WEIGHT,
};
use crate::config::PoolConfig;
use crate::error::{MathError, PoolError, Result};
use crate::feed::{token_relative_price, PriceFeed, PriceFeedReader};
use crate::math::fixed_point::{add, div, div_truncated, mul, mul_truncated, sub};
use crate::math::{format_fixed, to_f64, U256};
use crate::model::{GbmEstimation, GbmEstimator, HistoricalPricesParameters};
use crate::pricing::{
    calc_in_given_out_mmm, calc_out_given_in_mmm, calc_pool_out_given_single_in,
    calc_single_out_given_pool_in, calc_spot_price, check_price_unpeg, total_weight_mmm,
    OracleContext, PriceResult, SwapParameters, TokenGlobal, TokenRecord,
};
use crate::telemetry::{record_gbm_fallback, record_quote, record_regime, QuoteKind};
use std::collections::HashSet;

/// Oracle-aware weighted pool
pub struct Pool<F: PriceFeed> {
    feed: F,
    config: PoolConfig,
    tokens: Vec<BoundToken>,
    total_supply: U256,
}

fn validate_tokens(tokens: &[BoundToken]) -> Result<()> {
    if !(MIN_BOUND_TOKENS..=MAX_BOUND_TOKENS).contains(&tokens.len()) {
        return Err(PoolError::InvalidTokenCount(tokens.len()).into());
    }

    let mut seen = HashSet::new();
    let mut total_weight = U256::ZERO;
    for token in tokens {
        if !seen.insert(token.symbol.as_str()) {
            return Err(PoolError::DuplicateToken(token.symbol.clone()).into());
        }
        if token.weight < MIN_WEIGHT || token.weight > MAX_WEIGHT {
            return Err(PoolError::WeightOutOfBounds {
                token: token.symbol.clone(),
                weight: token.weight,
            }
            .into());
        }
        if token.balance < MIN_BALANCE {
            return Err(PoolError::MinBalance {
                token: token.symbol.clone(),
                balance: token.balance,
            }
            .into());
        }
        total_weight = add(total_weight, token.weight)?;
    }

    if total_weight > MAX_TOTAL_WEIGHT {
        return Err(PoolError::MaxTotalWeight(total_weight).into());
    }
    Ok(())
}

fn check_spot_prices(
    spot_price_before: U256,
    spot_price_after: U256,
    max_price: U256,
    amount_in: U256,
    amount_out: U256,
) -> Result<()> {
    if spot_price_after < spot_price_before {
        return Err(PoolError::MathApproximation.into());
    }
    if spot_price_after > max_price {
        return Err(PoolError::LimitPrice.into());
    }
    if spot_price_before > div(amount_in, amount_out)? {
        return Err(PoolError::MathApproximation.into());
    }
    Ok(())
}

impl<F: PriceFeed> Pool<F> {
    /// Create a pool over `feed` with the given bound tokens
    pub fn new(
        feed: F,
        config: PoolConfig,
        tokens: Vec<BoundToken>,
        initial_supply: U256,
    ) -> Result<Self> {
        config.validate()?;
        validate_tokens(&tokens)?;
        if initial_supply.is_zero() {
            return Err(PoolError::InvalidPoolAmount.into());
        }

        tracing::info!(
            tokens = tokens.len(),
            supply = %format_fixed(initial_supply),
            "Pool created"
        );

        Ok(Self {
            feed,
            config,
            tokens,
            total_supply: initial_supply,
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn tokens(&self) -> &[BoundToken] {
        &self.tokens
    }

    /// Outstanding pool shares
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Bound token by symbol
    pub fn token(&self, symbol: &str) -> Result<&BoundToken> {
        Ok(&self.tokens[self.token_index(symbol)?])
    }

    fn token_index(&self, symbol: &str) -> Result<usize, PoolError> {
        self.tokens
            .iter()
            .position(|t| t.symbol == symbol)
            .ok_or_else(|| PoolError::UnknownToken(symbol.to_string()))
    }

    fn pair(&self, token_in: &str, token_out: &str) -> Result<(usize, usize), PoolError> {
        if token_in == token_out {
            return Err(PoolError::SameToken(token_in.to_string()));
        }
        Ok((self.token_index(token_in)?, self.token_index(token_out)?))
    }

    fn token_global(&self, index: usize, now: u64) -> Result<TokenGlobal> {
        let token = &self.tokens[index];
        let reader = PriceFeedReader::new(&self.feed);
        let latest_round = reader.latest_round(&token.oracle, now)?;
        let oracle_decimals = self.feed.decimals(&token.oracle)?;
        let decimals = token
            .decimals
            .checked_add(oracle_decimals)
            .ok_or(MathError::ArithmeticOverflow)?;

        Ok(TokenGlobal {
            info: TokenRecord {
                decimals,
                balance: token.balance,
                weight: token.weight,
            },
            latest_round,
        })
    }

    fn oracle_context(
        &self,
        global_in: &TokenGlobal,
        global_out: &TokenGlobal,
        now: u64,
    ) -> Result<OracleContext> {
        let relative_price = token_relative_price(
            global_in.latest_round.price,
            global_in.info.decimals,
            global_out.latest_round.price,
            global_out.info.decimals,
        )?;
        let recent_price_upper_bound = PriceFeedReader::new(&self.feed)
            .max_relative_price_in_last_block(
                &global_in.latest_round,
                global_in.info.decimals,
                &global_out.latest_round,
                global_out.info.decimals,
                now,
            )?;

        Ok(OracleContext {
            relative_price,
            recent_price_upper_bound,
        })
    }

    fn historical_prices_parameters(&self, now: u64) -> HistoricalPricesParameters {
        HistoricalPricesParameters {
            lookback_in_round: self.config.lookback_in_round,
            lookback_in_sec: self.config.lookback_in_sec,
            timestamp: now,
            lookback_step_in_round: self.config.lookback_step_in_round,
        }
    }

    fn estimation(
        &self,
        global_in: &TokenGlobal,
        global_out: &TokenGlobal,
        now: u64,
    ) -> Result<GbmEstimation> {
        let params = self.historical_prices_parameters(now);
        let estimation = GbmEstimator::new(&self.feed).estimate(
            &global_in.latest_round,
            &global_out.latest_round,
            &params,
        )?;

        if !estimation.success {
            tracing::warn!(
                oracle_in = %global_in.latest_round.oracle,
                oracle_out = %global_out.latest_round.oracle,
                "GBM estimation failed, using fallback spread"
            );
            record_gbm_fallback();
        }
        Ok(estimation)
    }

    /// GBM statistics of `token_out` priced in `token_in`
    pub fn estimate(&self, token_in: &str, token_out: &str, now: u64) -> Result<GbmEstimation> {
        let (index_in, index_out) = self.pair(token_in, token_out)?;
        let global_in = self.token_global(index_in, now)?;
        let global_out = self.token_global(index_out, now)?;
        self.estimation(&global_in, &global_out, now)
    }

    fn swap_parameters(&self, amount: U256) -> SwapParameters {
        SwapParameters {
            amount,
            fee: self.config.swap_fee,
            fallback_spread: self.config.fallback_spread,
        }
    }

    /// Quote a swap of exactly `amount_in` of `token_in`
    pub fn quote_exact_in(
        &self,
        token_in: &str,
        amount_in: U256,
        token_out: &str,
        min_amount_out: U256,
        max_price: U256,
        now: u64,
    ) -> Result<SwapQuote> {
        let result = self.price_exact_in(
            token_in,
            amount_in,
            token_out,
            min_amount_out,
            max_price,
            now,
        );
        record_quote(QuoteKind::ExactIn, result.is_ok());
        if let Err(e) = &result {
            tracing::debug!(token_in, token_out, error = %e, "Exact-in quote rejected");
        }
        result
    }

    fn price_exact_in(
        &self,
        token_in: &str,
        amount_in: U256,
        token_out: &str,
        min_amount_out: U256,
        max_price: U256,
        now: u64,
    ) -> Result<SwapQuote> {
        let (index_in, index_out) = self.pair(token_in, token_out)?;
        let global_in = self.token_global(index_in, now)?;
        let global_out = self.token_global(index_out, now)?;
        let (record_in, record_out) = (&global_in.info, &global_out.info);
        let fee = self.config.swap_fee;

        if amount_in > mul(record_in.balance, MAX_IN_RATIO)? {
            return Err(PoolError::MaxInRatio.into());
        }

        let spot_price_before = calc_spot_price(
            record_in.balance,
            record_in.weight,
            record_out.balance,
            record_out.weight,
            fee,
        )?;
        if spot_price_before > max_price {
            return Err(PoolError::BadLimitPrice.into());
        }

        let oracle = self.oracle_context(&global_in, &global_out, now)?;
        let estimation = self.estimation(&global_in, &global_out, now)?;
        let (swap_result, regime) = calc_out_given_in_mmm(
            record_in,
            record_out,
            &self.swap_parameters(amount_in),
            &oracle,
            &estimation,
            &self.config.gbm,
        )?;

        let amount_out = swap_result.amount;
        if amount_out < min_amount_out {
            return Err(PoolError::LimitOut.into());
        }
        if amount_out.is_zero() {
            return Err(PoolError::ZeroAmount.into());
        }

        let spot_price_after = calc_spot_price(
            add(record_in.balance, amount_in)?,
            record_in.weight,
            sub(record_out.balance, amount_out)?,
            record_out.weight,
            fee,
        )?;
        check_spot_prices(
            spot_price_before,
            spot_price_after,
            max_price,
            amount_in,
            amount_out,
        )?;
        check_price_unpeg(
            spot_price_after,
            fee,
            oracle.relative_price,
            self.config.max_price_unpeg_ratio,
        )?;

        record_regime(regime, to_f64(swap_result.spread));
        tracing::debug!(
            token_in,
            token_out,
            %regime,
            amount_in = %format_fixed(amount_in),
            amount_out = %format_fixed(amount_out),
            spread = %format_fixed(swap_result.spread),
            "Exact-in quote"
        );

        Ok(SwapQuote {
            amount: amount_out,
            spot_price_after,
            swap_result,
            price_result: PriceResult {
                spot_price_before,
                spot_price_after,
                price_in: global_in.latest_round.price,
                price_out: global_out.latest_round.price,
            },
            regime,
        })
    }

    /// Quote a swap for exactly `amount_out` of `token_out`
    pub fn quote_exact_out(
        &self,
        token_in: &str,
        max_amount_in: U256,
        token_out: &str,
        amount_out: U256,
        max_price: U256,
        now: u64,
    ) -> Result<SwapQuote> {
        let result = self.price_exact_out(
            token_in,
            max_amount_in,
            token_out,
            amount_out,
            max_price,
            now,
        );
        record_quote(QuoteKind::ExactOut, result.is_ok());
        if let Err(e) = &result {
            tracing::debug!(token_in, token_out, error = %e, "Exact-out quote rejected");
        }
        result
    }

    fn price_exact_out(
        &self,
        token_in: &str,
        max_amount_in: U256,
        token_out: &str,
        amount_out: U256,
        max_price: U256,
        now: u64,
    ) -> Result<SwapQuote> {
        let (index_in, index_out) = self.pair(token_in, token_out)?;
        if amount_out.is_zero() {
            return Err(PoolError::ZeroAmount.into());
        }
        let global_in = self.token_global(index_in, now)?;
        let global_out = self.token_global(index_out, now)?;
        let (record_in, record_out) = (&global_in.info, &global_out.info);
        let fee = self.config.swap_fee;

        if amount_out > mul(record_out.balance, MAX_OUT_RATIO)? {
            return Err(PoolError::MaxOutRatio.into());
        }

        let spot_price_before = calc_spot_price(
            record_in.balance,
            record_in.weight,
            record_out.balance,
            record_out.weight,
            fee,
        )?;
        if spot_price_before > max_price {
            return Err(PoolError::BadLimitPrice.into());
        }

        let oracle = self.oracle_context(&global_in, &global_out, now)?;
        let estimation = self.estimation(&global_in, &global_out, now)?;
        let (swap_result, regime) = calc_in_given_out_mmm(
            record_in,
            record_out,
            &self.swap_parameters(amount_out),
            &oracle,
            &estimation,
            &self.config.gbm,
        )?;

        let amount_in = swap_result.amount;
        if amount_in > max_amount_in {
            return Err(PoolError::LimitIn.into());
        }

        let spot_price_after = calc_spot_price(
            add(record_in.balance, amount_in)?,
            record_in.weight,
            sub(record_out.balance, amount_out)?,
            record_out.weight,
            fee,
        )?;
        check_spot_prices(
            spot_price_before,
            spot_price_after,
            max_price,
            amount_in,
            amount_out,
        )?;
        check_price_unpeg(
            spot_price_after,
            fee,
            oracle.relative_price,
            self.config.max_price_unpeg_ratio,
        )?;

        record_regime(regime, to_f64(swap_result.spread));
        tracing::debug!(
            token_in,
            token_out,
            %regime,
            amount_in = %format_fixed(amount_in),
            amount_out = %format_fixed(amount_out),
            spread = %format_fixed(swap_result.spread),
            "Exact-out quote"
        );

        Ok(SwapQuote {
            amount: amount_in,
            spot_price_after,
            swap_result,
            price_result: PriceResult {
                spot_price_before,
                spot_price_after,
                price_in: global_in.latest_round.price,
                price_out: global_out.latest_round.price,
            },
            regime,
        })
    }

    /// Adjustment inputs of every token other than the pivot
    ///
    /// A join prices the pivot against each other token; an exit prices
    /// each other token against the pivot.
    fn other_weights(
        &self,
        pivot_index: usize,
        pivot: &TokenGlobal,
        is_join: bool,
        now: u64,
    ) -> Result<Vec<(U256, GbmEstimation)>> {
        let mut others = Vec::with_capacity(self.tokens.len() - 1);
        for (index, token) in self.tokens.iter().enumerate() {
            if index == pivot_index {
                continue;
            }
            let other = self.token_global(index, now)?;
            let estimation = if is_join {
                self.estimation(pivot, &other, now)?
            } else {
                self.estimation(&other, pivot, now)?
            };
            others.push((token.weight, estimation));
        }
        Ok(others)
    }

    /// Quote the pool shares minted for depositing `amount_in` of `token_in`
    pub fn quote_join_single_asset(
        &self,
        token_in: &str,
        amount_in: U256,
        now: u64,
    ) -> Result<JoinQuote> {
        let result = self.price_join_single_asset(token_in, amount_in, now);
        record_quote(QuoteKind::JoinSingleAsset, result.is_ok());
        if let Err(e) = &result {
            tracing::debug!(token_in, error = %e, "Single-asset join quote rejected");
        }
        result
    }

    fn price_join_single_asset(
        &self,
        token_in: &str,
        amount_in: U256,
        now: u64,
    ) -> Result<JoinQuote> {
        let index = self.token_index(token_in)?;
        let pivot = self.token_global(index, now)?;
        if amount_in > mul(pivot.info.balance, MAX_IN_RATIO)? {
            return Err(PoolError::MaxInRatio.into());
        }

        let others = self.other_weights(index, &pivot, true, now)?;
        let total_weight = total_weight_mmm(
            true,
            self.config.fallback_spread,
            pivot.info.weight,
            &others,
            &self.config.gbm,
        )?;

        let pool_amount_out = calc_pool_out_given_single_in(
            pivot.info.balance,
            pivot.info.weight,
            self.total_supply,
            total_weight,
            amount_in,
            self.config.swap_fee,
        )?;
        if pool_amount_out.is_zero() {
            return Err(PoolError::ZeroAmount.into());
        }

        tracing::debug!(
            token_in,
            amount_in = %format_fixed(amount_in),
            pool_amount_out = %format_fixed(pool_amount_out),
            total_weight = %format_fixed(total_weight),
            "Single-asset join quote"
        );
        Ok(JoinQuote {
            pool_amount_out,
            total_weight,
        })
    }

    /// Quote the amount of `token_out` paid for burning `pool_amount_in` shares
    pub fn quote_exit_single_asset(
        &self,
        token_out: &str,
        pool_amount_in: U256,
        now: u64,
    ) -> Result<ExitQuote> {
        let result = self.price_exit_single_asset(token_out, pool_amount_in, now);
        record_quote(QuoteKind::ExitSingleAsset, result.is_ok());
        if let Err(e) = &result {
            tracing::debug!(token_out, error = %e, "Single-asset exit quote rejected");
        }
        result
    }

    fn price_exit_single_asset(
        &self,
        token_out: &str,
        pool_amount_in: U256,
        now: u64,
    ) -> Result<ExitQuote> {
        let index = self.token_index(token_out)?;
        if pool_amount_in.is_zero() || pool_amount_in >= self.total_supply {
            return Err(PoolError::InvalidPoolAmount.into());
        }
        let pivot = self.token_global(index, now)?;

        let others = self.other_weights(index, &pivot, false, now)?;
        let total_weight = total_weight_mmm(
            false,
            self.config.fallback_spread,
            pivot.info.weight,
            &others,
            &self.config.gbm,
        )?;

        let amount_out = calc_single_out_given_pool_in(
            pivot.info.balance,
            pivot.info.weight,
            self.total_supply,
            total_weight,
            pool_amount_in,
            self.config.swap_fee,
        )?;
        if amount_out > mul(pivot.info.balance, MAX_OUT_RATIO)? {
            return Err(PoolError::MaxOutRatio.into());
        }
        if amount_out.is_zero() {
            return Err(PoolError::ZeroAmount.into());
        }

        tracing::debug!(
            token_out,
            pool_amount_in = %format_fixed(pool_amount_in),
            amount_out = %format_fixed(amount_out),
            total_weight = %format_fixed(total_weight),
            "Single-asset exit quote"
        );
        Ok(ExitQuote {
            amount_out,
            total_weight,
        })
    }

    /// Swap exactly `amount_in` of `token_in`, updating balances
    pub fn swap_exact_amount_in(
        &mut self,
        token_in: &str,
        amount_in: U256,
        token_out: &str,
        min_amount_out: U256,
        max_price: U256,
        now: u64,
    ) -> Result<SwapQuote> {
        let quote = self.quote_exact_in(
            token_in,
            amount_in,
            token_out,
            min_amount_out,
            max_price,
            now,
        )?;
        self.apply_swap(token_in, amount_in, token_out, quote.amount)?;
        Ok(quote)
    }

    /// Swap for exactly `amount_out` of `token_out`, updating balances
    pub fn swap_exact_amount_out(
        &mut self,
        token_in: &str,
        max_amount_in: U256,
        token_out: &str,
        amount_out: U256,
        max_price: U256,
        now: u64,
    ) -> Result<SwapQuote> {
        let quote = self.quote_exact_out(
            token_in,
            max_amount_in,
            token_out,
            amount_out,
            max_price,
            now,
        )?;
        self.apply_swap(token_in, quote.amount, token_out, amount_out)?;
        Ok(quote)
    }

    fn apply_swap(
        &mut self,
        token_in: &str,
        amount_in: U256,
        token_out: &str,
        amount_out: U256,
    ) -> Result<()> {
        let (index_in, index_out) = self.pair(token_in, token_out)?;
        let balance_in = add(self.tokens[index_in].balance, amount_in)?;
        let balance_out = sub(self.tokens[index_out].balance, amount_out)?;

        self.tokens[index_in].balance = balance_in;
        self.tokens[index_out].balance = balance_out;
        tracing::info!(
            token_in,
            token_out,
            amount_in = %format_fixed(amount_in),
            amount_out = %format_fixed(amount_out),
            "Swap applied"
        );
        Ok(())
    }

    /// Deposit exactly `amount_in` of `token_in` for pool shares
    pub fn join_swap_extern_amount_in(
        &mut self,
        token_in: &str,
        amount_in: U256,
        min_pool_amount_out: U256,
        now: u64,
    ) -> Result<JoinQuote> {
        let quote = self.quote_join_single_asset(token_in, amount_in, now)?;
        if quote.pool_amount_out < min_pool_amount_out {
            return Err(PoolError::LimitOut.into());
        }

        let index = self.token_index(token_in)?;
        let balance = add(self.tokens[index].balance, amount_in)?;
        let total_supply = add(self.total_supply, quote.pool_amount_out)?;

        self.tokens[index].balance = balance;
        self.total_supply = total_supply;
        tracing::info!(
            token_in,
            amount_in = %format_fixed(amount_in),
            pool_amount_out = %format_fixed(quote.pool_amount_out),
            "Single-asset join applied"
        );
        Ok(quote)
    }

    /// Burn exactly `pool_amount_in` shares for `token_out`
    pub fn exit_swap_pool_amount_in(
        &mut self,
        token_out: &str,
        pool_amount_in: U256,
        min_amount_out: U256,
        now: u64,
    ) -> Result<ExitQuote> {
        let quote = self.quote_exit_single_asset(token_out, pool_amount_in, now)?;
        if quote.amount_out < min_amount_out {
            return Err(PoolError::LimitOut.into());
        }

        let index = self.token_index(token_out)?;
        let balance = sub(self.tokens[index].balance, quote.amount_out)?;
        let total_supply = sub(self.total_supply, pool_amount_in)?;

        self.tokens[index].balance = balance;
        self.total_supply = total_supply;
        tracing::info!(
            token_out,
            pool_amount_in = %format_fixed(pool_amount_in),
            amount_out = %format_fixed(quote.amount_out),
            "Single-asset exit applied"
        );
        Ok(quote)
    }

    fn check_amounts_len(&self, amounts: &[U256]) -> Result<()> {
        if amounts.len() != self.tokens.len() {
            return Err(PoolError::AmountsLength {
                expected: self.tokens.len(),
                actual: amounts.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Mint `pool_amount_out` shares against a proportional deposit
    ///
    /// Returns the amount of each token taken, in bound order.
    pub fn join_pool(
        &mut self,
        pool_amount_out: U256,
        max_amounts_in: &[U256],
    ) -> Result<Vec<U256>> {
        self.check_amounts_len(max_amounts_in)?;
        let ratio = div(pool_amount_out, self.total_supply)?;
        if ratio.is_zero() {
            return Err(PoolError::InvalidPoolAmount.into());
        }

        let amounts_in = self
            .tokens
            .iter()
            .zip(max_amounts_in)
            .map(|(token, max_amount_in)| -> Result<U256> {
                let amount_in = mul(ratio, token.balance)?;
                if amount_in.is_zero() {
                    return Err(PoolError::MathApproximation.into());
                }
                if amount_in > *max_amount_in {
                    return Err(PoolError::LimitIn.into());
                }
                Ok(amount_in)
            })
            .collect::<Result<Vec<_>>>()?;
        let balances = self
            .tokens
            .iter()
            .zip(&amounts_in)
            .map(|(token, amount_in)| add(token.balance, *amount_in))
            .collect::<Result<Vec<_>, MathError>>()?;
        let total_supply = add(self.total_supply, pool_amount_out)?;

        for (token, balance) in self.tokens.iter_mut().zip(balances) {
            token.balance = balance;
        }
        self.total_supply = total_supply;
        tracing::info!(
            pool_amount_out = %format_fixed(pool_amount_out),
            "Proportional join applied"
        );
        Ok(amounts_in)
    }

    /// Burn `pool_amount_in` shares for a proportional withdrawal
    ///
    /// Amounts owed to the provider are truncated.
    pub fn exit_pool(
        &mut self,
        pool_amount_in: U256,
        min_amounts_out: &[U256],
    ) -> Result<Vec<U256>> {
        self.check_amounts_len(min_amounts_out)?;
        if pool_amount_in.is_zero() || pool_amount_in > self.total_supply {
            return Err(PoolError::InvalidPoolAmount.into());
        }
        let ratio = div_truncated(pool_amount_in, self.total_supply)?;

        let amounts_out = self
            .tokens
            .iter()
            .zip(min_amounts_out)
            .map(|(token, min_amount_out)| -> Result<U256> {
                let amount_out = mul_truncated(ratio, token.balance)?;
                if amount_out < *min_amount_out {
                    return Err(PoolError::LimitOut.into());
                }
                Ok(amount_out)
            })
            .collect::<Result<Vec<_>>>()?;
        let balances = self
            .tokens
            .iter()
            .zip(&amounts_out)
            .map(|(token, amount_out)| sub(token.balance, *amount_out))
            .collect::<Result<Vec<_>, MathError>>()?;
        let total_supply = sub(self.total_supply, pool_amount_in)?;

        for (token, balance) in self.tokens.iter_mut().zip(balances) {
            token.balance = balance;
        }
        self.total_supply = total_supply;
        tracing::info!(pool_amount_in = %format_fixed(pool_amount_in), "Proportional exit applied");
        Ok(amounts_out)
    }
}
