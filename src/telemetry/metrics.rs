//! Pool metrics
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.

use crate::pricing::Regime;

/// Quote kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    ExactIn,
    ExactOut,
    JoinSingleAsset,
    ExitSingleAsset,
}

impl QuoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteKind::ExactIn => "exact_in",
            QuoteKind::ExactOut => "exact_out",
            QuoteKind::JoinSingleAsset => "join_single_asset",
            QuoteKind::ExitSingleAsset => "exit_single_asset",
        }
    }
}

/// Count a quote and whether it passed every check
pub fn record_quote(kind: QuoteKind, success: bool) {
    let outcome = if success { "ok" } else { "rejected" };
    ::metrics::counter!(
        "oracle_amm_quotes_total",
        "kind" => kind.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Count the regime a swap was priced in and track its spread
pub fn record_regime(regime: Regime, spread: f64) {
    ::metrics::counter!("oracle_amm_regime_total", "regime" => regime.as_str()).increment(1);
    ::metrics::gauge!("oracle_amm_spread", "regime" => regime.as_str()).set(spread);
}

/// Count a pricing call that fell back to the fixed spread
pub fn record_gbm_fallback() {
    ::metrics::counter!("oracle_amm_gbm_fallback_total").increment(1);
}
