//! oracle-amm: Oracle-aware weighted AMM pricing engine
//!
//! This library provides the core components for:
//! - 18-decimal fixed-point math with exp/ln/pow
//! - Price feed capability, validated reads and in-memory history replay
//! - GBM drift/volatility estimation over two feeds
//! - Weighted-pool formulas with oracle-driven spreads and adaptive fees
//! - A pool orchestrator enforcing swap and liquidity limits
//! - Configuration, logging and metrics

pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod math;
pub mod model;
pub mod pool;
pub mod pricing;
pub mod telemetry;
