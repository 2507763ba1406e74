//! Benchmarks for oracle-aware pricing

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use oracle_amm::math::{from_int, log_exp, I256, ONE, U256};
use oracle_amm::model::{GbmEstimation, GbmParameters};
use oracle_amm::pricing::{calc_out_given_in_mmm, OracleContext, SwapParameters, TokenRecord};

fn record(balance: u64) -> TokenRecord {
    TokenRecord {
        decimals: 26,
        balance: from_int(balance),
        weight: from_int(5),
    }
}

fn benchmark_out_given_in_mmm(c: &mut Criterion) {
    let token_in = record(1_000);
    let token_out = record(1_000);
    let params = SwapParameters {
        amount: from_int(10),
        fee: U256::from(2_500_000_000_000_000u64),
        fallback_spread: U256::from(3_000_000_000_000_000u64),
    };
    let oracle = OracleContext {
        relative_price: ONE,
        recent_price_upper_bound: ONE,
    };
    let estimation = GbmEstimation {
        mean: I256::ZERO,
        variance: U256::from(1_000_000_000_000u64),
        success: true,
    };
    let gbm = GbmParameters {
        z: U256::from(600_000_000_000_000_000u64),
        horizon: from_int(300),
    };

    c.bench_function("out_given_in_mmm", |b| {
        b.iter(|| {
            calc_out_given_in_mmm(
                black_box(&token_in),
                black_box(&token_out),
                &params,
                &oracle,
                &estimation,
                &gbm,
            )
        })
    });
}

fn benchmark_log_exp_pow(c: &mut Criterion) {
    let base = from_int(1_000);
    let exponent = ONE / U256::from(2u8);

    c.bench_function("log_exp_pow", |b| {
        b.iter(|| log_exp::pow(black_box(base), black_box(exponent)))
    });
}

criterion_group!(benches, benchmark_out_given_in_mmm, benchmark_log_exp_pow);
criterion_main!(benches);
