//! Fixed-point math module
//!
//! 18-decimal fixed-point arithmetic over 256-bit integers: rounding and
//! truncating mul/div, Taylor-series powers, and natural exp/ln.

pub mod fixed_point;
pub mod log_exp;

pub use alloy_primitives::{I256, U256};

/// 1.0 in 18-decimal fixed point
pub const ONE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
pub(crate) const HALF_ONE: U256 = U256::from_limbs([500_000_000_000_000_000, 0, 0, 0]);

/// Smallest base accepted by [`fixed_point::pow`] (1 wei)
pub const MIN_POW_BASE: U256 = U256::from_limbs([1, 0, 0, 0]);
/// Largest base accepted by [`fixed_point::pow`] (2 - 1 wei)
pub const MAX_POW_BASE: U256 = U256::from_limbs([1_999_999_999_999_999_999, 0, 0, 0]);
/// Term threshold of the power series (1e-8)
pub const POW_PRECISION: U256 = U256::from_limbs([100_000_000, 0, 0, 0]);
/// Hard cap on power series terms
pub const POW_MAX_ITERATIONS: u64 = 100;

/// Builds a fixed-point value from a whole number
pub fn from_int(n: u64) -> U256 {
    U256::from(n) * ONE
}

/// Lossy conversion to a float, for metrics
pub fn to_f64(value: U256) -> f64 {
    u128::try_from(value).map_or(f64::MAX, |v| v as f64 / 1e18)
}

/// Renders a fixed-point value as a decimal string, e.g. `1.25`
pub fn format_fixed(value: U256) -> String {
    format_units(value, 18)
}

/// Renders an integer amount with `decimals` places as a decimal string
pub fn format_units(value: U256, decimals: u8) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / scale;
    let frac = value % scale;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = usize::from(decimals));
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Renders a signed fixed-point value as a decimal string
pub fn format_fixed_signed(value: I256) -> String {
    let magnitude = format_fixed(value.unsigned_abs());
    if value.is_negative() {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}
