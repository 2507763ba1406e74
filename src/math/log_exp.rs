//! Natural exponential and logarithm in 18-decimal fixed point
//!
//! `exp` decomposes its argument into powers of two with precomputed
//! exponentials and finishes with a Taylor series at 20 decimals. `ln`
//! mirrors the decomposition and switches to a 36-decimal series when the
//! argument is close to one. `pow(x, y)` is `exp(y * ln(x))`.
//!
//! Valid exponent range is `[-41, 130]`: beyond it the 20-decimal
//! intermediate no longer fits in 255 bits, or the result falls below 1 wei.

use super::{I256, ONE, U256};
use crate::error::MathError;
use crate::math::fixed_point;

type Result<T> = std::result::Result<T, MathError>;

const fn int(limbs: [u64; 4]) -> I256 {
    I256::from_raw(U256::from_limbs(limbs))
}

const fn small(n: u64) -> I256 {
    int([n, 0, 0, 0])
}

const ONE_18: I256 = small(1_000_000_000_000_000_000);
const ONE_20: I256 = int([0x6bc75e2d63100000, 0x5, 0x0, 0x0]);
const ONE_36: I256 = int([0xb34b9f1000000000, 0xc097ce7bc90715, 0x0, 0x0]);
const HUNDRED: I256 = small(100);

/// 130.0
pub const MAX_NATURAL_EXPONENT: I256 = int([0xc1cc73b00c80000, 0x7, 0x0, 0x0]);
/// -41.0
pub const MIN_NATURAL_EXPONENT: I256 = int([
    0xc702bd3a30fc0000,
    0xfffffffffffffffd,
    0xffffffffffffffff,
    0xffffffffffffffff,
]);

// 0.9 and 1.1: inside this band ln runs at 36 decimals
const LN_36_LOWER_BOUND: I256 = small(900_000_000_000_000_000);
const LN_36_UPPER_BOUND: I256 = small(1_100_000_000_000_000_000);

// 2^254 / ONE_20
const MILD_EXPONENT_BOUND: I256 = int([
    0x4181ea8059f76532,
    0xa88f4bb1ca6bcf58,
    0xbce5086492111ae,
    0x0,
]);

// x_n = 2^(7 - n), a_n = e^(x_n). x0, x1 are 18-decimal and a0, a1 are plain
// integers; the rest are 20-decimal.
const X0: I256 = int([0xf05b59d3b2000000, 0x6, 0x0, 0x0]);
const A0: I256 = int([0x262827000000000, 0xf53a27172fa9ec63, 0x195e54c5dd42177, 0x0]);
const X1: I256 = int([0x782dace9d9000000, 0x3, 0x0, 0x0]);
const A1: I256 = int([0xf597cd205cef7380, 0x1425982c, 0x0, 0x0]);

const DECOMPOSITION: [(I256, I256); 10] = [
    (int([0x78ebc5ac62000000, 0xad, 0x0, 0x0]), int([0xf805980ff0084000, 0x1855144814a7f, 0x0, 0x0])),
    (int([0xbc75e2d631000000, 0x56, 0x0, 0x0]), int([0xa80a22c61ab5a700, 0x2df0ab5, 0x0, 0x0])),
    (int([0x5e3af16b18800000, 0x2b, 0x0, 0x0]), int([0xce3da636ea5cf850, 0x3f1f, 0x0, 0x0])),
    (int([0xaf1d78b58c400000, 0x15, 0x0, 0x0]), int([0xfa27722cc06cc5e2, 0x127, 0x0, 0x0])),
    (int([0xd78ebc5ac6200000, 0xa, 0x0, 0x0]), int([0xe60114edb805d03, 0x28, 0x0, 0x0])),
    (int([0x6bc75e2d63100000, 0x5, 0x0, 0x0]), int([0xbc5fb41746121110, 0xe, 0x0, 0x0])),
    (int([0xb5e3af16b1880000, 0x2, 0x0, 0x0]), int([0xf00f760a4b2db55d, 0x8, 0x0, 0x0])),
    (int([0x5af1d78b58c40000, 0x1, 0x0, 0x0]), int([0xf5f1775788937937, 0x6, 0x0, 0x0])),
    (int([0xad78ebc5ac620000, 0x0, 0x0, 0x0]), int([0x248f33704b286603, 0x6, 0x0, 0x0])),
    (int([0x56bc75e2d6310000, 0x0, 0x0, 0x0]), int([0xc548670b9510e7ac, 0x5, 0x0, 0x0])),
];

/// Terms of `exp` used: x2..x9; x10 and x11 only feed `ln`
const EXP_DECOMPOSITION_TERMS: usize = 8;
const EXP_SERIES_TERMS: u64 = 12;

/// `e^x` for a signed 18-decimal exponent
pub fn exp(x: I256) -> Result<I256> {
    if x < MIN_NATURAL_EXPONENT || x > MAX_NATURAL_EXPONENT {
        return Err(MathError::ExponentOutOfBounds);
    }

    if x.is_negative() {
        return Ok((ONE_18 * ONE_18) / exp(-x)?);
    }

    let mut x = x;
    let first_an = if x >= X0 {
        x -= X0;
        A0
    } else if x >= X1 {
        x -= X1;
        A1
    } else {
        small(1)
    };

    // 20 decimals from here on
    x *= HUNDRED;

    let mut product = ONE_20;
    for (x_n, a_n) in DECOMPOSITION.iter().take(EXP_DECOMPOSITION_TERMS) {
        if x >= *x_n {
            x -= *x_n;
            product = (product * *a_n) / ONE_20;
        }
    }

    // x is now below x9 = 0.25
    let mut series_sum = ONE_20;
    let mut term = x;
    series_sum += term;
    for n in 2..=EXP_SERIES_TERMS {
        term = ((term * x) / ONE_20) / small(n);
        series_sum += term;
    }

    Ok((((product * series_sum) / ONE_20) * first_an) / HUNDRED)
}

/// Natural logarithm of a positive 18-decimal value
pub fn ln(a: I256) -> Result<I256> {
    if a <= I256::ZERO {
        return Err(MathError::LogArgumentNotPositive);
    }
    if LN_36_LOWER_BOUND < a && a < LN_36_UPPER_BOUND {
        Ok(ln_36(a) / ONE_18)
    } else {
        Ok(ln_internal(a))
    }
}

fn ln_internal(a: I256) -> I256 {
    if a < ONE_18 {
        return -ln_internal((ONE_18 * ONE_18) / a);
    }

    let mut a = a;
    let mut sum = I256::ZERO;
    if a >= A0 * ONE_18 {
        a /= A0;
        sum += X0;
    }
    if a >= A1 * ONE_18 {
        a /= A1;
        sum += X1;
    }

    sum *= HUNDRED;
    a *= HUNDRED;

    for (x_n, a_n) in DECOMPOSITION.iter() {
        if a >= *a_n {
            a = (a * ONE_20) / *a_n;
            sum += *x_n;
        }
    }

    // a < a11 ~ 1.06: ln(a) = 2 * atanh((a - 1) / (a + 1))
    let z = ((a - ONE_20) * ONE_20) / (a + ONE_20);
    let z_squared = (z * z) / ONE_20;

    let mut num = z;
    let mut series_sum = num;
    for d in [3u64, 5, 7, 9, 11] {
        num = (num * z_squared) / ONE_20;
        series_sum += num / small(d);
    }
    series_sum *= small(2);

    (sum + series_sum) / HUNDRED
}

/// ln at 36 decimals, for arguments in (0.9, 1.1)
fn ln_36(x: I256) -> I256 {
    let x = x * ONE_18;

    let z = ((x - ONE_36) * ONE_36) / (x + ONE_36);
    let z_squared = (z * z) / ONE_36;

    let mut num = z;
    let mut series_sum = num;
    for d in [3u64, 5, 7, 9, 11, 13, 15] {
        num = (num * z_squared) / ONE_36;
        series_sum += num / small(d);
    }

    series_sum * small(2)
}

/// `x^y` for unsigned 18-decimal base and exponent
///
/// `0^0` is one and `0^y` is zero.
pub fn pow(x: U256, y: U256) -> Result<U256> {
    if y.is_zero() {
        return Ok(ONE);
    }
    if x.is_zero() {
        return Ok(U256::ZERO);
    }

    let x = fixed_point::to_signed(x)?;
    let y = fixed_point::to_signed(y)?;
    if y >= MILD_EXPONENT_BOUND {
        return Err(MathError::ExponentOutOfBounds);
    }

    let logx_times_y = if LN_36_LOWER_BOUND < x && x < LN_36_UPPER_BOUND {
        let ln_36_x = ln_36(x);
        // split the 36-decimal log so the product stays in range
        let high = ln_36_x / ONE_18;
        let low = ln_36_x % ONE_18;
        high * y + (low * y) / ONE_18
    } else {
        ln_internal(x) * y
    };
    let logx_times_y = logx_times_y / ONE_18;

    if logx_times_y < MIN_NATURAL_EXPONENT || logx_times_y > MAX_NATURAL_EXPONENT {
        return Err(MathError::ExponentOutOfBounds);
    }

    Ok(exp(logx_times_y)?.into_raw())
}

/// Square root via `pow(x, 0.5)`
pub fn sqrt(x: U256) -> Result<U256> {
    pow(x, ONE / U256::from(2u8))
}
