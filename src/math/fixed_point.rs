//! 18-decimal fixed-point arithmetic
//!
//! `mul` and `div` round half up, the `_truncated` variants floor. Every
//! addition, subtraction and multiplication is checked: nothing wraps.
//!
//! `pow` is the single exponentiation routine of the weighted curve: an
//! integer power by squaring times a Taylor-series approximation of the
//! fractional remainder.

use super::{HALF_ONE, I256, MAX_POW_BASE, MIN_POW_BASE, ONE, POW_MAX_ITERATIONS, POW_PRECISION, U256};
use crate::error::MathError;

type Result<T> = std::result::Result<T, MathError>;

#[inline]
pub fn add(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b).ok_or(MathError::ArithmeticOverflow)
}

#[inline]
pub fn sub(a: U256, b: U256) -> Result<U256> {
    a.checked_sub(b).ok_or(MathError::ArithmeticUnderflow)
}

/// Absolute difference and whether `a < b`
#[inline]
pub fn sub_sign(a: U256, b: U256) -> (U256, bool) {
    if a >= b {
        (a - b, false)
    } else {
        (b - a, true)
    }
}

#[inline]
fn checked_mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b).ok_or(MathError::ArithmeticOverflow)
}

/// `round(a * b / ONE)`
pub fn mul(a: U256, b: U256) -> Result<U256> {
    let c0 = checked_mul(a, b)?;
    let c1 = add(c0, HALF_ONE)?;
    Ok(c1 / ONE)
}

/// `floor(a * b / ONE)`
pub fn mul_truncated(a: U256, b: U256) -> Result<U256> {
    Ok(checked_mul(a, b)? / ONE)
}

/// `round(a * ONE / b)`
pub fn div(a: U256, b: U256) -> Result<U256> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let c0 = checked_mul(a, ONE)?;
    let c1 = add(c0, b / U256::from(2u8))?;
    Ok(c1 / b)
}

/// `floor(a * ONE / b)`
pub fn div_truncated(a: U256, b: U256) -> Result<U256> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok(checked_mul(a, ONE)? / b)
}

/// Integer part of a fixed-point value
#[inline]
pub fn to_int(a: U256) -> U256 {
    a / ONE
}

/// Fixed-point value rounded down to a whole number
#[inline]
pub fn floor(a: U256) -> U256 {
    to_int(a) * ONE
}

/// `base^n` for a whole exponent, by squaring
pub fn pow_int(base: U256, n: U256) -> Result<U256> {
    let two = U256::from(2u8);
    let mut a = base;
    let mut z = if n % two != U256::ZERO { a } else { ONE };
    let mut n = n / two;
    while !n.is_zero() {
        a = mul(a, a)?;
        if n % two != U256::ZERO {
            z = mul(z, a)?;
        }
        n /= two;
    }
    Ok(z)
}

/// `base^exp` for a fractional exponent
///
/// `base` must lie in `[MIN_POW_BASE, MAX_POW_BASE]`.
pub fn pow(base: U256, exp: U256) -> Result<U256> {
    if base < MIN_POW_BASE || base > MAX_POW_BASE {
        return Err(MathError::PowBaseOutOfRange(base));
    }

    let whole = floor(exp);
    let remain = exp - whole;

    let whole_pow = pow_int(base, to_int(whole))?;
    if remain.is_zero() {
        return Ok(whole_pow);
    }

    let partial = pow_approx(base, remain, POW_PRECISION)?;
    mul(whole_pow, partial)
}

/// Binomial series for `base^exp`, `exp < ONE`
///
/// Each term is `term_{k-1} * (exp - (k-1)) * (base - 1) / k`; the sign of
/// the term flips with each of the two negative factors.
pub fn pow_approx(base: U256, exp: U256, precision: U256) -> Result<U256> {
    let (x, xneg) = sub_sign(base, ONE);
    let mut term = ONE;
    let mut sum = term;
    let mut negative = false;

    let mut i = 1u64;
    while term >= precision && i <= POW_MAX_ITERATIONS {
        let big_k = U256::from(i) * ONE;
        let (c, cneg) = sub_sign(exp, big_k - ONE);
        term = mul(term, mul(c, x)?)?;
        term = div(term, big_k)?;
        if term.is_zero() {
            break;
        }

        if xneg {
            negative = !negative;
        }
        if cneg {
            negative = !negative;
        }
        if negative {
            sum = sub(sum, term)?;
        } else {
            sum = add(sum, term)?;
        }
        i += 1;
    }

    Ok(sum)
}

/// Converts an unsigned fixed-point value into a signed one
pub fn to_signed(a: U256) -> Result<I256> {
    I256::try_from(a).map_err(|_| MathError::ArithmeticOverflow)
}

/// Rebuilds a signed value from a magnitude and a sign
pub fn from_sign_magnitude(magnitude: U256, negative: bool) -> Result<I256> {
    let value = to_signed(magnitude)?;
    Ok(if negative { -value } else { value })
}

pub fn add_signed(a: I256, b: I256) -> Result<I256> {
    a.checked_add(b).ok_or(MathError::ArithmeticOverflow)
}

pub fn sub_signed(a: I256, b: I256) -> Result<I256> {
    a.checked_sub(b).ok_or(MathError::ArithmeticOverflow)
}

/// Signed `mul`, rounding the magnitude half up
pub fn mul_signed(a: I256, b: I256) -> Result<I256> {
    let magnitude = mul(a.unsigned_abs(), b.unsigned_abs())?;
    from_sign_magnitude(magnitude, a.is_negative() != b.is_negative())
}

/// Signed `div`, rounding the magnitude half up
pub fn div_signed(a: I256, b: I256) -> Result<I256> {
    let magnitude = div(a.unsigned_abs(), b.unsigned_abs())?;
    from_sign_magnitude(magnitude, a.is_negative() != b.is_negative())
}
