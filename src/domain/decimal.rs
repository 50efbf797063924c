//! Fixed-precision decimal engine.
//!
//! Pricing works on 18-decimal token supplies pushed through `exp`, so
//! intermediates carry [`PRECISION`] significant digits and every operation
//! is rounded back to that precision explicitly. Conversions to on-chain
//! integers pick their rounding direction at the call site.

use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};

use super::error::DomainError;

/// Significant digits kept for every intermediate result.
pub const PRECISION: u64 = 80;

/// Largest `|x|` accepted by [`exp`].
const EXP_LIMIT: i64 = 1_000_000;

/// Convergence threshold for the series expansions.
fn epsilon() -> BigDecimal {
    BigDecimal::new(BigInt::one(), PRECISION as i64 + 4)
}

/// `10^exponent` as an exact decimal.
#[must_use]
pub fn pow10(exponent: i64) -> BigDecimal {
    BigDecimal::new(BigInt::one(), -exponent)
}

/// Natural exponential `e^x`.
///
/// The argument is halved until it is below one half, expanded as a Taylor
/// series and squared back up. Negative arguments are computed as the
/// reciprocal of `e^|x|`.
///
/// # Errors
///
/// Returns [`DomainError::InvalidParameter`] when `|x|` exceeds the supported
/// range.
pub fn exp(x: &BigDecimal) -> Result<BigDecimal, DomainError> {
    if x.is_zero() {
        return Ok(BigDecimal::one());
    }
    let magnitude = x.abs();
    if magnitude > BigDecimal::from(EXP_LIMIT) {
        return Err(DomainError::invalid(
            "exponent",
            format!("|{x}| exceeds {EXP_LIMIT}"),
        ));
    }

    let half = BigDecimal::new(5.into(), 1);
    let two = BigDecimal::from(2);
    let mut reduced = magnitude;
    let mut squarings = 0u32;
    while reduced > half {
        reduced = (&reduced / &two).with_prec(PRECISION);
        squarings += 1;
    }

    let eps = epsilon();
    let mut sum = BigDecimal::one();
    let mut term = BigDecimal::one();
    let mut n = 1u32;
    loop {
        term = (&term * &reduced / BigDecimal::from(n)).with_prec(PRECISION);
        if term < eps {
            break;
        }
        sum += &term;
        n += 1;
    }

    for _ in 0..squarings {
        sum = (&sum * &sum).with_prec(PRECISION);
    }

    if x.sign() == Sign::Minus {
        Ok((BigDecimal::one() / sum).with_prec(PRECISION))
    } else {
        Ok(sum.with_prec(PRECISION))
    }
}

/// Natural logarithm `ln(x)` for `x > 0`.
///
/// Square roots pull the argument into `[0.9, 1.1]`, where the
/// `2 * atanh((y - 1) / (y + 1))` series converges quickly; the result is
/// scaled back by the number of roots taken.
///
/// # Errors
///
/// Returns [`DomainError::InvalidParameter`] when `x <= 0`.
pub fn ln(x: &BigDecimal) -> Result<BigDecimal, DomainError> {
    if x.sign() != Sign::Plus {
        return Err(DomainError::invalid(
            "logarithm argument",
            format!("{x} is not positive"),
        ));
    }
    if x.is_one() {
        return Ok(BigDecimal::zero());
    }

    let upper = BigDecimal::new(11.into(), 1);
    let lower = BigDecimal::new(9.into(), 1);
    let mut reduced = x.with_prec(PRECISION);
    let mut roots = 0u32;
    while reduced > upper || reduced < lower {
        reduced = reduced
            .sqrt()
            .ok_or_else(|| DomainError::invalid("logarithm argument", "square root failed"))?
            .with_prec(PRECISION);
        roots += 1;
    }

    let one = BigDecimal::one();
    let z = ((&reduced - &one) / (&reduced + &one)).with_prec(PRECISION);
    let z_squared = (&z * &z).with_prec(PRECISION);
    let eps = epsilon();

    let mut power = z.clone();
    let mut sum = z;
    let mut k = 1u32;
    loop {
        power = (&power * &z_squared).with_prec(PRECISION);
        let term = (&power / BigDecimal::from(2 * k + 1)).with_prec(PRECISION);
        if term.abs() < eps {
            break;
        }
        sum += &term;
        k += 1;
    }

    let scale = BigDecimal::from(BigInt::from(2u8).pow(roots + 1));
    Ok((sum * scale).with_prec(PRECISION))
}

/// Lossless conversion of an on-chain integer.
#[must_use]
pub fn from_u256(value: U256) -> BigDecimal {
    BigDecimal::new(
        BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>()),
        0,
    )
}

/// Round up to the nearest integer and convert to `U256`.
///
/// # Errors
///
/// Returns [`DomainError::InvalidAmount`] for negative or oversized values.
pub fn ceil_to_u256(value: &BigDecimal) -> Result<U256, DomainError> {
    to_u256(value, &round_integer(value, true)?)
}

/// Round down to the nearest integer and convert to `U256`.
///
/// # Errors
///
/// Returns [`DomainError::InvalidAmount`] for negative or oversized values.
pub fn floor_to_u256(value: &BigDecimal) -> Result<U256, DomainError> {
    to_u256(value, &round_integer(value, false)?)
}

/// `U256::MAX` has 78 decimal digits.
const MAX_INTEGER_DIGITS: i64 = 78;

fn round_integer(value: &BigDecimal, up: bool) -> Result<BigInt, DomainError> {
    if value.is_zero() {
        return Ok(BigInt::zero());
    }

    // Decide by magnitude first so extreme exponents never expand into
    // millions of digits.
    let (_, scale) = value.as_bigint_and_exponent();
    let integer_digits = i64::try_from(value.digits())
        .unwrap_or(i64::MAX)
        .saturating_sub(scale);
    if integer_digits > MAX_INTEGER_DIGITS {
        return Err(DomainError::amount(
            format!("{integer_digits}-digit value"),
            "exceeds 256 bits",
        ));
    }
    if integer_digits <= 0 {
        return Ok(match (value.sign(), up) {
            (Sign::Plus, true) => BigInt::one(),
            (Sign::Minus, false) => -BigInt::one(),
            _ => BigInt::zero(),
        });
    }

    let truncated = value.with_scale(0);
    let (integer, _) = truncated.clone().into_bigint_and_exponent();
    if &truncated == value {
        return Ok(integer);
    }
    Ok(match (value.sign(), up) {
        (Sign::Plus, true) => integer + 1,
        (Sign::Minus, false) => integer - 1,
        _ => integer,
    })
}

fn to_u256(original: &BigDecimal, integer: &BigInt) -> Result<U256, DomainError> {
    let (sign, bytes) = integer.to_bytes_be();
    if sign == Sign::Minus {
        return Err(DomainError::amount(original.to_string(), "negative"));
    }
    U256::try_from_be_slice(&bytes)
        .ok_or_else(|| DomainError::amount(original.to_string(), "exceeds 256 bits"))
}
