//! Logarithmic Market Scoring Rule pricing.
//!
//! - Cost function: `C(q) = b * ln(sum(exp(q_i / b)))`
//! - Cost to buy `x` of outcome `i`: `C(q + x * e_i) - C(q)`
//! - Instantaneous price of outcome `i`: `exp(q_i / b) / sum(exp(q_k / b))`
//!
//! Supplies and the liquidity parameter must share a unit (outcome-token base
//! units on chain). The sum is evaluated with the maximum exponent factored
//! out, so every `exp` argument is non-positive and the logarithm sees a value
//! in `[1, n]`.

use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::Sign;
use num_traits::Zero;

use super::decimal::{self, ceil_to_u256, floor_to_u256, pow10, PRECISION};
use super::error::DomainError;

/// Shifted exponents below this contribute nothing at [`PRECISION`] digits.
const UNDERFLOW_CUTOFF: i64 = -400;

/// Compute the LMSR cost function `C(q)`.
///
/// # Errors
///
/// Returns [`DomainError::InvalidParameter`] if `b <= 0`, the supply vector is
/// empty or negative, or the exponential sum degenerates.
pub fn cost(q: &[BigDecimal], b: &BigDecimal) -> Result<BigDecimal, DomainError> {
    let (shift, sum) = shifted_exponential_sum(q, b)?;
    Ok((b * (shift + decimal::ln(&sum)?)).with_prec(PRECISION))
}

/// Cost of adding `quantity` to the supply of `outcome_index`.
///
/// # Errors
///
/// Returns [`DomainError::IndexOutOfRange`] for an invalid index and
/// [`DomainError::InvalidParameter`] for a negative quantity or any error
/// raised by [`cost`].
pub fn cost_to_buy(
    q: &[BigDecimal],
    outcome_index: u32,
    quantity: &BigDecimal,
    b: &BigDecimal,
) -> Result<BigDecimal, DomainError> {
    check_index(q, outcome_index)?;
    if quantity.sign() == Sign::Minus {
        return Err(DomainError::invalid("quantity", "must not be negative"));
    }

    let before = cost(q, b)?;
    let mut shifted = q.to_vec();
    shifted[outcome_index as usize] += quantity;
    let after = cost(&shifted, b)?;
    Ok(after - before)
}

/// Amount returned for removing `quantity` from the supply of `outcome_index`.
///
/// # Errors
///
/// Returns [`DomainError::IndexOutOfRange`] for an invalid index and
/// [`DomainError::InvalidParameter`] when the quantity is negative or exceeds
/// the outstanding supply.
pub fn proceeds_to_sell(
    q: &[BigDecimal],
    outcome_index: u32,
    quantity: &BigDecimal,
    b: &BigDecimal,
) -> Result<BigDecimal, DomainError> {
    check_index(q, outcome_index)?;
    let index = outcome_index as usize;
    if quantity.sign() == Sign::Minus {
        return Err(DomainError::invalid("quantity", "must not be negative"));
    }
    if quantity > &q[index] {
        return Err(DomainError::invalid(
            "quantity",
            format!("{quantity} exceeds outcome supply {}", q[index]),
        ));
    }

    let before = cost(q, b)?;
    let mut shifted = q.to_vec();
    shifted[index] -= quantity;
    let after = cost(&shifted, b)?;
    Ok(before - after)
}

/// Instantaneous outcome prices; they sum to one.
///
/// # Errors
///
/// Same conditions as [`cost`].
pub fn prices(q: &[BigDecimal], b: &BigDecimal) -> Result<Vec<BigDecimal>, DomainError> {
    let (shift, sum) = shifted_exponential_sum(q, b)?;
    q.iter()
        .map(|qi| {
            let exponent = (qi / b).with_prec(PRECISION) - &shift;
            let weight = shifted_exp(&exponent)?;
            Ok((weight / &sum).with_prec(PRECISION))
        })
        .collect()
}

/// Rescale a cost in outcome-token base units to settlement-token base units,
/// rounding up so the liquidity provider never undercharges.
///
/// # Errors
///
/// Returns [`DomainError::InvalidAmount`] if the result is negative or does
/// not fit in 256 bits.
pub fn to_settlement_units(
    cost: &BigDecimal,
    outcome_decimals: u32,
    usdc_decimals: u32,
) -> Result<U256, DomainError> {
    ceil_to_u256(&rescale(cost, outcome_decimals, usdc_decimals))
}

/// Rescale sale proceeds to settlement-token base units, rounding down.
///
/// # Errors
///
/// Same conditions as [`to_settlement_units`].
pub fn to_settlement_units_floor(
    proceeds: &BigDecimal,
    outcome_decimals: u32,
    usdc_decimals: u32,
) -> Result<U256, DomainError> {
    floor_to_u256(&rescale(proceeds, outcome_decimals, usdc_decimals))
}

fn rescale(amount: &BigDecimal, outcome_decimals: u32, usdc_decimals: u32) -> BigDecimal {
    amount * pow10(i64::from(usdc_decimals) - i64::from(outcome_decimals))
}

fn check_index(q: &[BigDecimal], outcome_index: u32) -> Result<(), DomainError> {
    if (outcome_index as usize) < q.len() {
        Ok(())
    } else {
        Err(DomainError::IndexOutOfRange {
            index: outcome_index,
            slots: u32::try_from(q.len()).unwrap_or(u32::MAX),
        })
    }
}

/// Returns `(m, sum(exp(q_i / b - m)))` with `m = max(q_i / b)`.
fn shifted_exponential_sum(
    q: &[BigDecimal],
    b: &BigDecimal,
) -> Result<(BigDecimal, BigDecimal), DomainError> {
    if b.sign() != Sign::Plus {
        return Err(DomainError::invalid(
            "liquidity",
            format!("b must be positive, got {b}"),
        ));
    }
    if q.is_empty() {
        return Err(DomainError::invalid("supplies", "no outcome supplies"));
    }
    if q.iter().any(|qi| qi.sign() == Sign::Minus) {
        return Err(DomainError::invalid("supplies", "supplies must not be negative"));
    }

    let scaled: Vec<BigDecimal> = q.iter().map(|qi| (qi / b).with_prec(PRECISION)).collect();
    let shift = scaled
        .iter()
        .max()
        .cloned()
        .unwrap_or_else(BigDecimal::zero);

    let mut sum = BigDecimal::zero();
    for s in &scaled {
        sum += shifted_exp(&(s - &shift))?;
    }
    if sum.sign() != Sign::Plus {
        return Err(DomainError::invalid(
            "exponential sum",
            format!("non-positive sum {sum}"),
        ));
    }
    Ok((shift, sum))
}

fn shifted_exp(exponent: &BigDecimal) -> Result<BigDecimal, DomainError> {
    if exponent < &BigDecimal::from(UNDERFLOW_CUTOFF) {
        return Ok(BigDecimal::zero());
    }
    decimal::exp(exponent)
}
