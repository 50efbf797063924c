//! Conversions between human-readable amounts and on-chain base units.

use std::str::FromStr;

use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::Sign;

use super::decimal::{ceil_to_u256, pow10};
use super::error::DomainError;

/// Parse a decimal string into base units with `decimals` fractional digits.
///
/// Fractional digits beyond `decimals` round the result up.
///
/// # Errors
///
/// Returns [`DomainError::InvalidAmount`] for malformed, negative or
/// oversized input.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use lmsr_settlement::domain::units::parse_units;
///
/// assert_eq!(parse_units("1.5", 6).unwrap(), U256::from(1_500_000));
/// assert_eq!(parse_units("0.0000001", 6).unwrap(), U256::from(1));
/// ```
pub fn parse_units(text: &str, decimals: u32) -> Result<U256, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::amount(text, "empty"));
    }
    if trimmed.contains(|c: char| matches!(c, 'e' | 'E')) {
        return Err(DomainError::amount(text, "exponent notation is not accepted"));
    }
    let value = BigDecimal::from_str(trimmed)
        .map_err(|e| DomainError::amount(text, e.to_string()))?;
    if value.sign() == Sign::Minus {
        return Err(DomainError::amount(text, "negative"));
    }
    ceil_to_u256(&(value * pow10(i64::from(decimals))))
}

/// Render base units as a decimal string, trimming trailing zeros.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use lmsr_settlement::domain::units::format_units;
///
/// assert_eq!(format_units(U256::from(1_500_000), 6), "1.5");
/// assert_eq!(format_units(U256::from(42), 0), "42");
/// ```
#[must_use]
pub fn format_units(value: U256, decimals: u32) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_units("10", 18).unwrap(), U256::from(10u128 * 10u128.pow(18)));
        assert_eq!(parse_units(" 0.25 ", 2).unwrap(), U256::from(25));
    }

    #[test]
    fn excess_precision_rounds_up() {
        assert_eq!(parse_units("1.0000011", 6).unwrap(), U256::from(1_000_002));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_units("", 6).is_err());
        assert!(parse_units("abc", 6).is_err());
        assert!(matches!(
            parse_units("-1", 6),
            Err(DomainError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn rejects_exponent_notation() {
        for text in ["1e-20000000", "1e999999999", "2.5E3"] {
            assert!(
                matches!(parse_units(text, 6), Err(DomainError::InvalidAmount { .. })),
                "{text} parsed"
            );
        }
    }

    #[test]
    fn formats_small_values_with_leading_zeros() {
        assert_eq!(format_units(U256::from(5), 6), "0.000005");
        assert_eq!(format_units(U256::ZERO, 6), "0");
        assert_eq!(format_units(U256::from(2_000_000), 6), "2");
    }
}
