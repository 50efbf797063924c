//! Domain validation errors for pricing math and market shape.
//!
//! These errors are returned when an input violates a domain invariant:
//! a non-positive liquidity parameter, an outcome index past the slot
//! count, or an amount that cannot be represented in base units.
//!
//! # Examples
//!
//! ```
//! use bigdecimal::BigDecimal;
//! use lmsr_settlement::domain::error::DomainError;
//! use lmsr_settlement::domain::lmsr;
//!
//! let q = vec![BigDecimal::from(0), BigDecimal::from(0)];
//! let result = lmsr::cost(&q, &BigDecimal::from(0));
//!
//! assert!(matches!(result, Err(DomainError::InvalidParameter { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A numeric parameter is outside its valid domain.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An outcome index does not address a slot of the market.
    #[error("outcome index {index} out of range for {slots} outcome slots")]
    IndexOutOfRange {
        /// The rejected index.
        index: u32,
        /// Number of outcome slots the market has.
        slots: u32,
    },

    /// An amount string or value cannot be represented in base units.
    #[error("invalid amount '{value}': {reason}")]
    InvalidAmount {
        /// The rejected input, as given.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl DomainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn amount(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            value: value.into(),
            reason: reason.into(),
        }
    }
}
