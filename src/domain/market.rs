//! Market-related domain types.
//!
//! - [`MarketInfo`] - On-chain market attributes as read from the market contract
//! - [`MAX_OUTCOME_SLOTS`] / [`MIN_OUTCOME_SLOTS`] - Slot count bounds

use serde::Serialize;

use super::error::DomainError;
use super::id::{ConditionId, QuestionId};

/// Fewest outcome slots a market may be created with.
pub const MIN_OUTCOME_SLOTS: u32 = 2;

/// Most outcome slots a market may be created with.
pub const MAX_OUTCOME_SLOTS: u32 = 255;

/// A prediction market as seen by this crate.
///
/// Markets are created by a platform write and mutated only by the settlement
/// contract; this type is a read-only snapshot taken fresh for each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInfo {
    /// Derived question identifier.
    pub question_id: QuestionId,
    /// Contract-assigned condition identifier.
    pub condition_id: ConditionId,
    /// Number of outcome slots.
    pub outcome_slot_count: u32,
    /// Oracle type discriminator, as stored on chain.
    pub oracle_type: u8,
    /// Market type / visibility discriminator, as stored on chain.
    pub market_type: u8,
    /// Creation timestamp (Unix seconds).
    pub created_at: u64,
    /// Trading duration in seconds.
    pub duration: u64,
}

impl MarketInfo {
    /// Ensure `outcome_index` addresses one of this market's slots.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::IndexOutOfRange`] when
    /// `outcome_index >= outcome_slot_count`.
    pub fn check_outcome_index(&self, outcome_index: u32) -> Result<(), DomainError> {
        if outcome_index < self.outcome_slot_count {
            Ok(())
        } else {
            Err(DomainError::IndexOutOfRange {
                index: outcome_index,
                slots: self.outcome_slot_count,
            })
        }
    }
}

/// Validate a slot count for market creation.
///
/// # Errors
///
/// Returns [`DomainError::InvalidParameter`] outside
/// `MIN_OUTCOME_SLOTS..=MAX_OUTCOME_SLOTS`.
pub fn check_slot_count(outcome_slot_count: u32) -> Result<(), DomainError> {
    if (MIN_OUTCOME_SLOTS..=MAX_OUTCOME_SLOTS).contains(&outcome_slot_count) {
        Ok(())
    } else {
        Err(DomainError::invalid(
            "outcome_slot_count",
            format!(
                "{outcome_slot_count} not in {MIN_OUTCOME_SLOTS}..={MAX_OUTCOME_SLOTS}"
            ),
        ))
    }
}
