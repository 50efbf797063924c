//! Market identifier types.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{hex, keccak256, Address, B256};
use serde::{Deserialize, Serialize};

/// Question identifier - 32-byte hash naming a market on the platform.
///
/// Derived, never stored: `keccak256(question ‖ creator ‖ oracle)` over the
/// packed bytes of the UTF-8 question and the two 20-byte addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(B256);

impl QuestionId {
    /// Wrap an existing 32-byte identifier.
    #[must_use]
    pub const fn new(id: B256) -> Self {
        Self(id)
    }

    /// Derive the identifier for a question created by `creator` and
    /// resolved by `oracle`.
    ///
    /// # Examples
    ///
    /// ```
    /// use alloy_primitives::Address;
    /// use lmsr_settlement::domain::QuestionId;
    ///
    /// let a = QuestionId::derive("Will it rain?", Address::ZERO, Address::repeat_byte(1));
    /// let b = QuestionId::derive("Will it rain?", Address::ZERO, Address::repeat_byte(1));
    /// assert_eq!(a, b);
    /// ```
    #[must_use]
    pub fn derive(question: &str, creator: Address, oracle: Address) -> Self {
        let mut packed = Vec::with_capacity(question.len() + 40);
        packed.extend_from_slice(question.as_bytes());
        packed.extend_from_slice(creator.as_slice());
        packed.extend_from_slice(oracle.as_slice());
        Self(keccak256(packed))
    }

    /// Get the raw 32 bytes.
    #[must_use]
    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s).map(Self)
    }
}

impl From<B256> for QuestionId {
    fn from(id: B256) -> Self {
        Self(id)
    }
}

/// Condition identifier assigned by the market contract.
///
/// Opaque to this crate; it is only read back and forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(B256);

impl ConditionId {
    /// Wrap an existing 32-byte identifier.
    #[must_use]
    pub const fn new(id: B256) -> Self {
        Self(id)
    }

    /// Get the raw 32 bytes.
    #[must_use]
    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_hashes_packed_bytes() {
        let creator = Address::repeat_byte(0xaa);
        let oracle = Address::repeat_byte(0xbb);
        let mut packed = b"Q?".to_vec();
        packed.extend_from_slice(&[0xaa; 20]);
        packed.extend_from_slice(&[0xbb; 20]);

        assert_eq!(
            QuestionId::derive("Q?", creator, oracle).as_b256(),
            keccak256(packed)
        );
    }

    #[test]
    fn every_input_changes_the_id() {
        let base = QuestionId::derive("Q", Address::ZERO, Address::ZERO);
        assert_ne!(base, QuestionId::derive("Q2", Address::ZERO, Address::ZERO));
        assert_ne!(base, QuestionId::derive("Q", Address::repeat_byte(1), Address::ZERO));
        assert_ne!(base, QuestionId::derive("Q", Address::ZERO, Address::repeat_byte(1)));
    }

    #[test]
    fn parses_and_displays_hex() {
        let id = QuestionId::derive("Q", Address::ZERO, Address::ZERO);
        let parsed: QuestionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
