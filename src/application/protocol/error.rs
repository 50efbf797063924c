//! Authorization failures and their classification.

use std::fmt;

use alloy_primitives::{B256, U256};
use serde::Serialize;
use thiserror::Error;

use crate::application::report::{ReportError, SubmitError};
use crate::domain::error::DomainError;
use crate::domain::QuestionId;
use crate::infrastructure::custody::CustodyError;
use crate::infrastructure::signing::SigningError;
use crate::port::outbound::chain::ChainError;

/// Coarse failure class reported to callers.
///
/// None of these are retried by the protocol itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input shape or range.
    Validation,
    /// The chain state forbids the request (used nonce, unknown market,
    /// short vault balance).
    StateConflict,
    /// Malformed signature or failed recovery.
    Crypto,
    /// A required secret is missing.
    Configuration,
    /// The report transaction itself did not succeed.
    TransportFailure,
    /// The transaction landed but the receiving contract reverted.
    ReceiverRevert,
    /// A chain read or submission could not be performed.
    Unavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::StateConflict => "state_conflict",
            Self::Crypto => "crypto",
            Self::Configuration => "configuration",
            Self::TransportFailure => "transport_failure",
            Self::ReceiverRevert => "receiver_revert",
            Self::Unavailable => "unavailable",
        };
        f.write_str(name)
    }
}

/// Protocol stage a request was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Pricing,
    Recovering,
    Signing,
    Encoding,
    Submitting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Pricing => "pricing",
            Self::Recovering => "recovering",
            Self::Signing => "signing",
            Self::Encoding => "encoding",
            Self::Submitting => "submitting",
        };
        f.write_str(name)
    }
}

/// Everything that can stop a quote, trade or market write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("quantity must be greater than zero")]
    ZeroQuantity,

    #[error("deadline {deadline} is not after {now}")]
    Expired { deadline: u64, now: u64 },

    #[error("market {0} not found")]
    MarketNotFound(QuestionId),

    #[error("nonce {nonce} already used for market {question_id}")]
    NonceUsed { question_id: QuestionId, nonce: U256 },

    #[error("no unused nonce found after {attempts} attempts")]
    NonceExhausted { attempts: u32 },

    #[error("vault holds {available} of outcome {outcome_index}, {requested} requested")]
    InsufficientBalance {
        outcome_index: u32,
        available: U256,
        requested: U256,
    },

    #[error("trade cost {cost} exceeds the signed maximum {max_cost}")]
    CostExceedsMax { cost: U256, max_cost: U256 },

    #[error("secret '{id}' is not available")]
    MissingSecret { id: String },

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Custody(#[from] CustodyError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl ProtocolError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::ZeroQuantity | Self::Expired { .. } | Self::Report(_) => {
                ErrorKind::Validation
            }
            Self::MarketNotFound(_)
            | Self::NonceUsed { .. }
            | Self::NonceExhausted { .. }
            | Self::InsufficientBalance { .. }
            | Self::CostExceedsMax { .. } => ErrorKind::StateConflict,
            Self::MissingSecret { .. } => ErrorKind::Configuration,
            Self::Signing(_) | Self::Custody(_) => ErrorKind::Crypto,
            Self::Chain(_) => ErrorKind::Unavailable,
            Self::Submit(err) => match err {
                SubmitError::TransportFailure { .. } => ErrorKind::TransportFailure,
                SubmitError::ReceiverRevert { .. } => ErrorKind::ReceiverRevert,
                SubmitError::Chain(_) => ErrorKind::Unavailable,
            },
        }
    }

    /// Hash of a transaction that landed even though the request failed.
    #[must_use]
    pub fn tx_hash(&self) -> Option<B256> {
        match self {
            Self::Submit(err) => err.tx_hash(),
            _ => None,
        }
    }
}

/// A request that aborted, and where.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage} failed: {source}")]
pub struct AuthorizationError {
    pub stage: Stage,
    #[source]
    pub source: ProtocolError,
}

impl AuthorizationError {
    pub fn new(stage: Stage, source: impl Into<ProtocolError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    #[must_use]
    pub fn tx_hash(&self) -> Option<B256> {
        self.source.tx_hash()
    }
}
