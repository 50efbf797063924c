//! Report submission and receipt classification.

use std::sync::Arc;

use alloy_primitives::{Address, B256};
use thiserror::Error;
use tracing::{info, warn};

use super::{Receiver, Report};
use crate::port::outbound::chain::{ChainClient, ChainError, ReceiverStatus, TxStatus};

/// Why a submitted report did not take effect.
///
/// Transport failure and receiver revert are kept apart: the first points at
/// gas or infrastructure, the second at a business rule the contract enforced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("report transaction did not succeed (status {status:?})")]
    TransportFailure {
        status: TxStatus,
        tx_hash: Option<B256>,
    },

    #[error("receiving contract reverted the report")]
    ReceiverRevert { tx_hash: Option<B256> },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl SubmitError {
    /// Hash of the transaction that carried the report, when it reached the
    /// chain.
    #[must_use]
    pub fn tx_hash(&self) -> Option<B256> {
        match self {
            Self::TransportFailure { tx_hash, .. } | Self::ReceiverRevert { tx_hash } => *tx_hash,
            Self::Chain(_) => None,
        }
    }
}

/// Sends reports to the contract their action belongs to.
#[derive(Clone)]
pub struct ReportSubmitter {
    chain: Arc<dyn ChainClient>,
    market: Address,
    vault: Address,
    gas_limit: u64,
}

impl ReportSubmitter {
    #[must_use]
    pub fn new(chain: Arc<dyn ChainClient>, market: Address, vault: Address, gas_limit: u64) -> Self {
        Self {
            chain,
            market,
            vault,
            gas_limit,
        }
    }

    #[must_use]
    pub const fn address_of(&self, receiver: Receiver) -> Address {
        match receiver {
            Receiver::Market => self.market,
            Receiver::Vault => self.vault,
        }
    }

    /// Encode and submit `report`, returning the transaction hash if the
    /// chain client reported one.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::TransportFailure`] when the transaction status
    /// is not success, [`SubmitError::ReceiverRevert`] when the transaction
    /// landed but the receiver reverted, and [`SubmitError::Chain`] when the
    /// client could not submit at all.
    pub async fn submit(&self, report: &Report) -> Result<Option<B256>, SubmitError> {
        let violations = report.placeholder_violations();
        if !violations.is_empty() {
            warn!(
                action = report.action(),
                fields = ?violations,
                "report carries non-zero placeholder fields"
            );
        }

        let receiver = self.address_of(report.receiver());
        let payload = report.encode();
        let receipt = self
            .chain
            .submit_report(receiver, payload, self.gas_limit)
            .await?;

        if receipt.tx_status != TxStatus::Success {
            warn!(
                action = report.action(),
                status = ?receipt.tx_status,
                "report transaction failed"
            );
            return Err(SubmitError::TransportFailure {
                status: receipt.tx_status,
                tx_hash: receipt.tx_hash,
            });
        }
        if receipt.receiver_status == ReceiverStatus::Reverted {
            warn!(
                action = report.action(),
                tx_hash = ?receipt.tx_hash,
                "receiver reverted report"
            );
            return Err(SubmitError::ReceiverRevert {
                tx_hash: receipt.tx_hash,
            });
        }

        info!(
            action = report.action(),
            receiver = %report.receiver(),
            tx_hash = ?receipt.tx_hash,
            "report submitted"
        );
        Ok(receipt.tx_hash)
    }
}

impl std::fmt::Debug for ReportSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportSubmitter")
            .field("market", &self.market)
            .field("vault", &self.vault)
            .field("gas_limit", &self.gas_limit)
            .finish_non_exhaustive()
    }
}
