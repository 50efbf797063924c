//! Chain client port.
//!
//! The chain client performs contract reads and submits encoded reports.
//! Retry and backoff are the implementation's concern; every call here is
//! treated as one atomic request/response.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Failure to reach or get an answer from the chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("contract read failed: {0}")]
    Read(String),

    #[error("report submission failed: {0}")]
    Submit(String),

    #[error("could not decode contract response: {0}")]
    Decode(String),
}

/// Outcome of the transaction carrying a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Success,
    Reverted,
    Fatal,
}

/// Outcome of the receiving contract's handling of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverStatus {
    Success,
    Reverted,
}

/// Result of [`ChainClient::submit_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub tx_status: TxStatus,
    pub receiver_status: ReceiverStatus,
    pub tx_hash: Option<B256>,
}

impl SubmitReceipt {
    /// Receipt of a transaction that landed and executed cleanly.
    #[must_use]
    pub const fn success(tx_hash: B256) -> Self {
        Self {
            tx_status: TxStatus::Success,
            receiver_status: ReceiverStatus::Success,
            tx_hash: Some(tx_hash),
        }
    }
}

/// Reads contract state and submits reports.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Execute a read-only call of ABI-encoded `calldata` against `contract`.
    async fn read_contract(&self, contract: Address, calldata: Bytes) -> Result<Bytes, ChainError>;

    /// Deliver an encoded report to `receiver`.
    async fn submit_report(
        &self,
        receiver: Address,
        payload: Bytes,
        gas_limit: u64,
    ) -> Result<SubmitReceipt, ChainError>;
}
