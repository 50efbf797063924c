//! Batch execution results.

use alloy_primitives::B256;
use serde::Serialize;

use super::error::{AuthorizationError, ErrorKind, Stage};
use super::request::TradeReceipt;

/// A batch item that went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTrade {
    pub index: usize,
    #[serde(flatten)]
    pub receipt: TradeReceipt,
}

/// A batch item that did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemError {
    pub index: usize,
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
    /// Set when the item's transaction landed and the receiver reverted it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,
}

impl BatchItemError {
    pub(crate) fn new(index: usize, err: &AuthorizationError) -> Self {
        Self {
            index,
            stage: err.stage,
            kind: err.kind(),
            message: err.source.to_string(),
            tx_hash: err.tx_hash(),
        }
    }
}

/// Per-item results of a batch, in item order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub trades: Vec<BatchTrade>,
    pub errors: Vec<BatchItemError>,
}

impl BatchOutcome {
    /// Hashes of the submitted transactions, in item order.
    #[must_use]
    pub fn tx_hashes(&self) -> Vec<B256> {
        self.trades
            .iter()
            .filter_map(|trade| trade.receipt.tx_hash)
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}
