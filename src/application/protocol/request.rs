//! Protocol inputs and outputs.

use alloy_primitives::{Address, B256, U256};
use serde::Serialize;

use crate::domain::{QuestionId, Quote, TradeIntent};
use crate::infrastructure::signing::Signature65;

/// A request for authority-signed quote terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub question_id: QuestionId,
    pub outcome_index: u32,
    pub buy: bool,
    pub quantity: U256,
    /// Trader to bind the quote to; `None` yields an advisory quote.
    pub user: Option<Address>,
    /// Drawn at random and checked unused when absent.
    pub nonce: Option<U256>,
    /// Defaults to now plus the configured quote lifetime.
    pub deadline: Option<u64>,
    /// Precomputed settlement cost; skips pricing when present.
    pub trade_cost_usdc: Option<U256>,
}

impl QuoteRequest {
    /// Advisory quote for `quantity` of one outcome, all else defaulted.
    #[must_use]
    pub fn new(question_id: QuestionId, outcome_index: u32, buy: bool, quantity: U256) -> Self {
        Self {
            question_id,
            outcome_index,
            buy,
            quantity,
            user: None,
            nonce: None,
            deadline: None,
            trade_cost_usdc: None,
        }
    }
}

/// Quote terms with the authority's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedQuote {
    #[serde(flatten)]
    pub quote: Quote,
    pub don_signature: Signature65,
    /// True when no trader is bound; such quotes cannot execute on chain.
    pub advisory: bool,
}

/// A trader-signed intent to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    pub intent: TradeIntent,
    pub user_signature: Signature65,
    /// Precomputed settlement cost; skips pricing when present.
    pub trade_cost_usdc: Option<U256>,
}

/// A trade that was authorized and submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReceipt {
    #[serde(flatten)]
    pub quote: Quote,
    pub max_cost_usdc: U256,
    pub don_signature: Signature65,
    pub user_signature: Signature65,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,
}

/// Several trades on one outcome and side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub question_id: QuestionId,
    pub outcome_index: u32,
    pub buy: bool,
    pub items: Vec<BatchItem>,
}

/// Per-trade terms within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub quantity: U256,
    pub max_cost_usdc: U256,
    pub nonce: U256,
    pub deadline: u64,
    pub user_signature: Signature65,
    pub trade_cost_usdc: Option<U256>,
}

impl BatchRequest {
    /// Expand one item into a standalone trade request.
    #[must_use]
    pub fn trade(&self, item: &BatchItem) -> TradeRequest {
        TradeRequest {
            intent: TradeIntent {
                question_id: self.question_id,
                outcome_index: self.outcome_index,
                buy: self.buy,
                quantity: item.quantity,
                max_cost_usdc: item.max_cost_usdc,
                nonce: item.nonce,
                deadline: item.deadline,
            },
            user_signature: item.user_signature,
            trade_cost_usdc: item.trade_cost_usdc,
        }
    }
}
