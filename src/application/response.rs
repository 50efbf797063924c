//! Structured result handed back to whoever triggered a request.
//!
//! Serialized as camelCase JSON:
//! `{ status, result?, txHash?, questionId?, errors? }`.

use alloy_primitives::B256;
use serde::Serialize;
use serde_json::{json, Value};

use crate::application::market::MarketWrite;
use crate::application::protocol::{
    AuthorizationError, BatchOutcome, ErrorKind, ProtocolError, Stage, TradeReceipt,
};
use crate::domain::QuestionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    /// Some batch items succeeded and some failed.
    Partial,
    Error,
}

/// One failure entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseError {
    /// Zero-based batch item index, for batch requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    pub message: String,
    /// Transaction that landed before the failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<QuestionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ResponseError>>,
}

impl Response {
    /// Successful response carrying `result`.
    ///
    /// # Errors
    ///
    /// Returns an error if `result` cannot be represented as JSON.
    pub fn success(result: &impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            status: ResponseStatus::Success,
            result: Some(serde_json::to_value(result)?),
            tx_hash: None,
            question_id: None,
            errors: None,
        })
    }

    #[must_use]
    pub fn with_tx_hash(mut self, tx_hash: Option<B256>) -> Self {
        self.tx_hash = tx_hash;
        self
    }

    #[must_use]
    pub fn with_question_id(mut self, question_id: QuestionId) -> Self {
        self.question_id = Some(question_id);
        self
    }

    /// Executed trade, keyed by its market.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be represented as JSON.
    pub fn from_trade(receipt: &TradeReceipt) -> Result<Self, serde_json::Error> {
        Ok(Self::success(receipt)?
            .with_tx_hash(receipt.tx_hash)
            .with_question_id(receipt.quote.question_id))
    }

    /// Submitted market write.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be represented as JSON.
    pub fn from_market_write(write: &MarketWrite) -> Result<Self, serde_json::Error> {
        Ok(Self::success(write)?
            .with_tx_hash(write.tx_hash)
            .with_question_id(write.question_id))
    }

    /// Failed single request. A transaction that landed before the receiver
    /// reverted is still reported through `txHash`.
    #[must_use]
    pub fn failure(err: &AuthorizationError) -> Self {
        Self::error(ResponseError {
            index: None,
            kind: err.kind(),
            stage: Some(err.stage),
            message: err.source.to_string(),
            tx_hash: err.tx_hash(),
        })
    }

    /// Failed market write.
    #[must_use]
    pub fn from_protocol_error(err: &ProtocolError) -> Self {
        Self::error(ResponseError {
            index: None,
            kind: err.kind(),
            stage: None,
            message: err.to_string(),
            tx_hash: err.tx_hash(),
        })
    }

    /// Summarise a batch: `success` when every item went through, `error`
    /// when none did, `partial` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a receipt cannot be represented as JSON.
    pub fn from_batch(outcome: &BatchOutcome) -> Result<Self, serde_json::Error> {
        let status = if outcome.errors.is_empty() {
            ResponseStatus::Success
        } else if outcome.trades.is_empty() {
            ResponseStatus::Error
        } else {
            ResponseStatus::Partial
        };
        let errors: Vec<ResponseError> = outcome
            .errors
            .iter()
            .map(|item| ResponseError {
                index: Some(item.index),
                kind: item.kind,
                stage: Some(item.stage),
                message: item.message.clone(),
                tx_hash: item.tx_hash,
            })
            .collect();

        Ok(Self {
            status,
            result: Some(json!({
                "txHashes": outcome.tx_hashes(),
                "trades": serde_json::to_value(&outcome.trades)?,
            })),
            tx_hash: None,
            question_id: None,
            errors: (!errors.is_empty()).then_some(errors),
        })
    }

    fn error(error: ResponseError) -> Self {
        Self {
            status: ResponseStatus::Error,
            result: None,
            tx_hash: error.tx_hash,
            question_id: None,
            errors: Some(vec![error]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;

    #[test]
    fn success_omits_absent_fields() {
        let response = Response::success(&json!({ "ok": true }))
            .unwrap()
            .with_tx_hash(Some(B256::repeat_byte(0xaa)));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["result"]["ok"], true);
        assert_eq!(value["txHash"], B256::repeat_byte(0xaa).to_string());
        assert!(value.get("questionId").is_none());
        assert!(value.get("errors").is_none());
    }

    #[test]
    fn failure_carries_kind_and_stage() {
        let err = AuthorizationError::new(
            Stage::Validating,
            DomainError::IndexOutOfRange { index: 3, slots: 2 },
        );
        let value = serde_json::to_value(Response::failure(&err)).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["errors"][0]["kind"], "validation");
        assert_eq!(value["errors"][0]["stage"], "validating");
        assert!(value.get("result").is_none());
        assert!(value.get("txHash").is_none());
    }

    #[test]
    fn market_write_carries_question_id_and_hash() {
        let question_id = QuestionId::new(B256::repeat_byte(0x07));
        let write = MarketWrite {
            question_id,
            tx_hash: Some(B256::repeat_byte(0x08)),
        };
        let value = serde_json::to_value(Response::from_market_write(&write).unwrap()).unwrap();

        assert_eq!(value["status"], "success");
        assert_eq!(value["questionId"], question_id.to_string());
        assert_eq!(value["txHash"], B256::repeat_byte(0x08).to_string());
    }

    #[test]
    fn failed_market_write_keeps_the_landed_hash() {
        let err = ProtocolError::from(crate::application::report::SubmitError::ReceiverRevert {
            tx_hash: Some(B256::repeat_byte(0x09)),
        });
        let value = serde_json::to_value(Response::from_protocol_error(&err)).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["errors"][0]["kind"], "receiver_revert");
        assert_eq!(value["txHash"], B256::repeat_byte(0x09).to_string());
        assert!(value["errors"][0].get("stage").is_none());
    }
}
