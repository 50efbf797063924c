//! Typed reads of market and vault contract state.
//!
//! Calls are ABI-encoded here and handed to a [`ChainClient`] as opaque
//! calldata; responses are decoded back into domain types. Nothing is
//! cached: every read goes to the chain.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use tracing::debug;

use crate::domain::{ConditionId, MarketInfo, QuestionId};
use crate::port::outbound::chain::{ChainClient, ChainError};

sol! {
    /// Market registry read surface.
    interface IPredictionMarket {
        function getMarket(bytes32 questionId) external view returns (
            bytes32 conditionId,
            uint8 outcomeSlotCount,
            uint8 oracleType,
            uint8 marketType,
            uint256 createdAt,
            uint256 duration
        );
    }

    /// LMSR vault read surface.
    interface ILmsrVault {
        function outcomeSupplies(bytes32 questionId) external view returns (uint256[]);
        function liquidityParameter(bytes32 questionId) external view returns (uint256);
        function outcomeBalance(bytes32 questionId, uint256 outcomeIndex) external view returns (uint256);
        function isNonceUsed(bytes32 questionId, uint256 nonce) external view returns (bool);
    }
}

/// Reads market and vault state through a chain client.
#[derive(Clone)]
pub struct ChainReader {
    chain: Arc<dyn ChainClient>,
    market: Address,
    vault: Address,
}

impl ChainReader {
    #[must_use]
    pub fn new(chain: Arc<dyn ChainClient>, market: Address, vault: Address) -> Self {
        Self {
            chain,
            market,
            vault,
        }
    }

    /// Look up a market; `None` when the registry has no such question.
    pub async fn market(&self, question_id: QuestionId) -> Result<Option<MarketInfo>, ChainError> {
        let call = IPredictionMarket::getMarketCall {
            questionId: question_id.as_b256(),
        };
        let ret = self.call(self.market, &call).await?;
        if ret.outcomeSlotCount == 0 {
            debug!(%question_id, "market not found");
            return Ok(None);
        }
        Ok(Some(MarketInfo {
            question_id,
            condition_id: ConditionId::new(ret.conditionId),
            outcome_slot_count: u32::from(ret.outcomeSlotCount),
            oracle_type: ret.oracleType,
            market_type: ret.marketType,
            created_at: ret.createdAt.saturating_to(),
            duration: ret.duration.saturating_to(),
        }))
    }

    /// Current outcome-token supply per slot, in outcome base units.
    pub async fn outcome_supplies(&self, question_id: QuestionId) -> Result<Vec<U256>, ChainError> {
        let call = ILmsrVault::outcomeSuppliesCall {
            questionId: question_id.as_b256(),
        };
        self.call(self.vault, &call).await
    }

    /// LMSR liquidity parameter `b`, in outcome base units.
    pub async fn liquidity_parameter(&self, question_id: QuestionId) -> Result<U256, ChainError> {
        let call = ILmsrVault::liquidityParameterCall {
            questionId: question_id.as_b256(),
        };
        self.call(self.vault, &call).await
    }

    /// Outcome tokens the vault holds for one slot.
    pub async fn outcome_balance(
        &self,
        question_id: QuestionId,
        outcome_index: u32,
    ) -> Result<U256, ChainError> {
        let call = ILmsrVault::outcomeBalanceCall {
            questionId: question_id.as_b256(),
            outcomeIndex: U256::from(outcome_index),
        };
        self.call(self.vault, &call).await
    }

    /// Whether the vault has already consumed `nonce` for this market.
    pub async fn is_nonce_used(&self, question_id: QuestionId, nonce: U256) -> Result<bool, ChainError> {
        let call = ILmsrVault::isNonceUsedCall {
            questionId: question_id.as_b256(),
            nonce,
        };
        self.call(self.vault, &call).await
    }

    async fn call<C: SolCall>(&self, contract: Address, call: &C) -> Result<C::Return, ChainError> {
        let calldata = Bytes::from(call.abi_encode());
        let response = self.chain.read_contract(contract, calldata).await?;
        C::abi_decode_returns(&response)
            .map_err(|e| ChainError::Decode(format!("{}: {e}", C::SIGNATURE)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{hex, B256};

    #[test]
    fn selectors_match_the_declared_signatures() {
        assert_eq!(
            IPredictionMarket::getMarketCall::SIGNATURE,
            "getMarket(bytes32)"
        );
        assert_eq!(
            ILmsrVault::isNonceUsedCall::SIGNATURE,
            "isNonceUsed(bytes32,uint256)"
        );
        assert_eq!(
            ILmsrVault::outcomeBalanceCall::SELECTOR,
            alloy_primitives::keccak256("outcomeBalance(bytes32,uint256)")[..4]
        );
    }

    #[test]
    fn calldata_is_selector_then_arguments() {
        let call = ILmsrVault::isNonceUsedCall {
            questionId: B256::repeat_byte(0xab),
            nonce: U256::from(7),
        };
        let encoded = call.abi_encode();

        assert_eq!(encoded.len(), 4 + 64);
        assert_eq!(encoded[..4], ILmsrVault::isNonceUsedCall::SELECTOR);
        assert_eq!(encoded[4..36], [0xab; 32]);
        assert_eq!(
            hex::encode(&encoded[36..]),
            format!("{:0>64}", "7")
        );
    }
}
