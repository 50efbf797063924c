//! Trade terms exchanged between the authority and a trader.

use alloy_primitives::{Address, U256};
use serde::Serialize;

use super::id::QuestionId;

/// Terms priced and signed by the off-chain authority.
///
/// With `user == Address::ZERO` the quote is advisory: it carries a valid
/// authority signature but can never be executed on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub question_id: QuestionId,
    pub outcome_index: u32,
    pub buy: bool,
    /// Outcome tokens, in base units.
    pub quantity: U256,
    /// Settlement-token cost (buy) or proceeds (sell), in base units.
    pub trade_cost_usdc: U256,
    pub user: Address,
    pub nonce: U256,
    /// Unix seconds after which the quote is void.
    pub deadline: u64,
}

impl Quote {
    /// True when no trader is bound to the quote.
    #[must_use]
    pub fn is_advisory(&self) -> bool {
        self.user == Address::ZERO
    }
}

/// Terms a trader consents to by signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeIntent {
    pub question_id: QuestionId,
    pub outcome_index: u32,
    pub buy: bool,
    pub quantity: U256,
    /// Most the trader will pay, in settlement-token base units.
    pub max_cost_usdc: U256,
    pub nonce: U256,
    pub deadline: u64,
}

impl TradeIntent {
    /// Bind this intent to a priced cost and the trader who signed it.
    #[must_use]
    pub fn into_quote(self, trade_cost_usdc: U256, user: Address) -> Quote {
        Quote {
            question_id: self.question_id,
            outcome_index: self.outcome_index,
            buy: self.buy,
            quantity: self.quantity,
            trade_cost_usdc,
            user,
            nonce: self.nonce,
            deadline: self.deadline,
        }
    }
}
