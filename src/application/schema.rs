//! Typed-data schemas the settlement contracts verify.
//!
//! Field names, types and order are part of each type hash; they must match
//! the deployed contracts exactly.

use alloy_primitives::{hex, Address, B256, U256};
use serde_json::{json, Value};

use crate::domain::{Quote, TradeIntent};
use crate::infrastructure::signing::TypeSchema;

pub const DON_QUOTE: &str = "DONQuote";
pub const USER_TRADE: &str = "UserTrade";
pub const REDEEM: &str = "Redeem";

/// Quote terms signed by the off-chain authority.
#[must_use]
pub fn don_quote_schema() -> TypeSchema {
    TypeSchema::new().with_type(
        DON_QUOTE,
        &[
            ("questionId", "bytes32"),
            ("outcomeIndex", "uint256"),
            ("buy", "bool"),
            ("quantity", "uint256"),
            ("tradeCostUsdc", "uint256"),
            ("user", "address"),
            ("nonce", "uint256"),
            ("deadline", "uint256"),
        ],
    )
}

/// Trade consent signed by the trader.
#[must_use]
pub fn user_trade_schema() -> TypeSchema {
    TypeSchema::new().with_type(
        USER_TRADE,
        &[
            ("marketId", "bytes32"),
            ("outcomeIndex", "uint256"),
            ("buy", "bool"),
            ("quantity", "uint256"),
            ("maxCostUsdc", "uint256"),
            ("nonce", "uint256"),
            ("deadline", "uint256"),
        ],
    )
}

/// Position redemption signed by the position owner.
#[must_use]
pub fn redeem_schema() -> TypeSchema {
    TypeSchema::new().with_type(
        REDEEM,
        &[
            ("parentCollectionId", "bytes32"),
            ("conditionId", "bytes32"),
            ("indexSets", "uint256[]"),
            ("token", "address"),
            ("owner", "address"),
            ("deadline", "uint256"),
            ("nonce", "uint256"),
        ],
    )
}

#[must_use]
pub fn don_quote_message(quote: &Quote) -> Value {
    json!({
        "questionId": quote.question_id.to_string(),
        "outcomeIndex": quote.outcome_index.to_string(),
        "buy": quote.buy,
        "quantity": quote.quantity.to_string(),
        "tradeCostUsdc": quote.trade_cost_usdc.to_string(),
        "user": address(quote.user),
        "nonce": quote.nonce.to_string(),
        "deadline": quote.deadline.to_string(),
    })
}

#[must_use]
pub fn user_trade_message(intent: &TradeIntent) -> Value {
    json!({
        "marketId": intent.question_id.to_string(),
        "outcomeIndex": intent.outcome_index.to_string(),
        "buy": intent.buy,
        "quantity": intent.quantity.to_string(),
        "maxCostUsdc": intent.max_cost_usdc.to_string(),
        "nonce": intent.nonce.to_string(),
        "deadline": intent.deadline.to_string(),
    })
}

/// Fields of a `Redeem` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemTerms {
    pub parent_collection_id: B256,
    pub condition_id: B256,
    pub index_sets: Vec<U256>,
    pub token: Address,
    pub owner: Address,
    pub deadline: u64,
    pub nonce: U256,
}

#[must_use]
pub fn redeem_message(terms: &RedeemTerms) -> Value {
    let index_sets: Vec<String> = terms.index_sets.iter().map(U256::to_string).collect();
    json!({
        "parentCollectionId": terms.parent_collection_id.to_string(),
        "conditionId": terms.condition_id.to_string(),
        "indexSets": index_sets,
        "token": address(terms.token),
        "owner": address(terms.owner),
        "deadline": terms.deadline.to_string(),
        "nonce": terms.nonce.to_string(),
    })
}

fn address(address: Address) -> String {
    hex::encode_prefixed(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuestionId;
    use crate::infrastructure::signing::{domain, hash_typed_data};
    use alloy_sol_types::{sol, Eip712Domain, SolStruct};

    sol! {
        struct DONQuote {
            bytes32 questionId;
            uint256 outcomeIndex;
            bool buy;
            uint256 quantity;
            uint256 tradeCostUsdc;
            address user;
            uint256 nonce;
            uint256 deadline;
        }

        struct UserTrade {
            bytes32 marketId;
            uint256 outcomeIndex;
            bool buy;
            uint256 quantity;
            uint256 maxCostUsdc;
            uint256 nonce;
            uint256 deadline;
        }

        struct Redeem {
            bytes32 parentCollectionId;
            bytes32 conditionId;
            uint256[] indexSets;
            address token;
            address owner;
            uint256 deadline;
            uint256 nonce;
        }
    }

    fn vault_domain() -> Eip712Domain {
        domain("LMSRVault", "1", 84532, Address::repeat_byte(0x22))
    }

    fn question() -> QuestionId {
        QuestionId::new(B256::repeat_byte(0x11))
    }

    #[test]
    fn don_quote_hash_matches_static_struct() {
        let quote = Quote {
            question_id: question(),
            outcome_index: 1,
            buy: true,
            quantity: U256::from(10u64.pow(19)),
            trade_cost_usdc: U256::from(5_012_345),
            user: Address::repeat_byte(0x33),
            nonce: U256::from(u64::MAX),
            deadline: 1_900_000_000,
        };
        let expected = DONQuote {
            questionId: question().as_b256(),
            outcomeIndex: U256::from(1),
            buy: true,
            quantity: quote.quantity,
            tradeCostUsdc: quote.trade_cost_usdc,
            user: quote.user,
            nonce: quote.nonce,
            deadline: U256::from(quote.deadline),
        }
        .eip712_signing_hash(&vault_domain());

        let hash = hash_typed_data(
            &vault_domain(),
            &don_quote_schema(),
            DON_QUOTE,
            &don_quote_message(&quote),
        )
        .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn user_trade_hash_matches_static_struct() {
        let intent = TradeIntent {
            question_id: question(),
            outcome_index: 0,
            buy: false,
            quantity: U256::from(3u64 * 10u64.pow(18)),
            max_cost_usdc: U256::from(2_000_000),
            nonce: U256::from(9),
            deadline: 1_800_000_000,
        };
        let expected = UserTrade {
            marketId: question().as_b256(),
            outcomeIndex: U256::ZERO,
            buy: false,
            quantity: intent.quantity,
            maxCostUsdc: intent.max_cost_usdc,
            nonce: intent.nonce,
            deadline: U256::from(intent.deadline),
        }
        .eip712_signing_hash(&vault_domain());

        let hash = hash_typed_data(
            &vault_domain(),
            &user_trade_schema(),
            USER_TRADE,
            &user_trade_message(&intent),
        )
        .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn redeem_hash_matches_static_struct() {
        let market_domain = domain("PredictionMarket", "1", 84532, Address::repeat_byte(0x44));
        let terms = RedeemTerms {
            parent_collection_id: B256::ZERO,
            condition_id: B256::repeat_byte(0x55),
            index_sets: vec![U256::from(1), U256::from(2)],
            token: Address::repeat_byte(0x66),
            owner: Address::repeat_byte(0x77),
            deadline: 1_700_000_000,
            nonce: U256::from(3),
        };
        let expected = Redeem {
            parentCollectionId: terms.parent_collection_id,
            conditionId: terms.condition_id,
            indexSets: terms.index_sets.clone(),
            token: terms.token,
            owner: terms.owner,
            deadline: U256::from(terms.deadline),
            nonce: terms.nonce,
        }
        .eip712_signing_hash(&market_domain);

        let hash = hash_typed_data(
            &market_domain,
            &redeem_schema(),
            REDEEM,
            &redeem_message(&terms),
        )
        .unwrap();
        assert_eq!(hash, expected);
    }
}
