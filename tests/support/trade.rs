use alloy_primitives::U256;
use lmsr_settlement::application::protocol::{BatchItem, TradeRequest};
use lmsr_settlement::domain::TradeIntent;
use lmsr_settlement::testkit::fixtures;

/// Trader-signed request for `intent`, priced by the authority.
pub fn signed(intent: TradeIntent) -> TradeRequest {
    let user_signature = fixtures::sign_intent(&fixtures::trader(), &intent);
    TradeRequest {
        intent,
        user_signature,
        trade_cost_usdc: None,
    }
}

/// Trader-signed buy of `quantity` tokens of outcome 0.
pub fn buy(quantity: u64, nonce: u64) -> TradeRequest {
    signed(fixtures::buy_intent(fixtures::tokens(quantity), nonce))
}

/// Batch item for a buy of outcome 0, signed as the trader.
pub fn batch_item(quantity: u64, nonce: u64) -> BatchItem {
    let intent = fixtures::buy_intent(fixtures::tokens(quantity), nonce);
    BatchItem {
        quantity: intent.quantity,
        max_cost_usdc: intent.max_cost_usdc,
        nonce: intent.nonce,
        deadline: intent.deadline,
        user_signature: fixtures::sign_intent(&fixtures::trader(), &intent),
        trade_cost_usdc: None,
    }
}

pub fn nonce(n: u64) -> U256 {
    U256::from(n)
}
