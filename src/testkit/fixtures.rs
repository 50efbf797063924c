//! Canonical keys, addresses and builders for protocol tests.

use std::sync::Arc;

use alloy_primitives::{address, Address, B256, U256};
use alloy_signer_local::PrivateKeySigner;

use super::chain::ScriptedChain;
use crate::adapter::outbound::secret::MemorySecretStore;
use crate::application::protocol::TradeAuthority;
use crate::application::schema::{user_trade_message, user_trade_schema, USER_TRADE};
use crate::domain::{ConditionId, MarketInfo, QuestionId, TradeIntent};
use crate::infrastructure::config::chain::ChainConfig;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::signing::{Signature65, TypedDataSigner};

/// Development key #0; signs as the quoting authority.
pub const DON_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Address of [`DON_KEY`].
pub const DON_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Development key #1; signs as the trader.
pub const TRADER_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Address of [`TRADER_KEY`].
pub const TRADER_ADDRESS: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

pub const CHAIN_ID: u64 = 84532;
pub const MARKET: Address = address!("1111111111111111111111111111111111111111");
pub const VAULT: Address = address!("2222222222222222222222222222222222222222");
pub const MASTER_SECRET: &str = "correct horse battery staple";

/// `n` whole outcome tokens in 18-decimal base units.
#[must_use]
pub fn tokens(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18))
}

/// Configuration pointing at [`MARKET`] and [`VAULT`] on [`CHAIN_ID`].
#[must_use]
pub fn config() -> Config {
    Config {
        chain: ChainConfig {
            chain_id: CHAIN_ID,
            market: MARKET,
            vault: VAULT,
            gas_limit: 500_000,
        },
        ..Config::default()
    }
}

/// Secrets holding the authority key and the custody master secret.
#[must_use]
pub fn secrets() -> MemorySecretStore {
    MemorySecretStore::new()
        .with("DON_PRIVATE_KEY", DON_KEY)
        .with("AGENT_MASTER_SECRET", MASTER_SECRET)
}

#[must_use]
pub fn question_id() -> QuestionId {
    QuestionId::derive(
        "Will the harbour freeze before March?",
        Address::repeat_byte(0xc0),
        Address::repeat_byte(0x0c),
    )
}

/// A two-outcome market created an hour ago with a week to run.
#[must_use]
pub fn binary_market(question_id: QuestionId) -> MarketInfo {
    MarketInfo {
        question_id,
        condition_id: ConditionId::new(B256::repeat_byte(0xcd)),
        outcome_slot_count: 2,
        oracle_type: 1,
        market_type: 0,
        created_at: 1_700_000_000,
        duration: 7 * 24 * 3600,
    }
}

/// Chain with the fixture market at equal supplies, `b = 100` tokens and
/// 1000 tokens of each outcome held by the vault.
#[must_use]
pub fn chain() -> ScriptedChain {
    let id = question_id();
    ScriptedChain::new(MARKET, VAULT)
        .with_market(binary_market(id), vec![U256::ZERO, U256::ZERO], tokens(100))
        .with_balance(id, 0, tokens(1000))
        .with_balance(id, 1, tokens(1000))
}

/// Authority wired to `chain` with the fixture config and secrets.
#[must_use]
pub fn authority(chain: Arc<ScriptedChain>) -> TradeAuthority {
    TradeAuthority::new(&config(), chain, Arc::new(secrets()))
}

/// Deadline an hour from now.
#[must_use]
pub fn deadline() -> u64 {
    crate::application::protocol::unix_now() + 3600
}

#[must_use]
pub fn trader() -> PrivateKeySigner {
    TRADER_KEY.parse().expect("valid fixture key")
}

/// Sign `intent` as `signer` under the fixture quote domain.
#[must_use]
pub fn sign_intent(signer: &PrivateKeySigner, intent: &TradeIntent) -> Signature65 {
    TypedDataSigner::new(signer.clone(), config().quote_domain())
        .sign(&user_trade_schema(), USER_TRADE, &user_trade_message(intent))
        .expect("fixture intent signs")
}

/// A buy intent for `quantity` of outcome 0 with a generous cost cap.
#[must_use]
pub fn buy_intent(quantity: U256, nonce: u64) -> TradeIntent {
    TradeIntent {
        question_id: question_id(),
        outcome_index: 0,
        buy: true,
        quantity,
        max_cost_usdc: U256::from(1_000_000_000u64),
        nonce: U256::from(nonce),
        deadline: deadline(),
    }
}
