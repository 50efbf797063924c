#![allow(dead_code)]

pub mod trade;

use std::sync::Arc;

use lmsr_settlement::application::protocol::TradeAuthority;
use lmsr_settlement::testkit::chain::ScriptedChain;
use lmsr_settlement::testkit::fixtures;

/// Fixture chain plus an authority reading from it.
pub fn setup() -> (Arc<ScriptedChain>, TradeAuthority) {
    with_chain(fixtures::chain())
}

pub fn with_chain(chain: ScriptedChain) -> (Arc<ScriptedChain>, TradeAuthority) {
    let chain = Arc::new(chain);
    let authority = fixtures::authority(chain.clone());
    (chain, authority)
}
