//! Target chain and receiving contracts.

use alloy_primitives::Address;
use serde::Deserialize;

/// Where reports are sent and which chain signatures are bound to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Receiver for create, resolve, stake and redeem reports.
    pub market: Address,
    /// Receiver for execute-trade and seed-liquidity reports; also the
    /// verifying contract of quote signatures.
    pub vault: Address,
    /// Gas limit attached to every report submission.
    pub gas_limit: u64,
}
