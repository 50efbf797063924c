//! Token precision and quote lifetime.

use serde::Deserialize;

/// Largest decimals value whose scale factor still fits in a `U256`.
pub const MAX_DECIMALS: u8 = 77;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Decimals of outcome tokens; supplies and liquidity share this scale.
    pub outcome_decimals: u8,
    /// Decimals of the settlement token.
    pub usdc_decimals: u8,
    /// Seconds a freshly issued quote stays valid.
    pub quote_ttl_secs: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            outcome_decimals: 18,
            usdc_decimals: 6,
            quote_ttl_secs: 300,
        }
    }
}
