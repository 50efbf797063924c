//! Signing domains and the secret ids signing material is looked up under.

use serde::Deserialize;

/// Typed-data domain names and secret-store ids.
///
/// Secret values are never read from the config file; only the ids used to
/// fetch them from the secret store are.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Domain name for quote and trade signatures.
    pub domain_name: String,
    pub domain_version: String,
    /// Domain name for redemption signatures, verified by the market contract.
    pub market_domain_name: String,
    /// Secret id of the quoting authority's private key.
    pub don_key_secret: String,
    /// Secret id of the agent-key master secret.
    pub master_secret: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            domain_name: "LMSRVault".into(),
            domain_version: "1".into(),
            market_domain_name: "PredictionMarket".into(),
            don_key_secret: "DON_PRIVATE_KEY".into(),
            master_secret: "AGENT_MASTER_SECRET".into(),
        }
    }
}
