//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; signing keys and the custody
//! master secret are never part of it and are resolved through a
//! [`SecretStore`](crate::port::outbound::secret::SecretStore) by id.
//!
//! # Example
//!
//! ```no_run
//! use lmsr_settlement::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use alloy_primitives::Address;
use alloy_sol_types::Eip712Domain;
use serde::Deserialize;

use super::chain::ChainConfig;
use super::logging::{LoggingConfig, LOG_FORMATS};
use super::pricing::{PricingConfig, MAX_DECIMALS};
use super::signing::SigningConfig;
use crate::error::{ConfigError, Result};
use crate::infrastructure::signing;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Chain id, receiving contracts and gas limit.
    #[serde(default)]
    pub chain: ChainConfig,

    /// Signing domains and secret ids.
    #[serde(default)]
    pub signing: SigningConfig,

    /// Token decimals and quote lifetime.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns the first field that is missing or out of range.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.chain.chain_id == 0 {
            return Err(ConfigError::MissingField { field: "chain_id" }.into());
        }
        if self.chain.market == Address::ZERO {
            return Err(ConfigError::MissingField { field: "market" }.into());
        }
        if self.chain.vault == Address::ZERO {
            return Err(ConfigError::MissingField { field: "vault" }.into());
        }
        if self.chain.gas_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "gas_limit",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let required = [
            ("domain_name", &self.signing.domain_name),
            ("domain_version", &self.signing.domain_version),
            ("market_domain_name", &self.signing.market_domain_name),
            ("don_key_secret", &self.signing.don_key_secret),
            ("master_secret", &self.signing.master_secret),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
        }

        let pricing = &self.pricing;
        if pricing.outcome_decimals > MAX_DECIMALS {
            return Err(ConfigError::InvalidValue {
                field: "outcome_decimals",
                reason: format!("must be at most {MAX_DECIMALS}"),
            }
            .into());
        }
        if pricing.usdc_decimals > pricing.outcome_decimals {
            return Err(ConfigError::InvalidValue {
                field: "usdc_decimals",
                reason: "must not exceed outcome_decimals".to_string(),
            }
            .into());
        }
        if pricing.quote_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "quote_ttl_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("must be one of {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }
        Ok(())
    }

    /// Domain that quote and trade signatures are bound to.
    #[must_use]
    pub fn quote_domain(&self) -> Eip712Domain {
        signing::domain(
            self.signing.domain_name.clone(),
            self.signing.domain_version.clone(),
            self.chain.chain_id,
            self.chain.vault,
        )
    }

    /// Domain that redemption signatures are bound to.
    #[must_use]
    pub fn market_domain(&self) -> Eip712Domain {
        signing::domain(
            self.signing.market_domain_name.clone(),
            self.signing.domain_version.clone(),
            self.chain.chain_id,
            self.chain.market,
        )
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
