//! Trading agent provisioning.
//!
//! Agents get a fresh key per request. Only the address and the encrypted
//! key ever leave this service; the plaintext key exists only inside an
//! [`AgentIdentity`] for the duration of a signing operation.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::application::protocol::ProtocolError;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::custody::{self, AgentIdentity, EncryptedKey, CUSTODY_VERSION};
use crate::port::outbound::secret::SecretStore;

/// What a caller may persist about a new agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedAgent {
    /// EIP-55 checksummed address.
    pub address: String,
    pub encrypted_key: EncryptedKey,
    /// Custody scheme the key was encrypted with.
    pub custody_version: &'static str,
}

/// Generates, encrypts and unlocks agent keys under the master secret.
pub struct AgentService {
    secrets: Arc<dyn SecretStore>,
    master_secret_id: String,
}

impl AgentService {
    #[must_use]
    pub fn new(config: &Config, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            secrets,
            master_secret_id: config.signing.master_secret.clone(),
        }
    }

    /// Create a new agent, mixing `seed` into key generation when given.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingSecret`] without the master secret and
    /// [`ProtocolError::Custody`] if generation or encryption fails.
    pub fn provision(&self, seed: Option<&[u8]>) -> Result<ProvisionedAgent, ProtocolError> {
        let master = self.master_secret()?;
        let identity = custody::generate(seed)?;
        let encrypted_key = custody::encrypt(&identity, &master)?;
        let address = identity.checksum_address();

        info!(%address, seeded = seed.is_some(), "agent provisioned");
        Ok(ProvisionedAgent {
            address,
            encrypted_key,
            custody_version: CUSTODY_VERSION,
        })
    }

    /// Decrypt a stored agent key.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MissingSecret`] without the master secret and
    /// [`ProtocolError::Custody`] when the blob does not authenticate.
    pub fn unlock(&self, encrypted_key: &EncryptedKey) -> Result<AgentIdentity, ProtocolError> {
        let master = self.master_secret()?;
        Ok(custody::decrypt(encrypted_key, &master)?)
    }

    fn master_secret(&self) -> Result<String, ProtocolError> {
        self.secrets
            .get_secret(&self.master_secret_id)
            .ok_or_else(|| ProtocolError::MissingSecret {
                id: self.master_secret_id.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::secret::MemorySecretStore;
    use crate::application::protocol::ErrorKind;
    use alloy_primitives::Address;

    fn service(secrets: MemorySecretStore) -> AgentService {
        AgentService::new(&Config::default(), Arc::new(secrets))
    }

    #[test]
    fn provisioned_key_unlocks_to_the_same_address() {
        let agents = service(MemorySecretStore::new().with("AGENT_MASTER_SECRET", "m4ster"));
        let agent = agents.provision(Some(b"request-1")).unwrap();
        let identity = agents.unlock(&agent.encrypted_key).unwrap();

        assert_eq!(identity.checksum_address(), agent.address);
        assert_eq!(agent.custody_version, CUSTODY_VERSION);
    }

    #[test]
    fn serialized_agent_has_no_plaintext_key() {
        let agents = service(MemorySecretStore::new().with("AGENT_MASTER_SECRET", "m4ster"));
        let agent = agents.provision(None).unwrap();
        let identity = agents.unlock(&agent.encrypted_key).unwrap();

        let json = serde_json::to_string(&agent).unwrap();
        assert!(json.contains("encryptedKey"));
        assert!(!json.contains(&alloy_primitives::hex::encode(identity.private_key())));
        assert!(agent.address.parse::<Address>().is_ok());
    }

    #[test]
    fn missing_master_secret_is_a_configuration_error() {
        let err = service(MemorySecretStore::new()).provision(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
