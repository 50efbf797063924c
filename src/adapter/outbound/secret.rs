//! Secret store implementations.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::port::outbound::secret::SecretStore;

/// Resolves secret ids as process environment variables.
///
/// Empty values count as absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn get_secret(&self, id: &str) -> Option<String> {
        std::env::var(id).ok().filter(|value| !value.trim().is_empty())
    }
}

/// In-memory secrets, for embedding and tests.
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&self, id: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().insert(id.into(), value.into());
    }

    pub fn remove(&self, id: &str) {
        self.secrets.write().remove(id);
    }
}

impl SecretStore for MemorySecretStore {
    fn get_secret(&self, id: &str) -> Option<String> {
        self.secrets.read().get(id).cloned()
    }
}

impl std::fmt::Debug for MemorySecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self.secrets.read().keys().cloned().collect();
        f.debug_struct("MemorySecretStore")
            .field("ids", &ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_returns_what_was_inserted() {
        let store = MemorySecretStore::new().with("DON_PRIVATE_KEY", "0xabc");
        assert_eq!(store.get_secret("DON_PRIVATE_KEY").as_deref(), Some("0xabc"));
        assert_eq!(store.get_secret("AGENT_MASTER_SECRET"), None);

        store.remove("DON_PRIVATE_KEY");
        assert_eq!(store.get_secret("DON_PRIVATE_KEY"), None);
    }

    #[test]
    fn debug_lists_ids_only() {
        let store = MemorySecretStore::new().with("KEY", "hunter2");
        let debug = format!("{store:?}");
        assert!(debug.contains("KEY"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn env_store_treats_unset_as_absent() {
        assert_eq!(
            EnvSecretStore.get_secret("LMSR_SETTLEMENT_TEST_SECRET_THAT_IS_NEVER_SET"),
            None
        );
    }
}
