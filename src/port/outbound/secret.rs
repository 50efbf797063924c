//! Secret store port.

/// Looks up secrets by id.
///
/// A missing secret is an ordinary `None`; callers decide which operation
/// fails because of it.
pub trait SecretStore: Send + Sync {
    fn get_secret(&self, id: &str) -> Option<String>;
}
