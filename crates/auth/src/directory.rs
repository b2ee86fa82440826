use super::*;
use vce_core::ID;

/// Account registry owned by the identity provider.
/// Consulted by [`Crypto`] for existence, enabled state, and revocation.
#[async_trait::async_trait]
pub trait Directory: Send + Sync {
    async fn account(&self, id: &ID<Account>) -> Result<Option<Account>, Fault>;
    async fn by_email(&self, email: &str) -> Result<Option<Account>, Fault>;
    /// Register a new account under a fresh id.
    async fn create(&self, email: &str) -> Result<Account, Fault>;
    async fn disable(&self, id: &ID<Account>) -> Result<(), Fault>;
    /// Record that credentials issued at or before `before` are invalid.
    async fn revoke(&self, id: &ID<Account>, before: i64) -> Result<(), Fault>;
}
