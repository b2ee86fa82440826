use super::*;
use vce_core::ID;

/// Durable profile storage keyed by principal id.
#[async_trait::async_trait]
pub trait PrincipalStore: Send + Sync {
    async fn get(&self, id: &ID<Principal>) -> Result<Option<Principal>, StoreError>;
    async fn exists(&self, id: &ID<Principal>) -> Result<bool, StoreError>;
    /// Insert if absent. An existing record is left untouched.
    async fn insert(&self, principal: &Principal) -> Result<(), StoreError>;
}
