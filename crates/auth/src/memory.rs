use super::*;
use std::collections::HashMap;
use tokio::sync::RwLock;
use vce_core::ID;
use vce_core::Unique;

/// In-process profile store and account directory.
/// Backs tests and database-less development runs.
#[derive(Default)]
pub struct Memory {
    users: RwLock<HashMap<ID<Principal>, Principal>>,
    accounts: RwLock<HashMap<ID<Account>, Account>>,
}

#[async_trait::async_trait]
impl PrincipalStore for Memory {
    async fn get(&self, id: &ID<Principal>) -> Result<Option<Principal>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }
    async fn exists(&self, id: &ID<Principal>) -> Result<bool, StoreError> {
        Ok(self.users.read().await.contains_key(id))
    }
    async fn insert(&self, principal: &Principal) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .entry(principal.id())
            .or_insert_with(|| principal.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl Directory for Memory {
    async fn account(&self, id: &ID<Account>) -> Result<Option<Account>, Fault> {
        Ok(self.accounts.read().await.get(id).cloned())
    }
    async fn by_email(&self, email: &str) -> Result<Option<Account>, Fault> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email().eq_ignore_ascii_case(email))
            .cloned())
    }
    async fn create(&self, email: &str) -> Result<Account, Fault> {
        if !plausible(email) {
            return Err(Fault::InvalidEmail);
        }
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email().eq_ignore_ascii_case(email)) {
            return Err(Fault::EmailInUse);
        }
        let account = Account::new(ID::default(), email.to_owned());
        accounts.insert(account.id(), account.clone());
        Ok(account)
    }
    async fn disable(&self, id: &ID<Account>) -> Result<(), Fault> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(id).ok_or(Fault::UserNotFound)?;
        *account = account.clone().with(true, account.revoked_before());
        Ok(())
    }
    async fn revoke(&self, id: &ID<Account>, before: i64) -> Result<(), Fault> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(id).ok_or(Fault::UserNotFound)?;
        *account = account.clone().with(account.disabled(), Some(before));
        Ok(())
    }
}
