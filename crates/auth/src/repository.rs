use super::*;
use std::sync::Arc;
use tokio_postgres::Client;
use vce_core::ID;
use vce_core::Unique;
use vce_database::*;

/// Create the identity tables if they are missing.
pub async fn migrate(client: &Client) -> Result<(), PgErr> {
    log::info!("migrating {}", <Principal as Schema>::name());
    client.batch_execute(Principal::creates()).await?;
    client.batch_execute(Principal::indices()).await?;
    log::info!("migrating {}", <Account as Schema>::name());
    client.batch_execute(Account::creates()).await?;
    client.batch_execute(Account::indices()).await?;
    Ok(())
}

fn unavailable(e: PgErr) -> StoreError {
    log::error!("principal store error: {}", e);
    StoreError::Unavailable(e.to_string())
}

fn fault(e: PgErr) -> Fault {
    log::error!("account directory error: {}", e);
    Fault::Unavailable(e.to_string())
}

fn account(row: tokio_postgres::Row) -> Account {
    Account::new(ID::from(row.get::<_, String>(0)), row.get::<_, String>(1))
        .with(row.get::<_, bool>(2), row.get::<_, Option<i64>>(3))
}

#[async_trait::async_trait]
impl PrincipalStore for Arc<Client> {
    async fn get(&self, id: &ID<Principal>) -> Result<Option<Principal>, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT id, email, name FROM ", USERS, " WHERE id = $1"),
            &[&id.as_str()],
        )
        .await
        .map(|opt| {
            opt.map(|row| {
                Principal::new(
                    ID::from(row.get::<_, String>(0)),
                    row.get::<_, String>(1),
                    row.get::<_, String>(2),
                )
            })
        })
        .map_err(unavailable)
    }

    async fn exists(&self, id: &ID<Principal>) -> Result<bool, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT 1 FROM ", USERS, " WHERE id = $1"),
            &[&id.as_str()],
        )
        .await
        .map(|opt| opt.is_some())
        .map_err(unavailable)
    }

    async fn insert(&self, principal: &Principal) -> Result<(), StoreError> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (id, email, name) VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING"
            ),
            &[&principal.id().as_str(), &principal.email(), &principal.name()],
        )
        .await
        .map(|_| ())
        .map_err(unavailable)
    }
}

#[async_trait::async_trait]
impl Directory for Arc<Client> {
    async fn account(&self, id: &ID<Account>) -> Result<Option<Account>, Fault> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, email, disabled, revoked_before FROM ",
                ACCOUNTS,
                " WHERE id = $1"
            ),
            &[&id.as_str()],
        )
        .await
        .map(|opt| opt.map(account))
        .map_err(fault)
    }

    async fn by_email(&self, email: &str) -> Result<Option<Account>, Fault> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT id, email, disabled, revoked_before FROM ",
                ACCOUNTS,
                " WHERE lower(email) = lower($1)"
            ),
            &[&email],
        )
        .await
        .map(|opt| opt.map(account))
        .map_err(fault)
    }

    async fn create(&self, email: &str) -> Result<Account, Fault> {
        if !plausible(email) {
            return Err(Fault::InvalidEmail);
        }
        if Directory::by_email(self, email).await?.is_some() {
            return Err(Fault::EmailInUse);
        }
        let account = Account::new(ID::default(), email.to_owned());
        self.query_opt(
            const_format::concatcp!(
                "INSERT INTO ",
                ACCOUNTS,
                " (id, email) VALUES ($1, $2) ON CONFLICT DO NOTHING RETURNING id"
            ),
            &[&account.id().as_str(), &account.email()],
        )
        .await
        .map_err(fault)?
        .map(|_| account)
        .ok_or(Fault::EmailInUse)
    }

    async fn disable(&self, id: &ID<Account>) -> Result<(), Fault> {
        self.execute(
            const_format::concatcp!("UPDATE ", ACCOUNTS, " SET disabled = TRUE WHERE id = $1"),
            &[&id.as_str()],
        )
        .await
        .map_err(fault)
        .and_then(|n| if n == 0 { Err(Fault::UserNotFound) } else { Ok(()) })
    }

    async fn revoke(&self, id: &ID<Account>, before: i64) -> Result<(), Fault> {
        self.execute(
            const_format::concatcp!("UPDATE ", ACCOUNTS, " SET revoked_before = $2 WHERE id = $1"),
            &[&id.as_str(), &before],
        )
        .await
        .map_err(fault)
        .and_then(|n| if n == 0 { Err(Fault::UserNotFound) } else { Ok(()) })
    }
}
