use vce_core::ID;
use vce_core::Unique;

/// Durable profile record for an authenticated person.
/// The id is minted by the identity provider and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    id: ID<Self>,
    email: String,
    name: String,
}

impl Principal {
    pub fn new(id: ID<Self>, email: String, name: String) -> Self {
        Self { id, email, name }
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Unique for Principal {
    fn id(&self) -> ID<Self> {
        self.id.clone()
    }
}

/// What callers learn about the current user. Never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedUser {
    pub id: ID<Principal>,
    pub email: String,
    pub name: String,
}

impl From<Principal> for ResolvedUser {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            email: principal.email,
            name: principal.name,
        }
    }
}

/// Outcome of profile registration. Neither variant is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    AlreadyExists,
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use vce_database::*;

    impl Schema for Principal {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id          TEXT PRIMARY KEY,
                    email       TEXT NOT NULL,
                    name        TEXT NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_users_email ON ",
                USERS,
                " (email);"
            )
        }
    }
}
