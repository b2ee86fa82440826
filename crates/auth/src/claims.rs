use super::*;
use vce_core::ID;

/// Audience of identity tokens.
pub const IDENTITY_AUDIENCE: &str = "identity";
/// Audience of session credentials.
pub const SESSION_AUDIENCE: &str = "session";

/// JWT payload of a session credential.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    /// Issued-at in milliseconds; revocation compares against this.
    pub ims: i64,
}

impl Claims {
    pub fn new(principal: ID<Principal>, ttl: std::time::Duration) -> Self {
        let ims = vce_core::now_millis();
        let now = ims / 1000;
        Self {
            sub: principal.into_inner(),
            aud: SESSION_AUDIENCE.to_owned(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            ims,
        }
    }
    pub fn principal(&self) -> ID<Principal> {
        ID::from(self.sub.as_str())
    }
    pub fn issued(&self) -> i64 {
        self.ims
    }
}

/// JWT payload of an identity token, as the identity provider signs it.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Assertion {
    pub sub: String,
    pub email: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Assertion {
    pub fn new(account: &Account, ttl: std::time::Duration) -> Self {
        use vce_core::Unique;
        let now = vce_core::now();
        Self {
            sub: account.id().into_inner(),
            email: account.email().to_owned(),
            aud: IDENTITY_AUDIENCE.to_owned(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }
    pub fn account(&self) -> ID<Account> {
        ID::from(self.sub.as_str())
    }
}
