use std::fmt::Debug;
use std::fmt::Formatter;

/// Short-lived proof of a just-completed sign-in, exchanged once for a
/// [`Credential`].
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToken(String);

/// Signed, week-long session credential. The cookie value, byte for byte.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl IdentityToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for IdentityToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}
impl From<&str> for IdentityToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}
impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}
impl From<Credential> for String {
    fn from(credential: Credential) -> Self {
        credential.0
    }
}

// tokens stay out of logs
impl Debug for IdentityToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("IdentityToken(..)")
    }
}
impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}
