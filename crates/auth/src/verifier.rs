use super::*;
use vce_core::ID;

/// Trusted identity verifier.
///
/// Owns the session credential format: it mints credentials from identity
/// tokens and later turns them back into a principal id. Callers only
/// transport the opaque strings.
#[async_trait::async_trait]
pub trait Verifier: Send + Sync {
    /// Exchange a short-lived identity token for a session credential
    /// valid for `ttl`.
    async fn exchange(&self, token: &IdentityToken, ttl: std::time::Duration) -> Result<Credential, Fault>;
    /// Verify a session credential. With `check_revoked`, also reject
    /// credentials of disabled accounts or revoked sessions.
    async fn verify(&self, credential: &Credential, check_revoked: bool) -> Result<ID<Principal>, Fault>;
    /// Find the account registered under an email address.
    async fn lookup(&self, email: &str) -> Result<Option<ID<Principal>>, Fault>;
    /// Invalidate every credential issued to the principal up to now.
    async fn revoke(&self, principal: &ID<Principal>) -> Result<(), Fault>;
}
