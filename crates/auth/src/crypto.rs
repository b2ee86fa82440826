use super::*;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Validation;
use jsonwebtoken::errors::ErrorKind;
use std::sync::Arc;
use vce_core::ID;
use vce_core::Unique;

/// Lifetime of identity tokens minted by [`Crypto::identity`].
const IDENTITY_TOKEN_DURATION: std::time::Duration = std::time::Duration::from_secs(60 * 60);

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// HS256 JWT verifier.
///
/// Identity tokens and session credentials are both JWTs, told apart by
/// audience and optionally by key. Account state comes from a [`Directory`].
pub struct Crypto {
    session: Keys,
    identity: Keys,
    directory: Arc<dyn Directory>,
}

impl Crypto {
    pub fn new(session: &[u8], identity: &[u8], directory: Arc<dyn Directory>) -> Self {
        Self {
            session: Keys::new(session),
            identity: Keys::new(identity),
            directory,
        }
    }
    pub fn from_config(config: &Config, directory: Arc<dyn Directory>) -> Self {
        Self::new(
            config.session_secret.as_bytes(),
            config.identity_secret.as_bytes(),
            directory,
        )
    }

    /// Sign an identity token for an account, as the identity provider
    /// would after a successful password check.
    pub fn identity(&self, account: &Account) -> Result<IdentityToken, Fault> {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &Assertion::new(account, IDENTITY_TOKEN_DURATION),
            &self.identity.encoding,
        )
        .map(IdentityToken::from)
        .map_err(fault)
    }

    /// Create an account and hand back its first identity token.
    pub async fn provision(&self, email: &str) -> Result<(Account, IdentityToken), Fault> {
        let account = self.directory.create(email).await?;
        let token = self.identity(&account)?;
        log::info!("provisioned account {}", account.id());
        Ok((account, token))
    }

    fn seal(&self, claims: &Claims) -> Result<Credential, Fault> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.session.encoding)
            .map(Credential::from)
            .map_err(fault)
    }
    fn open(&self, credential: &Credential) -> Result<Claims, Fault> {
        jsonwebtoken::decode::<Claims>(
            credential.as_str(),
            &self.session.decoding,
            &validation(SESSION_AUDIENCE),
        )
        .map(|data| data.claims)
        .map_err(fault)
    }
    fn assertion(&self, token: &IdentityToken) -> Result<Assertion, Fault> {
        jsonwebtoken::decode::<Assertion>(
            token.as_str(),
            &self.identity.decoding,
            &validation(IDENTITY_AUDIENCE),
        )
        .map(|data| data.claims)
        .map_err(fault)
    }
    /// Load an account that exists and is not disabled.
    async fn enabled(&self, id: &ID<Account>) -> Result<Account, Fault> {
        match self.directory.account(id).await? {
            None => Err(Fault::UserNotFound),
            Some(account) if account.disabled() => Err(Fault::Disabled),
            Some(account) => Ok(account),
        }
    }
}

#[async_trait::async_trait]
impl Verifier for Crypto {
    async fn exchange(&self, token: &IdentityToken, ttl: std::time::Duration) -> Result<Credential, Fault> {
        let assertion = self.assertion(token)?;
        let account = self.enabled(&assertion.account()).await?;
        self.seal(&Claims::new(account.id().cast(), ttl))
    }

    async fn verify(&self, credential: &Credential, check_revoked: bool) -> Result<ID<Principal>, Fault> {
        let claims = self.open(credential)?;
        if check_revoked {
            let account = self.enabled(&claims.principal().cast()).await?;
            if account.revokes(claims.issued()) {
                return Err(Fault::Revoked);
            }
        }
        Ok(claims.principal())
    }

    async fn lookup(&self, email: &str) -> Result<Option<ID<Principal>>, Fault> {
        self.directory
            .by_email(email)
            .await
            .map(|account| account.map(|a| a.id().cast()))
    }

    async fn revoke(&self, principal: &ID<Principal>) -> Result<(), Fault> {
        self.directory
            .revoke(&principal.clone().cast(), vce_core::now_millis())
            .await
    }
}

fn validation(audience: &str) -> Validation {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.leeway = 0;
    validation.set_audience(&[audience]);
    validation
}

fn fault(error: jsonwebtoken::errors::Error) -> Fault {
    match error.kind() {
        ErrorKind::ExpiredSignature => Fault::Expired,
        ErrorKind::InvalidSignature => Fault::InvalidSignature,
        _ => Fault::Malformed,
    }
}
