use super::*;
use actix_web::cookie::CookieJar;
use std::future::Future;
use std::sync::Arc;
use vce_core::ID;

/// Session issuer, resolver, and access gate.
///
/// Holds no per-request state. The request's cookie jar is passed in
/// explicitly; cookies to send back are added to that same jar and read
/// off its delta by the caller.
pub struct Sessions {
    verifier: Arc<dyn Verifier>,
    store: Arc<dyn PrincipalStore>,
    policy: Policy,
    deadline: std::time::Duration,
}

impl Sessions {
    pub fn new(verifier: Arc<dyn Verifier>, store: Arc<dyn PrincipalStore>, policy: Policy) -> Self {
        Self {
            verifier,
            store,
            policy,
            deadline: vce_core::UPSTREAM_TIMEOUT,
        }
    }
    /// Bound every outbound call by `deadline`.
    pub fn deadline(mut self, deadline: std::time::Duration) -> Self {
        self.deadline = deadline;
        self
    }
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Exchange an identity token for a week-long session credential and
    /// set it as the session cookie. On failure the jar is left untouched.
    pub async fn establish(&self, jar: &mut CookieJar, token: &IdentityToken) -> Result<(), SessionError> {
        let credential = self
            .bounded(self.verifier.exchange(token, vce_core::SESSION_TTL))
            .await
            .inspect_err(|e| log::warn!("session exchange failed: {}", e))?;
        jar.add(self.policy.cookie(credential));
        Ok(())
    }

    /// Sign in an existing account: check it is known, then establish.
    pub async fn sign_in(&self, jar: &mut CookieJar, email: &str, token: &IdentityToken) -> Result<(), SessionError> {
        match self
            .bounded(self.verifier.lookup(email))
            .await
            .inspect_err(|e| log::warn!("account lookup failed: {}", e))?
        {
            Some(principal) => {
                self.establish(jar, token).await?;
                log::info!("signed in {}", principal);
                Ok(())
            }
            None => {
                log::debug!("sign in for unknown email");
                Err(SessionError::UnknownAccount)
            }
        }
    }

    /// Revoke the caller's outstanding credentials and drop the cookie.
    /// The removal cookie is set even when revocation fails.
    pub async fn sign_out(&self, jar: &mut CookieJar) -> Result<(), SessionError> {
        let revoked = match Policy::read(jar) {
            None => Ok(()),
            Some(credential) => match self.bounded(self.verifier.verify(&credential, false)).await {
                Ok(principal) => self
                    .bounded(self.verifier.revoke(&principal))
                    .await
                    .inspect(|_| log::info!("signed out {}", principal))
                    .inspect_err(|e| log::warn!("revocation failed: {}", e))
                    .map_err(SessionError::from),
                Err(Fault::Unavailable(e)) => {
                    log::warn!("sign out could not verify session: {}", e);
                    Err(SessionError::ServiceUnavailable)
                }
                Err(fault) => {
                    log::debug!("sign out with unusable session: {}", fault);
                    Ok(())
                }
            },
        };
        jar.add(self.policy.removal());
        revoked
    }

    /// Create the profile for a freshly provisioned account, unless one
    /// already exists under that id.
    pub async fn register(&self, id: ID<Principal>, email: String, name: String) -> Result<Registration, SessionError> {
        if self
            .bounded(self.store.exists(&id))
            .await
            .inspect_err(|e| log::warn!("registration lookup failed: {}", e))?
        {
            log::info!("principal {} already registered", id);
            return Ok(Registration::AlreadyExists);
        }
        let principal = Principal::new(id, email, name);
        self.bounded(self.store.insert(&principal))
            .await
            .inspect_err(|e| log::warn!("registration insert failed: {}", e))?;
        log::info!("registered principal {}", vce_core::Unique::id(&principal));
        Ok(Registration::Created)
    }

    /// Who is calling, if anyone. Every failure collapses to `None`.
    pub async fn current(&self, jar: &CookieJar) -> Option<ResolvedUser> {
        let credential = Policy::read(jar)?;
        let principal = match self.bounded(self.verifier.verify(&credential, true)).await {
            Ok(principal) => principal,
            Err(Fault::Unavailable(e)) => {
                log::warn!("session verification unavailable: {}", e);
                return None;
            }
            Err(fault) => {
                log::debug!("session rejected: {}", fault);
                return None;
            }
        };
        match self.bounded(self.store.get(&principal)).await {
            Ok(Some(profile)) => Some(ResolvedUser::from(profile)),
            Ok(None) => {
                log::warn!("verified principal {} has no profile", principal);
                None
            }
            Err(e) => {
                log::warn!("profile load failed for {}: {}", principal, e);
                None
            }
        }
    }

    /// Access gate for page guards.
    pub async fn authenticated(&self, jar: &CookieJar) -> bool {
        self.current(jar).await.is_some()
    }

    async fn bounded<F, T, E>(&self, call: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<tokio::time::error::Elapsed>,
    {
        tokio::time::timeout(self.deadline, call).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::cookie::SameSite;
    use vce_core::Unique;

    const SECRET: &[u8] = b"session-secret";

    struct Fixture {
        memory: Arc<Memory>,
        crypto: Arc<Crypto>,
        sessions: Sessions,
    }

    fn fixture(environment: Environment) -> Fixture {
        let memory = Arc::new(Memory::default());
        let crypto = Arc::new(Crypto::new(SECRET, SECRET, memory.clone()));
        let sessions = Sessions::new(crypto.clone(), memory.clone(), Policy::new(environment));
        Fixture {
            memory,
            crypto,
            sessions,
        }
    }

    /// Provision an account plus profile; returns the account and a token.
    async fn member(f: &Fixture, email: &str, name: &str) -> (Account, IdentityToken) {
        let (account, token) = f.crypto.provision(email).await.unwrap();
        let created = f
            .sessions
            .register(account.id().cast(), email.to_owned(), name.to_owned())
            .await
            .unwrap();
        assert!(created == Registration::Created);
        (account, token)
    }

    /// Carry the response cookies into the next request's jar.
    fn next_request(response: &CookieJar) -> CookieJar {
        let mut jar = CookieJar::new();
        for cookie in response.delta() {
            jar.add_original(cookie.clone());
        }
        jar
    }

    fn jar_with(value: &str) -> CookieJar {
        let mut jar = CookieJar::new();
        jar.add_original(Cookie::new("session", value.to_owned()));
        jar
    }

    /// Verifier and store that never answer.
    struct Stall;

    #[async_trait::async_trait]
    impl Verifier for Stall {
        async fn exchange(&self, _: &IdentityToken, _: std::time::Duration) -> Result<Credential, Fault> {
            std::future::pending().await
        }
        async fn verify(&self, _: &Credential, _: bool) -> Result<ID<Principal>, Fault> {
            std::future::pending().await
        }
        async fn lookup(&self, _: &str) -> Result<Option<ID<Principal>>, Fault> {
            std::future::pending().await
        }
        async fn revoke(&self, _: &ID<Principal>) -> Result<(), Fault> {
            std::future::pending().await
        }
    }

    #[async_trait::async_trait]
    impl PrincipalStore for Stall {
        async fn get(&self, _: &ID<Principal>) -> Result<Option<Principal>, StoreError> {
            std::future::pending().await
        }
        async fn exists(&self, _: &ID<Principal>) -> Result<bool, StoreError> {
            std::future::pending().await
        }
        async fn insert(&self, _: &Principal) -> Result<(), StoreError> {
            std::future::pending().await
        }
    }

    /// Store that is unreachable.
    struct Down;

    #[async_trait::async_trait]
    impl PrincipalStore for Down {
        async fn get(&self, _: &ID<Principal>) -> Result<Option<Principal>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn exists(&self, _: &ID<Principal>) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn insert(&self, _: &Principal) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    fn stalled() -> Sessions {
        Sessions::new(
            Arc::new(Stall),
            Arc::new(Stall),
            Policy::new(Environment::Development),
        )
        .deadline(std::time::Duration::from_millis(20))
    }

    #[tokio::test]
    async fn new_account_round_trip() {
        let f = fixture(Environment::Development);
        let (account, token) = member(&f, "ann@x.com", "Ann").await;
        let ref mut response = CookieJar::new();
        f.sessions.establish(response, &token).await.unwrap();
        let request = next_request(response);
        let user = f.sessions.current(&request).await.unwrap();
        assert!(user.id == account.id().cast());
        assert!(user.email == "ann@x.com");
        assert!(user.name == "Ann");
        assert!(f.sessions.authenticated(&request).await);
    }

    #[tokio::test]
    async fn established_cookie_attributes() {
        for environment in [Environment::Production, Environment::Development] {
            let f = fixture(environment);
            let (_, token) = member(&f, "ann@x.com", "Ann").await;
            let ref mut jar = CookieJar::new();
            f.sessions.establish(jar, &token).await.unwrap();
            let cookies = jar.delta().collect::<Vec<_>>();
            assert!(cookies.len() == 1);
            let cookie = cookies[0];
            assert!(cookie.name() == "session");
            assert!(cookie.http_only() == Some(true));
            assert!(cookie.same_site() == Some(SameSite::Lax));
            assert!(cookie.path() == Some("/"));
            assert!(cookie.max_age() == Some(actix_web::cookie::time::Duration::seconds(604800)));
            assert!(cookie.secure() == Some(environment == Environment::Production));
        }
    }

    #[tokio::test]
    async fn expired_identity_token_sets_nothing() {
        let f = fixture(Environment::Development);
        let (account, _) = member(&f, "ann@x.com", "Ann").await;
        let mut assertion = Assertion::new(&account, std::time::Duration::from_secs(60));
        assertion.iat -= 3600;
        assertion.exp = vce_core::now() - 60;
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &assertion,
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        let ref mut jar = CookieJar::new();
        let result = f.sessions.establish(jar, &IdentityToken::from(token)).await;
        assert!(result == Err(SessionError::ExchangeFailed));
        assert!(jar.delta().count() == 0);
        assert!(f.sessions.current(&next_request(jar)).await.is_none());
    }

    #[tokio::test]
    async fn garbage_identity_token_fails_exchange() {
        let f = fixture(Environment::Development);
        let ref mut jar = CookieJar::new();
        let result = f.sessions.establish(jar, &IdentityToken::from("not-a-jwt")).await;
        assert!(result == Err(SessionError::ExchangeFailed));
        assert!(jar.delta().count() == 0);
    }

    #[tokio::test]
    async fn bad_cookies_resolve_to_nobody() {
        let f = fixture(Environment::Development);
        let (account, token) = member(&f, "ann@x.com", "Ann").await;
        let ref mut jar = CookieJar::new();
        f.sessions.establish(jar, &token).await.unwrap();
        let good = Policy::read(jar).unwrap();
        let tampered = {
            let mut bytes = String::from(good.clone()).into_bytes();
            let last = bytes.len() - 2;
            bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
            String::from_utf8(bytes).unwrap()
        };
        let expired = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &Claims {
                sub: account.id().into_inner(),
                aud: SESSION_AUDIENCE.to_owned(),
                iat: vce_core::now() - 700000,
                exp: vce_core::now() - 100,
                ims: (vce_core::now() - 700000) * 1000,
            },
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert!(f.sessions.current(&CookieJar::new()).await.is_none());
        for value in ["", "garbage", "a.b.c", tampered.as_str(), expired.as_str()] {
            let jar = jar_with(value);
            assert!(f.sessions.current(&jar).await.is_none());
            assert!(!f.sessions.authenticated(&jar).await);
        }
    }

    #[tokio::test]
    async fn verified_session_without_profile_is_nobody() {
        let f = fixture(Environment::Development);
        let (_, token) = f.crypto.provision("ghost@x.com").await.unwrap();
        let ref mut jar = CookieJar::new();
        f.sessions.establish(jar, &token).await.unwrap();
        assert!(f.sessions.current(&next_request(jar)).await.is_none());
    }

    #[tokio::test]
    async fn disabled_account_is_nobody() {
        let f = fixture(Environment::Development);
        let (account, token) = member(&f, "ann@x.com", "Ann").await;
        let ref mut jar = CookieJar::new();
        f.sessions.establish(jar, &token).await.unwrap();
        let request = next_request(jar);
        assert!(f.sessions.authenticated(&request).await);
        f.memory.disable(&account.id()).await.unwrap();
        assert!(f.sessions.current(&request).await.is_none());
    }

    #[tokio::test]
    async fn registration_is_idempotent() {
        let f = fixture(Environment::Development);
        let id = ID::<Principal>::from("u1");
        let first = f.sessions.register(id.clone(), "a@x.com".into(), "Ann".into()).await;
        let second = f.sessions.register(id.clone(), "a@x.com".into(), "Ann".into()).await;
        assert!(first == Ok(Registration::Created));
        assert!(second == Ok(Registration::AlreadyExists));
        let stored = f.memory.get(&id).await.unwrap().unwrap();
        assert!(stored == Principal::new(id, "a@x.com".into(), "Ann".into()));
    }

    #[tokio::test]
    async fn second_registration_does_not_touch_storage() {
        let f = fixture(Environment::Development);
        let id = ID::<Principal>::from("u1");
        f.sessions.register(id.clone(), "a@x.com".into(), "Ann".into()).await.unwrap();
        f.sessions.register(id.clone(), "b@x.com".into(), "Bob".into()).await.unwrap();
        let stored = f.memory.get(&id).await.unwrap().unwrap();
        assert!(stored.email() == "a@x.com");
        assert!(stored.name() == "Ann");
    }

    #[tokio::test]
    async fn sign_in_requires_known_email() {
        let f = fixture(Environment::Development);
        let (_, token) = member(&f, "ann@x.com", "Ann").await;
        let ref mut jar = CookieJar::new();
        let result = f.sessions.sign_in(jar, "bob@x.com", &token).await;
        assert!(result == Err(SessionError::UnknownAccount));
        assert!(jar.delta().count() == 0);
        f.sessions.sign_in(jar, "ann@x.com", &token).await.unwrap();
        assert!(f.sessions.authenticated(&next_request(jar)).await);
    }

    #[tokio::test]
    async fn sign_out_revokes_and_clears() {
        let f = fixture(Environment::Development);
        let (_, token) = member(&f, "ann@x.com", "Ann").await;
        let ref mut jar = CookieJar::new();
        f.sessions.establish(jar, &token).await.unwrap();
        let stolen = next_request(jar);
        let ref mut leaving = next_request(jar);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        f.sessions.sign_out(leaving).await.unwrap();
        let removal = leaving.delta().next().unwrap();
        assert!(removal.name() == "session");
        assert!(removal.value().is_empty());
        assert!(f.sessions.current(&stolen).await.is_none());
    }

    #[tokio::test]
    async fn sign_in_right_after_sign_out_resolves() {
        let f = fixture(Environment::Development);
        let (_, token) = member(&f, "ann@x.com", "Ann").await;
        let ref mut jar = CookieJar::new();
        f.sessions.establish(jar, &token).await.unwrap();
        let stolen = next_request(jar);
        let ref mut leaving = next_request(jar);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        f.sessions.sign_out(leaving).await.unwrap();
        let ref mut again = CookieJar::new();
        f.sessions.establish(again, &token).await.unwrap();
        let user = f.sessions.current(&next_request(again)).await.unwrap();
        assert!(user.email == "ann@x.com");
        assert!(f.sessions.current(&stolen).await.is_none());
    }

    #[tokio::test]
    async fn sign_out_without_session_still_clears() {
        let f = fixture(Environment::Development);
        let ref mut jar = jar_with("garbage");
        assert!(f.sessions.sign_out(jar).await.is_ok());
        assert!(jar.delta().count() == 1);
    }

    #[tokio::test]
    async fn hung_verifier_fails_closed() {
        let sessions = stalled();
        let jar = jar_with("anything");
        assert!(sessions.current(&jar).await.is_none());
        assert!(!sessions.authenticated(&jar).await);
    }

    #[tokio::test]
    async fn hung_verifier_is_unavailable_to_issuer() {
        let sessions = stalled();
        let ref mut jar = CookieJar::new();
        let result = sessions.establish(jar, &IdentityToken::from("t")).await;
        assert!(result == Err(SessionError::ServiceUnavailable));
        assert!(jar.delta().count() == 0);
        let result = sessions.register(ID::from("u1"), "a@x.com".into(), "Ann".into()).await;
        assert!(result == Err(SessionError::ServiceUnavailable));
    }

    #[tokio::test]
    async fn hung_verifier_still_clears_on_sign_out() {
        let sessions = stalled();
        let ref mut jar = jar_with("anything");
        assert!(sessions.sign_out(jar).await == Err(SessionError::ServiceUnavailable));
        assert!(jar.delta().count() == 1);
    }

    #[tokio::test]
    async fn unreachable_store() {
        let memory = Arc::new(Memory::default());
        let crypto = Arc::new(Crypto::new(SECRET, SECRET, memory.clone()));
        let sessions = Sessions::new(crypto.clone(), Arc::new(Down), Policy::new(Environment::Development));
        let (_, token) = crypto.provision("ann@x.com").await.unwrap();
        let ref mut jar = CookieJar::new();
        sessions.establish(jar, &token).await.unwrap();
        assert!(sessions.current(&next_request(jar)).await.is_none());
        let result = sessions.register(ID::from("u1"), "a@x.com".into(), "Ann".into()).await;
        assert!(result == Err(SessionError::ServiceUnavailable));
    }
}
