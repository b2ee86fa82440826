use super::*;
use actix_web::cookie::Cookie;
use actix_web::cookie::CookieJar;
use actix_web::cookie::SameSite;
use vce_core::SESSION_COOKIE;
use vce_core::SESSION_PATH;
use vce_core::SESSION_TTL;

/// Max-Age of the session cookie, in seconds.
pub const MAX_AGE: i64 = SESSION_TTL.as_secs() as i64;

/// Deployment environment. Only production gets `Secure` cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Attributes of the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    environment: Environment,
}

impl Policy {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }
    pub fn secure(&self) -> bool {
        self.environment == Environment::Production
    }
    /// The cookie that carries a freshly minted credential.
    pub fn cookie(&self, credential: Credential) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, String::from(credential));
        self.stamp(&mut cookie);
        cookie.set_max_age(actix_web::cookie::time::Duration::seconds(MAX_AGE));
        cookie
    }
    /// An expired cookie that makes the browser drop the session.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, "");
        self.stamp(&mut cookie);
        cookie.make_removal();
        cookie
    }
    /// The credential carried by an incoming request, if any.
    pub fn read(jar: &CookieJar) -> Option<Credential> {
        jar.get(SESSION_COOKIE)
            .map(|cookie| cookie.value())
            .filter(|value| !value.is_empty())
            .map(Credential::from)
    }
    fn stamp(&self, cookie: &mut Cookie<'static>) {
        cookie.set_http_only(true);
        cookie.set_path(SESSION_PATH);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_secure(self.secure());
    }
}
