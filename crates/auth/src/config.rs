use super::*;

/// Session settings read from the process environment.
///
/// - `APP_ENV` — `production` enables `Secure` cookies
/// - `JWT_SECRET` — session credential signing secret (required in production)
/// - `IDENTITY_SECRET` — identity token secret, defaults to `JWT_SECRET`
/// - `UPSTREAM_TIMEOUT_MS` — bound on each verifier or store call
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub session_secret: String,
    pub identity_secret: String,
    pub timeout: std::time::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .map(|value| Environment::parse(&value))
            .unwrap_or(Environment::Development);
        let session_secret = match (lookup("JWT_SECRET"), environment) {
            (Some(secret), _) if !secret.is_empty() => secret,
            (_, Environment::Production) => return Err(ConfigError::Missing("JWT_SECRET")),
            (_, Environment::Development) => {
                log::warn!("JWT_SECRET not set, signing sessions with an empty secret");
                String::default()
            }
        };
        let identity_secret = lookup("IDENTITY_SECRET")
            .filter(|secret| !secret.is_empty())
            .unwrap_or_else(|| session_secret.clone());
        let timeout = match lookup("UPSTREAM_TIMEOUT_MS") {
            None => vce_core::UPSTREAM_TIMEOUT,
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(std::time::Duration::from_millis)
                .ok_or(ConfigError::Invalid {
                    key: "UPSTREAM_TIMEOUT_MS",
                    value,
                })?,
        };
        log::info!("session environment: {:?}", environment);
        Ok(Self {
            environment,
            session_secret,
            identity_secret,
            timeout,
        })
    }
    pub fn policy(&self) -> Policy {
        Policy::new(self.environment)
    }
}
