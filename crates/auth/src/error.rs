use thiserror::Error;

/// Faults an identity verifier or account directory can report.
/// Provider vocabulary; translated into [`SessionError`] at the issuer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("session revoked")]
    Revoked,
    #[error("account disabled")]
    Disabled,
    #[error("user not found")]
    UserNotFound,
    #[error("email already in use")]
    EmailInUse,
    #[error("invalid email")]
    InvalidEmail,
    #[error("wrong password")]
    WrongPassword,
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Principal store failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("principal store unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported to callers of issuer operations. Messages are safe to
/// show to the person signing in; detail goes to the log.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Sign in failed")]
    ExchangeFailed,
    #[error("Session is not valid")]
    VerificationFailed,
    #[error("Service unavailable, please try again")]
    ServiceUnavailable,
    #[error("User not found")]
    UnknownAccount,
    #[error("Email already in use")]
    EmailInUse,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Wrong password")]
    WrongPassword,
}

/// Startup configuration problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),
    #[error("invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

impl From<tokio::time::error::Elapsed> for Fault {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Unavailable("timed out".to_owned())
    }
}

impl From<tokio::time::error::Elapsed> for StoreError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Unavailable("timed out".to_owned())
    }
}

impl From<Fault> for SessionError {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Malformed | Fault::Expired | Fault::InvalidSignature => Self::ExchangeFailed,
            Fault::Revoked | Fault::Disabled => Self::ExchangeFailed,
            Fault::UserNotFound => Self::UnknownAccount,
            Fault::EmailInUse => Self::EmailInUse,
            Fault::InvalidEmail => Self::InvalidEmail,
            Fault::WrongPassword => Self::WrongPassword,
            Fault::Unavailable(_) => Self::ServiceUnavailable,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(_: StoreError) -> Self {
        Self::ServiceUnavailable
    }
}
