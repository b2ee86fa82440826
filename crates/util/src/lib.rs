//! Core identifiers, constants, and runtime helpers for voicee.
//!
//! This crate provides the foundational types and session parameters
//! shared by the authentication and server crates.

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Opaque identifier with compile-time tagging of the entity it names.
///
/// Identifiers are minted by the identity provider and are not required to
/// be UUIDs, so the representation is an owned string. `Default` mints a
/// fresh time-ordered UUID for collaborators that assign ids locally.
pub struct ID<T> {
    inner: String,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn as_str(&self) -> &str {
        &self.inner
    }
    pub fn into_inner(self) -> String {
        self.inner
    }
    /// Retag ID<T> as ID<U> while preserving the underlying value.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<String> for ID<T> {
    fn from(inner: String) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}
impl<T> From<&str> for ID<T> {
    fn from(inner: &str) -> Self {
        Self::from(inner.to_owned())
    }
}
impl<T> From<ID<T>> for String {
    fn from(id: ID<T>) -> Self {
        id.inner
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7().simple().to_string())
    }
}

impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        Self::from(self.inner.clone())
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.inner)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// SESSION PARAMETERS
// Fixed cookie policy. None of these are configurable per request.
// ============================================================================
/// Name of the single cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "session";
/// Path scope of the session cookie.
pub const SESSION_PATH: &str = "/";
/// Session credential lifetime: one week.
pub const SESSION_TTL: std::time::Duration = std::time::Duration::from_secs(60 * 60 * 24 * 7);
/// Default bound on any single identity-verifier or principal-store call.
pub const UPSTREAM_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
/// Where page guards send unauthenticated callers.
pub const SIGN_IN_PATH: &str = "/sign-in";

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Seconds since the unix epoch.
pub fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Milliseconds since the unix epoch.
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", now())).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}
