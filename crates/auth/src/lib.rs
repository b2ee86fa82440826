//! Session authentication and identity resolution.
//!
//! A short-lived identity token, proven upstream, is exchanged once for a
//! signed week-long session credential carried in a single HTTP-only cookie.
//! Every later request resolves that cookie back to a user profile, or to
//! nobody. There is no server-side session table.
//!
//! ## Identity Types
//!
//! - [`Principal`] — Durable profile record (id, email, name)
//! - [`ResolvedUser`] — The normalized view handed to callers
//! - [`Account`] — Identity-provider account state (enabled, revocation)
//! - [`IdentityToken`] / [`Credential`] — The two opaque token kinds
//!
//! ## Collaborators
//!
//! - [`Verifier`] — Mints and verifies session credentials
//! - [`PrincipalStore`] — Profile persistence
//! - [`Directory`] — Account registry consulted by the verifier
//! - [`Crypto`] — JWT-backed [`Verifier`]
//! - [`Memory`] — In-process [`PrincipalStore`] and [`Directory`]
//!
//! ## Sessions
//!
//! - [`Sessions`] — Issuer, resolver, and access gate
//! - [`Policy`] — Session cookie attributes
//! - [`SessionError`] — Issuer-facing failure taxonomy
mod account;
mod claims;
mod config;
mod crypto;
mod directory;
mod dto;
mod error;
mod memory;
mod policy;
mod principal;
mod sessions;
mod store;
mod token;
mod verifier;

pub use account::*;
pub use claims::*;
pub use config::*;
pub use crypto::*;
pub use directory::*;
pub use dto::*;
pub use error::*;
pub use memory::*;
pub use policy::*;
pub use principal::*;
pub use sessions::*;
pub use store::*;
pub use token::*;
pub use verifier::*;

#[cfg(feature = "database")]
mod repository;
#[cfg(feature = "database")]
pub use repository::*;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;
