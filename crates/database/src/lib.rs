//! PostgreSQL connectivity for the identity tables.
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes a database connection from `DB_URL`
//!
//! ## Schema
//!
//! - [`Schema`] — Table metadata and DDL generation
//!
//! ## Table Names
//!
//! Constants for the two persistent entities: user profiles and
//! identity-provider accounts.
mod traits;

pub use traits::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// Establishes a database connection.
///
/// Connects to PostgreSQL using the given URL (normally `DB_URL`).
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
///
/// # Panics
///
/// Panics if the connection fails.
pub async fn db(url: &str) -> Arc<Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    Arc::new(client)
}

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for user profiles (the principal store).
#[rustfmt::skip]
pub const USERS:    &str = "users";
/// Table for identity-provider accounts (enabled flag, revocation marker).
#[rustfmt::skip]
pub const ACCOUNTS: &str = "accounts";
