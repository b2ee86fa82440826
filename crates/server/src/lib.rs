//! Voicee Backend Server
//!
//! Serves session authentication over actix-web: sign-up, sign-in,
//! sign-out, the current-user endpoint, and the page guard in front of
//! the interview pages.
//!
//! ## Submodules
//!
//! - [`identity`] — Development stand-in for the client-side identity provider
//! - [`pages`] — Page guards built on the access gate

pub mod identity;
pub mod pages;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use vce_auth::Config;
use vce_auth::Crypto;
use vce_auth::Directory;
use vce_auth::Environment;
use vce_auth::Memory;
use vce_auth::PrincipalStore;
use vce_auth::Sessions;

async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

/// Route table. The identity stand-in is only mounted outside production.
#[rustfmt::skip]
pub fn routes(cfg: &mut web::ServiceConfig, environment: Environment) {
    cfg.route("/health", web::get().to(health))
        .route("/", web::get().to(pages::index))
        .service(
            web::scope("/auth")
                .route("/sign-up", web::post().to(vce_auth::sign_up))
                .route("/sign-in", web::post().to(vce_auth::sign_in))
                .route("/sign-out", web::post().to(vce_auth::sign_out))
                .route("/me", web::get().to(vce_auth::me)),
        );
    if environment == Environment::Development {
        cfg.route("/identity/accounts", web::post().to(identity::provision));
    }
}

/// Postgres collaborators when `DB_URL` is set, in-memory ones otherwise.
async fn collaborators() -> anyhow::Result<(Arc<dyn Directory>, Arc<dyn PrincipalStore>)> {
    match std::env::var("DB_URL") {
        Ok(url) => {
            let client = vce_database::db(&url).await;
            vce_auth::migrate(&client).await?;
            let directory: Arc<dyn Directory> = Arc::new(client.clone());
            let store: Arc<dyn PrincipalStore> = Arc::new(client);
            Ok((directory, store))
        }
        Err(_) => {
            log::warn!("DB_URL not set, keeping accounts and profiles in memory");
            let memory = Arc::new(Memory::default());
            let directory: Arc<dyn Directory> = memory.clone();
            let store: Arc<dyn PrincipalStore> = memory;
            Ok((directory, store))
        }
    }
}

fn cors() -> Cors {
    match std::env::var("CORS_ORIGIN") {
        Ok(origin) => Cors::default()
            .allowed_origin(&origin)
            .supports_credentials()
            .allow_any_method()
            .allow_any_header(),
        Err(_) => Cors::default(),
    }
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let bind = std::env::var("BIND_ADDR").map_err(|_| anyhow::anyhow!("BIND_ADDR must be set"))?;
    let (directory, store) = collaborators().await?;
    let crypto = Arc::new(Crypto::from_config(&config, directory));
    let sessions = Sessions::new(crypto.clone(), store, config.policy()).deadline(config.timeout);
    let sessions = web::Data::new(sessions);
    let crypto = web::Data::from(crypto);
    let environment = config.environment;
    log::info!("starting server on {}", bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(cors())
            .app_data(sessions.clone())
            .app_data(crypto.clone())
            .configure(|cfg| routes(cfg, environment))
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
