//! Development stand-in for the client-side identity provider.
//!
//! Creates an account and returns its first identity token, which the
//! sign-up form then passes to `/auth/sign-up` and `/auth/sign-in`.
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use serde::Deserialize;
use serde::Serialize;
use vce_auth::Crypto;
use vce_auth::SessionError;
use vce_core::Unique;

#[derive(Deserialize)]
pub struct ProvisionRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize)]
pub struct Provisioned {
    pub uid: String,
    #[serde(rename = "idToken")]
    pub id_token: String,
}

pub async fn provision(crypto: web::Data<Crypto>, req: web::Json<ProvisionRequest>) -> impl Responder {
    match crypto.provision(&req.email).await {
        Ok((account, token)) => HttpResponse::Created().json(Provisioned {
            uid: account.id().into_inner(),
            id_token: token.as_str().to_owned(),
        }),
        Err(fault) => vce_auth::failure(SessionError::from(fault)),
    }
}
