//! Page guards.
//!
//! Pages behind the interview layout ask the access gate first and send
//! anyone it does not recognise to the sign-in page.
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::http::header;
use actix_web::web;
use vce_auth::Sessions;

pub async fn index(http: HttpRequest, sessions: web::Data<Sessions>) -> impl Responder {
    if !sessions.authenticated(&vce_auth::jar(&http)).await {
        return HttpResponse::SeeOther()
            .insert_header((header::LOCATION, vce_core::SIGN_IN_PATH))
            .finish();
    }
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Practice Job Interview with AI")
}
