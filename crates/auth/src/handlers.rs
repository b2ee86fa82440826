use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::http::StatusCode;
use actix_web::web;
use vce_core::ID;

pub async fn sign_up(sessions: web::Data<Sessions>, req: web::Json<SignUpRequest>) -> impl Responder {
    let SignUpRequest { uid, email, name } = req.into_inner();
    match sessions.register(ID::from(uid), email, name).await {
        Ok(Registration::Created) => HttpResponse::Created().json(Reply::success("User created successfully")),
        Ok(Registration::AlreadyExists) => HttpResponse::Conflict().json(Reply::failure("User already exists")),
        Err(e) => failure(e),
    }
}

pub async fn sign_in(
    http: HttpRequest,
    sessions: web::Data<Sessions>,
    req: web::Json<SignInRequest>,
) -> impl Responder {
    let ref mut jar = jar(&http);
    let token = IdentityToken::from(req.id_token.as_str());
    match sessions.sign_in(jar, &req.email, &token).await {
        Ok(()) => respond(HttpResponse::Ok(), jar).json(Reply::success("User signed in successfully")),
        Err(e) => failure(e),
    }
}

pub async fn sign_out(http: HttpRequest, sessions: web::Data<Sessions>) -> impl Responder {
    let ref mut jar = jar(&http);
    match sessions.sign_out(jar).await {
        Ok(()) => respond(HttpResponse::Ok(), jar).json(Reply::success("Signed out")),
        Err(e) => respond(HttpResponse::build(status(e)), jar).json(Reply::failure(e.to_string())),
    }
}

pub async fn me(caller: Caller) -> impl Responder {
    HttpResponse::Ok().json(caller.0)
}

/// Error reply with the status that fits the failure.
pub fn failure(error: SessionError) -> HttpResponse {
    HttpResponse::build(status(error)).json(Reply::failure(error.to_string()))
}

fn status(error: SessionError) -> StatusCode {
    match error {
        SessionError::ExchangeFailed => StatusCode::UNAUTHORIZED,
        SessionError::VerificationFailed => StatusCode::UNAUTHORIZED,
        SessionError::WrongPassword => StatusCode::UNAUTHORIZED,
        SessionError::UnknownAccount => StatusCode::NOT_FOUND,
        SessionError::EmailInUse => StatusCode::CONFLICT,
        SessionError::InvalidEmail => StatusCode::BAD_REQUEST,
        SessionError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}
