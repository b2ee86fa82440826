use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::cookie::CookieJar;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;

/// Snapshot the request's cookies into a jar the session service can read
/// and write. Unparseable cookie headers read as no cookies.
pub fn jar(req: &HttpRequest) -> CookieJar {
    let mut jar = CookieJar::new();
    if let Ok(cookies) = req.cookies() {
        for cookie in cookies.iter() {
            jar.add_original(cookie.clone());
        }
    }
    jar
}

/// Copy the cookies a session operation produced onto the response.
pub fn respond(mut builder: actix_web::HttpResponseBuilder, jar: &CookieJar) -> actix_web::HttpResponseBuilder {
    for cookie in jar.delta() {
        builder.cookie(cookie.clone());
    }
    builder
}

/// Extractor for signed-in callers. Rejects with 401 otherwise.
pub struct Caller(pub ResolvedUser);

impl Caller {
    pub fn user(&self) -> &ResolvedUser {
        &self.0
    }
}

impl FromRequest for Caller {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let sessions = req.app_data::<web::Data<Sessions>>().cloned();
        let jar = jar(req);
        Box::pin(async move {
            let sessions = sessions.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("sessions not configured")
            })?;
            sessions
                .current(&jar)
                .await
                .map(Caller)
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("not signed in"))
        })
    }
}

/// Optional caller extractor - never fails.
pub struct MaybeCaller(pub Option<ResolvedUser>);

impl MaybeCaller {
    pub fn user(&self) -> Option<&ResolvedUser> {
        self.0.as_ref()
    }
}

impl FromRequest for MaybeCaller {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let caller = Caller::from_request(req, payload);
        Box::pin(async move {
            match caller.await {
                Ok(Caller(user)) => Ok(MaybeCaller(Some(user))),
                Err(_) => Ok(MaybeCaller(None)),
            }
        })
    }
}
