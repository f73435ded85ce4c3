use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::{AuthenticatedUser, IdentityVerifier};
use crate::error::AppError;

/// Extracts the verified caller identity.
///
/// Behind `AuthMiddleware` the identity is already in the request extensions.
/// On routes outside the middleware the extractor runs the verifier itself,
/// so a handler taking `AuthenticatedUser` is never reached anonymously.
impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(identity) = req.extensions().get::<AuthenticatedUser>().cloned() {
            return ready(Ok(identity));
        }

        let result = match req.app_data::<web::Data<IdentityVerifier>>() {
            Some(verifier) => verifier.resolve_header(
                req.headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok()),
            ),
            None => Err(AppError::Internal(
                "IdentityVerifier is not registered as app data".into(),
            )),
        };
        ready(result.map_err(ActixError::from))
    }
}
