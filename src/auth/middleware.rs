use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::IdentityVerifier;
use crate::error::AppError;

/// Resolves the bearer token on every request in the wrapped scope and
/// stores the resulting `AuthenticatedUser` in the request extensions.
///
/// Requests without a valid token never reach the handlers; they are
/// answered here with the `AppError` response. The verifier is taken from
/// app data (`web::Data<IdentityVerifier>`).
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let resolved = match req.app_data::<web::Data<IdentityVerifier>>() {
            Some(verifier) => verifier.resolve_header(
                req.headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok()),
            ),
            None => Err(AppError::Internal(
                "IdentityVerifier is not registered as app data".into(),
            )),
        };

        match resolved {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(app_err) => {
                let response = req.error_response(app_err).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}
