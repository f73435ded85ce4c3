use crate::{
    auth::{AuthenticatedUser, CredentialManager},
    error::AppError,
    models::{LoginRequest, RegisterRequest},
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new account and returns `{user, token}` with `201 Created`.
/// `409 Conflict` when the email is taken, `422` for invalid input.
#[post("/register")]
pub async fn register(
    credentials: web::Data<CredentialManager>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let response = credentials.register(register_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// Authenticates a user and returns `{user, token}`. Any mismatch is a
/// generic `401`.
#[post("/login")]
pub async fn login(
    credentials: web::Data<CredentialManager>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let response = credentials.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Current user
///
/// Returns the profile bound to the bearer token.
#[get("/me")]
pub async fn me(
    credentials: web::Data<CredentialManager>,
    identity: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = credentials.current_user(&identity).await?;
    Ok(HttpResponse::Ok().json(user))
}
