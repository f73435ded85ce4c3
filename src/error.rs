//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` shared by the credential manager,
//! the identity verifier, the stores and the task service.
//!
//! `AppError` implements `actix_web::error::ResponseError` so every domain failure maps
//! to one fixed HTTP status at the boundary. Store-level failures are surfaced as an
//! opaque server error: the detail is logged, never sent to the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or out-of-range input, detected before any store access (HTTP 422).
    #[error("Validation Error: {0}")]
    Validation(String),
    /// Registration with an email that is already taken (HTTP 409).
    #[error("Email already registered")]
    DuplicateEmail,
    /// Login failure. Intentionally does not say whether the email or the password was wrong (HTTP 401).
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// No bearer token was presented (HTTP 401).
    #[error("Missing token")]
    MissingToken,
    /// The bearer token could not be parsed or its signature did not verify (HTTP 401).
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    /// The bearer token is well-formed but its expiry is in the past (HTTP 401).
    #[error("Expired token")]
    ExpiredToken,
    /// The resource does not exist or is not owned by the caller (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Error originating from the database (HTTP 500).
    #[error("Database Error: {0}")]
    Database(String),
    /// Any other unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for the three identity-resolution failures.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AppError::MissingToken | AppError::InvalidToken(_) | AppError::ExpiredToken
        )
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Token failures collapse into one generic body so callers cannot tell a
/// forged token from an expired one.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::InvalidToken(_)
            | AppError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::DuplicateEmail => "Email already registered".to_string(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::MissingToken | AppError::InvalidToken(_) | AppError::ExpiredToken => {
                log::debug!("Rejecting request: {}", self);
                "Unauthorized".to_string()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::Database(_) | AppError::Internal(_) => {
                log::error!("{}", self);
                "Internal server error".to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Converts `sqlx::Error` into `AppError::Database`.
///
/// Absence is handled by the stores through `fetch_optional`, so `RowNotFound`
/// reaching this point is an unexpected store failure as well.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::Database(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("Password hashing failed: {}", error))
    }
}
