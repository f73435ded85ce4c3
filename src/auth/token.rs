use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's identifier.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// The caller identity resolved from a verified bearer token.
///
/// Only [`IdentityVerifier`] can construct one, so holding an
/// `AuthenticatedUser` proves the token checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: String,
}

impl AuthenticatedUser {
    pub(crate) fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Signs identity tokens for freshly registered or logged-in users.
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours))
    }

    /// Generates an HS256 JWT for `user_id`, expiring after the configured TTL.
    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }
}

/// Validates inbound bearer tokens and resolves them to a user identifier.
///
/// Verification is a local signature and expiry check; it never calls out.
pub struct IdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No grace period: a token whose `exp` has passed is rejected outright.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret)
    }

    /// Verifies `token` and returns the identity it is bound to.
    ///
    /// Fails closed: any parse error, bad signature, past expiry or empty
    /// subject is a rejection.
    pub fn resolve(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidToken(e.to_string()),
            }
        })?;

        // jsonwebtoken still accepts `exp == now`; that second counts as expired.
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AppError::ExpiredToken);
        }
        if data.claims.sub.trim().is_empty() {
            return Err(AppError::InvalidToken("empty subject".into()));
        }
        Ok(AuthenticatedUser::new(data.claims.sub))
    }

    /// Resolves the value of an `Authorization` header.
    /// A missing header or a non-Bearer scheme is a `MissingToken`.
    pub fn resolve_header(&self, header: Option<&str>) -> Result<AuthenticatedUser, AppError> {
        let token = header
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::MissingToken)?;
        self.resolve(token)
    }
}
