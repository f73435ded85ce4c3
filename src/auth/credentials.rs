use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{AuthenticatedUser, TokenIssuer};
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse};
use crate::store::UserStore;

/// Registers users, checks login attempts and issues identity tokens.
///
/// Never touches tasks.
pub struct CredentialManager {
    users: Arc<dyn UserStore>,
    issuer: TokenIssuer,
    bcrypt_cost: u32,
    /// Hash verified against when the email is unknown, so both login
    /// failure paths cost one bcrypt verification.
    dummy_hash: String,
}

impl CredentialManager {
    pub fn new(
        users: Arc<dyn UserStore>,
        issuer: TokenIssuer,
        bcrypt_cost: u32,
    ) -> Result<Self, AppError> {
        let dummy_hash = hash_password("timing-equaliser-not-a-password", bcrypt_cost)?;
        Ok(Self {
            users,
            issuer,
            bcrypt_cost,
            dummy_hash,
        })
    }

    /// Creates a new account and returns it together with a fresh token.
    ///
    /// Validation runs before any store access. Fails with `DuplicateEmail`
    /// when the email (compared case-insensitively) is already registered.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;
        let email = normalize_email(&request.email);

        if self.users.find_by_email(&email).await?.is_some() {
            log::info!("Registration rejected: email already registered");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = hash_password(&request.password, self.bcrypt_cost)?;
        let user = self
            .users
            .insert(&User {
                id: Uuid::new_v4(),
                email,
                password_hash,
                name: request.name,
                created_at: Utc::now(),
            })
            .await?;

        let token = self.issuer.issue(&user.id.to_string())?;
        log::info!("Registered user {}", user.id);
        Ok(AuthResponse {
            user: UserResponse::from(&user),
            token,
        })
    }

    /// Checks an email/password pair and issues a token on success.
    ///
    /// An unknown email and a wrong password produce the same
    /// `InvalidCredentials` error. Writes nothing.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                let _ = verify_password(&request.password, &self.dummy_hash);
                log::debug!("Login failed: unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify_password(&request.password, &user.password_hash)? {
            log::debug!("Login failed: wrong password for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issuer.issue(&user.id.to_string())?;
        log::info!("User {} logged in", user.id);
        Ok(AuthResponse {
            user: UserResponse::from(&user),
            token,
        })
    }

    /// Returns the profile of the caller.
    ///
    /// `NotFound` when the identity has no local account, e.g. a token from an
    /// external provider whose subject is not one of our user ids.
    pub async fn current_user(&self, identity: &AuthenticatedUser) -> Result<UserResponse, AppError> {
        let not_found = || AppError::NotFound("User not found".into());
        let id = Uuid::parse_str(identity.user_id()).map_err(|_| not_found())?;
        let user = self.users.find_by_id(id).await?.ok_or_else(not_found)?;
        Ok(UserResponse::from(&user))
    }
}
