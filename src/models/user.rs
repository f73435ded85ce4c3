use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A registered account as stored in the `users` table.
///
/// `password_hash` is a bcrypt digest; this type is never serialized so the
/// hash cannot leak into a response. Use [`UserResponse`] for output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    /// Always stored normalised (trimmed, lower-cased).
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a [`User`], without the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at,
        }
    }
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 8, max = 100))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Payload for `POST /auth/login`.
///
/// Only presence is checked here; a malformed email simply fails to match
/// and is reported as invalid credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Lower-cases and trims an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn register(email: &str, password: &str, name: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register("test@example.com", "password123", "Test").validate().is_ok());

        // Invalid email
        assert!(register("invalid-email", "password123", "Test").validate().is_err());

        // Password shorter than 8 and longer than 100
        assert!(register("test@example.com", "short", "Test").validate().is_err());
        assert!(register("test@example.com", &"p".repeat(101), "Test")
            .validate()
            .is_err());
        assert!(register("test@example.com", &"p".repeat(100), "Test")
            .validate()
            .is_ok());

        // Empty and overlong names
        assert!(register("test@example.com", "password123", "").validate().is_err());
        assert!(register("test@example.com", "password123", &"n".repeat(256))
            .validate()
            .is_err());
    }

    #[test]
    fn test_overlong_email_rejected() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert!(register(&email, "password123", "Test").validate().is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_user_response_drops_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            name: "A".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "a@example.com");
    }
}
