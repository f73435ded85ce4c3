//! Identity: password hashing, token issuing and verification, the
//! credential manager and the actix glue that puts a verified identity on
//! each request.

pub mod credentials;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

pub use credentials::CredentialManager;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password, BCRYPT_COST};
pub use token::{AuthenticatedUser, Claims, IdentityVerifier, TokenIssuer};
