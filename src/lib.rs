#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Identity (registration, login, bearer-token verification) and an ownership-scoped"]
#![doc = "task store behind an actix-web HTTP surface. Every task operation runs on behalf of"]
#![doc = "a verified user and can only see that user's rows."]
#![doc = ""]
#![doc = "The binary (`main.rs`) reads `Config`, builds the Postgres-backed stores and serves"]
#![doc = "`routes::config`. Tests build the same app over the in-memory stores."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tasks;

pub use crate::auth::{AuthenticatedUser, CredentialManager, IdentityVerifier, TokenIssuer};
pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::tasks::TaskService;
