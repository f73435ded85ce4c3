//! Data access layer.
//!
//! The services only see the `UserStore` and `TaskStore` traits, so the
//! Postgres implementation can be swapped for the in-memory one in tests.
//! Every `TaskStore` method is scoped by owner: a row belonging to another
//! user behaves exactly like a missing row.

mod memory;
mod postgres;

pub use memory::{InMemoryTaskStore, InMemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, User};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by an already-normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Persists a new user. Fails with `AppError::DuplicateEmail` when the
    /// email is already taken.
    async fn insert(&self, user: &User) -> Result<User, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_by_id(&self, owner: &str, id: Uuid) -> Result<Option<Task>, AppError>;

    /// All tasks of `owner`, oldest first, ties broken by id.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Task>, AppError>;

    async fn insert(&self, task: &Task) -> Result<Task, AppError>;

    /// Writes the mutable fields of `task` back, matching on both `id` and
    /// `user_id`. Returns `None` when no such row exists.
    async fn update(&self, task: &Task) -> Result<Option<Task>, AppError>;

    /// Returns whether a row was removed.
    async fn delete(&self, owner: &str, id: Uuid) -> Result<bool, AppError>;
}
