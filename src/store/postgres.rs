use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{Task, User};

const TASK_COLUMNS: &str = "id, title, description, completed, created_at, updated_at, user_id";

/// `UserStore` backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: &User) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, name, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, email, password_hash, name, created_at",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // Lost a race with a concurrent registration for the same email.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// `TaskStore` backed by the `tasks` table. Every statement filters on `user_id`.
#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn find_by_id(&self, owner: &str, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn insert(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (id, title, description, completed, created_at, updated_at, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.completed)
            .bind(task.created_at)
            .bind(task.updated_at)
            .bind(&task.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update(&self, task: &Task) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks
             SET title = $1, description = $2, completed = $3, updated_at = $4
             WHERE id = $5 AND user_id = $6
             RETURNING {TASK_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.completed)
            .bind(task.updated_at)
            .bind(task.id)
            .bind(&task.user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, owner: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
