//! Task CRUD with ownership enforcement.
//!
//! Every operation takes an [`AuthenticatedUser`], which only the identity
//! verifier can produce. A task owned by someone else is reported exactly
//! like a missing one.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{Task, TaskCreate, TaskPatch, TaskReplace};
use crate::store::TaskStore;

pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

fn not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// Rejects a routing identifier that differs from the verified identity.
    /// The path value is never used for anything else.
    pub fn check_path_owner(
        identity: &AuthenticatedUser,
        path_user_id: &str,
    ) -> Result<(), AppError> {
        if identity.user_id() != path_user_id {
            log::warn!(
                "Path user {} does not match token user {}",
                path_user_id,
                identity.user_id()
            );
            return Err(not_found());
        }
        Ok(())
    }

    pub async fn create(
        &self,
        identity: &AuthenticatedUser,
        input: TaskCreate,
    ) -> Result<Task, AppError> {
        input.validate()?;
        let task = self
            .tasks
            .insert(&Task::new(input, identity.user_id()))
            .await?;
        log::info!("User {} created task {}", identity.user_id(), task.id);
        Ok(task)
    }

    pub async fn list(&self, identity: &AuthenticatedUser) -> Result<Vec<Task>, AppError> {
        self.tasks.list_by_owner(identity.user_id()).await
    }

    pub async fn get(&self, identity: &AuthenticatedUser, task_id: Uuid) -> Result<Task, AppError> {
        let task = self
            .tasks
            .find_by_id(identity.user_id(), task_id)
            .await?
            .ok_or_else(not_found)?;
        // The store already filters on owner; this guards against a store that does not.
        if task.user_id != identity.user_id() {
            return Err(not_found());
        }
        Ok(task)
    }

    /// Full replacement (PUT). `completed` must be present.
    pub async fn replace(
        &self,
        identity: &AuthenticatedUser,
        task_id: Uuid,
        input: TaskReplace,
    ) -> Result<Task, AppError> {
        input.validate()?;
        let mut task = self.get(identity, task_id).await?;
        task.replace(input);
        let task = self.tasks.update(&task).await?.ok_or_else(not_found)?;
        log::info!("User {} replaced task {}", identity.user_id(), task.id);
        Ok(task)
    }

    /// Partial update (PATCH). Nothing is written, and `updated_at` stays put,
    /// when the patch leaves every field as it was.
    pub async fn patch(
        &self,
        identity: &AuthenticatedUser,
        task_id: Uuid,
        input: TaskPatch,
    ) -> Result<Task, AppError> {
        input.validate()?;
        let mut task = self.get(identity, task_id).await?;
        if !task.apply_patch(input) {
            log::debug!("Patch of task {} changed nothing", task.id);
            return Ok(task);
        }
        let task = self.tasks.update(&task).await?.ok_or_else(not_found)?;
        log::info!("User {} patched task {}", identity.user_id(), task.id);
        Ok(task)
    }

    pub async fn delete(&self, identity: &AuthenticatedUser, task_id: Uuid) -> Result<(), AppError> {
        if !self.tasks.delete(identity.user_id(), task_id).await? {
            return Err(not_found());
        }
        log::info!("User {} deleted task {}", identity.user_id(), task_id);
        Ok(())
    }
}
