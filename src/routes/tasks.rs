use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskCreate, TaskPatch, TaskReplace},
    tasks::TaskService,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use uuid::Uuid;

// All handlers below sit behind `AuthMiddleware`. The `{user_id}` path
// segment is only compared against the token identity, never trusted.

/// Lists the caller's tasks, oldest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `404 Not Found`: the path user id is not the caller.
#[get("")]
pub async fn list_tasks(
    service: web::Data<TaskService>,
    path: web::Path<String>,
    identity: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    TaskService::check_path_owner(&identity, &path)?;
    let tasks = service.list(&identity).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the caller.
///
/// ## Request Body:
/// - `title`: 1 to 500 characters (required).
/// - `description` (optional): at most 5000 characters.
///
/// ## Responses:
/// - `201 Created`: the new `Task`, with `completed = false`.
/// - `422 Unprocessable Entity`: validation failure.
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    path: web::Path<String>,
    task_data: web::Json<TaskCreate>,
    identity: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    TaskService::check_path_owner(&identity, &path)?;
    let task = service.create(&identity, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task. `404` when it does not exist or is not the caller's.
#[get("/{task_id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    path: web::Path<(String, Uuid)>,
    identity: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    TaskService::check_path_owner(&identity, &user_id)?;
    let task = service.get(&identity, task_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces a task wholesale.
///
/// ## Request Body:
/// `title`, `completed` (both required) and `description` (omitted = cleared).
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `404 Not Found`: not the caller's task.
/// - `422 Unprocessable Entity`: validation failure, including a missing `completed`.
#[put("/{task_id}")]
pub async fn replace_task(
    service: web::Data<TaskService>,
    path: web::Path<(String, Uuid)>,
    task_data: web::Json<TaskReplace>,
    identity: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    TaskService::check_path_owner(&identity, &user_id)?;
    let task = service
        .replace(&identity, task_id, task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates only the fields present in the body. `"description": null`
/// clears the description; leaving it out keeps it.
#[patch("/{task_id}")]
pub async fn patch_task(
    service: web::Data<TaskService>,
    path: web::Path<(String, Uuid)>,
    task_data: web::Json<TaskPatch>,
    identity: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    TaskService::check_path_owner(&identity, &user_id)?;
    let task = service
        .patch(&identity, task_id, task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task. `204 No Content` on success, `404` otherwise.
#[delete("/{task_id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    path: web::Path<(String, Uuid)>,
    identity: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let (user_id, task_id) = path.into_inner();
    TaskService::check_path_owner(&identity, &user_id)?;
    service.delete(&identity, task_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
