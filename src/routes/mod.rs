pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error, web};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route. Expects `web::Data` for `CredentialManager`,
/// `TaskService` and `IdentityVerifier` to be present on the `App`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::me),
        )
        .service(
            web::scope("/api/{user_id}/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::replace_task)
                .service(tasks::patch_task)
                .service(tasks::delete_task),
        );
}

/// Malformed or mistyped JSON bodies are validation failures (422).
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err: error::PathError, _req| AppError::Validation(err.to_string()).into())
}
