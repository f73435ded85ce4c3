#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use tasktrack::store::{InMemoryTaskStore, InMemoryUserStore};
use tasktrack::{CredentialManager, IdentityVerifier, TaskService, TokenIssuer};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Shared app state over in-memory stores. bcrypt runs at its minimum cost.
#[derive(Clone)]
pub struct TestState {
    pub credentials: web::Data<CredentialManager>,
    pub tasks: web::Data<TaskService>,
    pub verifier: web::Data<IdentityVerifier>,
    pub users: InMemoryUserStore,
}

impl TestState {
    pub fn new() -> Self {
        let users = InMemoryUserStore::new();
        let credentials = CredentialManager::new(
            Arc::new(users.clone()),
            TokenIssuer::new(TEST_SECRET, Duration::hours(1)),
            4,
        )
        .expect("failed to build credential manager");
        Self {
            credentials: web::Data::new(credentials),
            tasks: web::Data::new(TaskService::new(Arc::new(InMemoryTaskStore::new()))),
            verifier: web::Data::new(IdentityVerifier::new(TEST_SECRET)),
            users,
        }
    }
}

/// Builds the full application around a `TestState`.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.credentials.clone())
                .app_data($state.tasks.clone())
                .app_data($state.verifier.clone())
                .wrap(actix_web::middleware::Logger::default())
                .configure(tasktrack::routes::config),
        )
        .await
    };
}

/// Helper struct to hold auth details
pub struct TestUser {
    pub id: String,
    pub token: String,
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {}", token),
    )
}

pub async fn register_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> TestUser {
    let req = actix_web::test::TestRequest::post()
        .uri("/auth/register")
        .set_json(serde_json::json!({
            "email": email,
            "password": password,
            "name": "Test User"
        }))
        .to_request();
    let resp = actix_web::test::call_service(app, req).await;
    assert_eq!(
        resp.status(),
        actix_web::http::StatusCode::CREATED,
        "registration of {} failed",
        email
    );
    let body: tasktrack::models::AuthResponse = actix_web::test::read_body_json(resp).await;
    TestUser {
        id: body.user.id.to_string(),
        token: body.token,
    }
}
