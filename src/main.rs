use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tasktrack::{
    auth::BCRYPT_COST,
    db, routes,
    store::{PgTaskStore, PgUserStore},
    Config, CredentialManager, IdentityVerifier, TaskService, TokenIssuer,
};

fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);
    match &config.frontend_url {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let pool = db::create_pool(&config).await.map_err(|e| {
        log::error!("Failed to connect to database: {}", e);
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
    })?;
    db::run_migrations(&pool).await.map_err(|e| {
        log::error!("Failed to run migrations: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let credentials = CredentialManager::new(
        Arc::new(PgUserStore::new(pool.clone())),
        TokenIssuer::from_config(&config),
        BCRYPT_COST,
    )
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let credentials = web::Data::new(credentials);
    let task_service = web::Data::new(TaskService::new(Arc::new(PgTaskStore::new(pool))));
    let verifier = web::Data::new(IdentityVerifier::from_config(&config));

    log::info!("Starting tasktrack server at {}", config.server_url());
    let server_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(credentials.clone())
            .app_data(task_service.clone())
            .app_data(verifier.clone())
            .wrap(cors(&server_config))
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
