//! Event Service
//!
//! Serves a permission-gated CRUD resource for community events.
//! Anonymous callers see verified events, members additionally see their
//! own, and superusers see everything.

use sqlx::sqlite::SqlitePool;
use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod storage;

use crate::api::build_router;
use crate::auth::{JwtManager, UserStore};
use crate::config::Config;
use crate::storage::EventRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database repository.
    pub repository: EventRepository,
    /// JWT manager for token operations.
    pub jwt_manager: JwtManager,
    /// Config-based user accounts.
    pub user_store: UserStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is expected in production
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    logging::init();

    tracing::info!("Starting Event Service v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        "Configuration loaded"
    );

    let pool = SqlitePool::connect(&config.database.url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            anyhow::anyhow!("Database connection error: {}", e)
        })?;

    let repository = EventRepository::new(pool);
    repository.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and schema initialized");

    let jwt_manager = JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_issuer.clone(),
        config.auth.token_duration_hours,
    );
    let user_store = UserStore::new(config.auth.users.clone());

    tracing::info!(users = user_store.len(), "Authentication configured");

    let state = AppState {
        repository,
        jwt_manager,
        user_store,
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
