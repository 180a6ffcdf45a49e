//! Auth Service Library
//!
//! Registration, login and token rotation over HTTP. It owns the `users`
//! table and announces new users on the notification stream.

pub mod config;
pub mod handlers;
pub mod infra;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tracing::{info, warn};

use common::messaging::{MessagePublisher, RedisStreamPublisher};
use common::TokenKeys;
use domain::UserResponse;

use crate::config::AuthServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::routes::create_router;
use crate::service::{AuthService, Authenticator};
use crate::state::AppState;

pub use common::MigrateAction;

/// Name reported by `/health` and in logs.
pub const SERVICE_NAME: &str = "auth-service";

/// Run the auth service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = AuthServiceConfig::from_env()?;
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AuthServiceConfig::from_env()?;
    let db = Database::connect_without_migrations(&config.database).await?;
    db.migrate(action).await?;
    Ok(())
}

/// Seed an ADMIN account.
pub async fn create_admin(
    email: &str,
    password: &str,
    name: &str,
) -> Result<UserResponse, Box<dyn std::error::Error>> {
    let config = AuthServiceConfig::from_env()?;
    let db = Database::connect(&config.database).await?;
    let authenticator = build_authenticator(&config, db.get_connection(), None);

    let user = authenticator.create_admin(email, password, name).await?;
    Ok(UserResponse::from(user))
}

fn build_authenticator(
    config: &AuthServiceConfig,
    db: sea_orm::DatabaseConnection,
    publisher: Option<Arc<dyn MessagePublisher>>,
) -> Authenticator {
    Authenticator::new(
        Arc::new(UserStore::new(db)),
        publisher,
        Arc::new(access_keys(config)),
        TokenKeys::refresh(
            &config.refresh.secret,
            Duration::days(config.refresh_token_days),
        ),
    )
}

fn access_keys(config: &AuthServiceConfig) -> TokenKeys {
    TokenKeys::new(&config.access.secret, Duration::hours(config.access_token_hours))
}

/// Publishing is switched off when Redis cannot be reached at startup.
async fn connect_publisher(url: &str) -> Option<Arc<dyn MessagePublisher>> {
    match tokio::time::timeout(StdDuration::from_secs(5), RedisStreamPublisher::connect(url)).await {
        Ok(Ok(publisher)) => {
            info!("Connected to Redis, registration messages enabled");
            Some(Arc::new(publisher))
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Redis unavailable, registration messages disabled");
            None
        }
        Err(_) => {
            warn!("Redis connection timed out, registration messages disabled");
            None
        }
    }
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: AuthServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let publisher = connect_publisher(&config.redis_url).await;

    let auth_service: Arc<dyn AuthService> =
        Arc::new(build_authenticator(&config, db.get_connection(), publisher));
    let state = AppState::new(
        auth_service,
        Arc::new(access_keys(&config)),
        Some(db.get_connection()),
    );

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Auth service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
