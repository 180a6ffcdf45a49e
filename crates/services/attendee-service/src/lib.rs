//! Attendee Service Library
//!
//! Owns the `attendees` table: registrations, tickets and check-in. Asks
//! event-service whether an event exists and still has seats before inserting.

pub mod client;
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

use chrono::Duration;
use tracing::info;

use common::TokenKeys;

use crate::client::EventClient;
use crate::config::AttendeeServiceConfig;
use crate::infra::Database;
use crate::repository::AttendeeStore;
use crate::routes::create_router;
use crate::service::{AttendeeManager, AttendeeService};
use crate::state::AppState;

pub use common::MigrateAction;

pub const SERVICE_NAME: &str = "attendee-service";

/// Run the attendee service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = AttendeeServiceConfig::from_env()?;
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AttendeeServiceConfig::from_env()?;
    let db = Database::connect_without_migrations(&config.database).await?;
    db.migrate(action).await?;
    Ok(())
}

async fn run_server_with_config(
    host: &str,
    port: u16,
    config: AttendeeServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;

    let events = EventClient::new(&config.event_service_url, config.http)?;

    let attendee_service: Arc<dyn AttendeeService> = Arc::new(AttendeeManager::new(
        Arc::new(AttendeeStore::new(db.get_connection())),
        Arc::new(events),
    ));
    let token_keys = Arc::new(TokenKeys::new(
        &config.jwt.secret,
        Duration::hours(domain::ACCESS_TOKEN_EXPIRATION_HOURS),
    ));

    let app = create_router(AppState::new(attendee_service, token_keys, Some(db.get_connection())));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Attendee service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
