//! Event Service Library
//!
//! Owns the `events` table. Validates venues against venue-service and asks
//! attendee-service for seat counts when answering availability questions.

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

use crate::client::{AttendeeClient, VenueClient};
use crate::config::EventServiceConfig;
use crate::infra::Database;
use crate::repository::EventStore;
use crate::routes::create_router;
use crate::service::{EventManager, EventService};
use crate::state::AppState;

pub use common::MigrateAction;

pub const SERVICE_NAME: &str = "event-service";

/// Run the event service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = EventServiceConfig::from_env()?;
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = EventServiceConfig::from_env()?;
    let db = Database::connect_without_migrations(&config.database).await?;
    db.migrate(action).await?;
    Ok(())
}

async fn run_server_with_config(
    host: &str,
    port: u16,
    config: EventServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;

    let venues = VenueClient::new(&config.venue_service_url, config.http)?;
    let attendees = AttendeeClient::new(&config.attendee_service_url, config.http)?;

    let event_service: Arc<dyn EventService> = Arc::new(EventManager::new(
        Arc::new(EventStore::new(db.get_connection())),
        Arc::new(venues),
        Arc::new(attendees),
    ));
    let token_keys = Arc::new(TokenKeys::new(
        &config.jwt.secret,
        Duration::hours(domain::ACCESS_TOKEN_EXPIRATION_HOURS),
    ));

    let app = create_router(AppState::new(event_service, token_keys, Some(db.get_connection())));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Event service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
