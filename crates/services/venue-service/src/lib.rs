//! Venue Service Library
//!
//! Owns the `venues` table. Date-aware availability searches ask
//! event-service which venues are already booked.

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
use crate::config::VenueServiceConfig;
use crate::infra::Database;
use crate::repository::VenueStore;
use crate::routes::create_router;
use crate::service::{VenueManager, VenueService};
use crate::state::AppState;

pub use common::MigrateAction;

pub const SERVICE_NAME: &str = "venue-service";

/// Run the venue service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = VenueServiceConfig::from_env()?;
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = VenueServiceConfig::from_env()?;
    let db = Database::connect_without_migrations(&config.database).await?;
    db.migrate(action).await?;
    Ok(())
}

async fn run_server_with_config(
    host: &str,
    port: u16,
    config: VenueServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let events = EventClient::new(&config.event_service_url, config.http)?;

    let venue_service: Arc<dyn VenueService> = Arc::new(VenueManager::new(
        Arc::new(VenueStore::new(db.get_connection())),
        Arc::new(events),
    ));
    let token_keys = Arc::new(TokenKeys::new(
        &config.jwt.secret,
        Duration::hours(domain::ACCESS_TOKEN_EXPIRATION_HOURS),
    ));

    let app = create_router(AppState::new(venue_service, token_keys, Some(db.get_connection())));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Venue service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
