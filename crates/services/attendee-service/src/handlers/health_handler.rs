//! Health check handler.

use axum::{extract::State, routing::get, Router};

use common::{health::database_health, HealthResponse};

use crate::state::AppState;
use crate::SERVICE_NAME;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// 200 when the database answers, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> HealthResponse {
    match &state.db {
        Some(db) => database_health(SERVICE_NAME, db).await,
        None => HealthResponse::ok(SERVICE_NAME),
    }
}
