//! Health check handlers.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;

use crate::proxy::ServiceHealth;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub services: BTreeMap<&'static str, ServiceHealth>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Probes every backend concurrently. 503 when any of them is down.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let proxy = &state.proxy;
    let probes = proxy
        .upstreams()
        .iter()
        .map(|upstream| async move { (upstream.name, proxy.probe(upstream).await) });
    let services: BTreeMap<_, _> = join_all(probes).await.into_iter().collect();

    let all_healthy = services.values().all(ServiceHealth::is_healthy);

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        timestamp: Utc::now(),
        services,
    };

    if all_healthy {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}
