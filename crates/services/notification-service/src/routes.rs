//! Route configuration.

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{health_check, service_info};

pub fn create_router() -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
