//! Health and info endpoints. The service has no other HTTP surface.

use axum::Json;
use serde::Serialize;

use common::HealthResponse;

use crate::SERVICE_NAME;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
}

pub async fn health_check() -> HealthResponse {
    HealthResponse::ok(SERVICE_NAME)
}

pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Event Platform Notification Service",
        version: env!("CARGO_PKG_VERSION"),
        description: "Email notifications consumed from Redis Streams",
        endpoints: Endpoints { health: "/health" },
    })
}
