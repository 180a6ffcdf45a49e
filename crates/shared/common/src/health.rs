//! Health check bodies shared by the services.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /health` body of a single service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl HealthResponse {
    pub fn ok(service: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            timestamp: Utc::now(),
            database: None,
        }
    }
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        let status = if self.status == "ok" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(self)).into_response()
    }
}

/// Health of a service backed by a database: 503 when the ping fails.
#[cfg(feature = "database")]
pub async fn database_health(service: &str, db: &sea_orm::DatabaseConnection) -> HealthResponse {
    let mut health = HealthResponse::ok(service);
    match crate::db::ping(db).await {
        Ok(()) => health.database = Some("connected".to_string()),
        Err(e) => {
            tracing::warn!(service, error = %e, "Database ping failed");
            health.status = "error".to_string();
            health.database = Some("unreachable".to_string());
        }
    }
    health
}
