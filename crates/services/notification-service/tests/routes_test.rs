//! Router tests for the notification service.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use notification_service_lib::routes::create_router;

async fn get(uri: &str) -> (StatusCode, Value) {
    let response = create_router()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "notification-service");
    assert!(body["timestamp"].is_string());
    assert!(body.get("database").is_none());
}

#[tokio::test]
async fn root_describes_service() {
    let (status, body) = get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["health"], "/health");
}

#[tokio::test]
async fn other_paths_are_not_found() {
    let (status, _) = get("/register").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
