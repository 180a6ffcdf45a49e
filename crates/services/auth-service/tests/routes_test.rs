//! Router tests for the auth service.
//!
//! A fake [`AuthService`] stands in for the database-backed one, so these
//! run without Postgres or Redis.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use auth_service_lib::routes::create_router;
use auth_service_lib::service::{AuthService, AuthSession, Registration};
use auth_service_lib::state::AppState;
use common::{AppError, AppResult, TokenKeys};
use domain::{User, UserResponse, UserRole};

const SECRET: &str = "router-test-secret-0123456789abcdefgh";

// =============================================================================
// Fake service
// =============================================================================

#[derive(Default)]
struct FakeAuthService {
    logged_out: Mutex<Vec<Uuid>>,
}

fn user(id: Uuid, roles: Vec<UserRole>) -> User {
    let now = Utc::now();
    User {
        id,
        email: "jane@example.com".into(),
        password_hash: "hashed".into(),
        name: "Jane".into(),
        roles,
        refresh_token: None,
        created_at: now,
        updated_at: now,
    }
}

fn session(user: User) -> AuthSession {
    AuthSession {
        user: UserResponse::from(user),
        access_token: "access".into(),
        refresh_token: "refresh".into(),
    }
}

#[async_trait]
impl AuthService for FakeAuthService {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        if registration.email == "taken@example.com" {
            return Err(AppError::conflict("Email already registered"));
        }
        let mut u = user(Uuid::new_v4(), vec![UserRole::Attendee]);
        u.email = registration.email;
        Ok(session(u))
    }

    async fn login(&self, _email: &str, password: &str) -> AppResult<AuthSession> {
        if password == "password123" {
            Ok(session(user(Uuid::new_v4(), vec![UserRole::Attendee])))
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        if refresh_token == "good-refresh" {
            Ok(session(user(Uuid::new_v4(), vec![UserRole::Attendee])))
        } else {
            Err(AppError::unauthorized("Invalid refresh token"))
        }
    }

    async fn logout(&self, user_id: Uuid) -> AppResult<()> {
        self.logged_out.lock().unwrap().push(user_id);
        Ok(())
    }

    async fn me(&self, user_id: Uuid) -> AppResult<User> {
        Ok(user(user_id, vec![UserRole::Organizer]))
    }

    async fn create_admin(&self, _email: &str, _password: &str, _name: &str) -> AppResult<User> {
        Ok(user(Uuid::new_v4(), vec![UserRole::Admin]))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn keys() -> Arc<TokenKeys> {
    Arc::new(TokenKeys::new(SECRET, Duration::hours(1)))
}

fn app(service: Arc<FakeAuthService>) -> Router {
    create_router(AppState::new(service, keys(), None))
}

fn bearer_for(id: Uuid) -> String {
    let token = keys().issue(&user(id, vec![UserRole::Organizer])).unwrap();
    format!("Bearer {}", token)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn register_returns_created_envelope() {
    let (status, body) = send(
        app(Arc::default()),
        post_json(
            "/register",
            json!({"email": "new@example.com", "password": "password123", "name": "New"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["data"]["user"]["email"], "new@example.com");
    assert_eq!(body["data"]["user"]["roles"], json!(["ATTENDEE"]));
    assert_eq!(body["data"]["accessToken"], "access");
}

#[tokio::test]
async fn register_validates_body() {
    let (status, body) = send(
        app(Arc::default()),
        post_json(
            "/register",
            json!({"email": "not-an-email", "password": "password123", "name": "New"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Invalid email format");
}

#[tokio::test]
async fn register_short_password_is_rejected() {
    let (status, _) = send(
        app(Arc::default()),
        post_json(
            "/register",
            json!({"email": "new@example.com", "password": "short", "name": "New"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_duplicate_is_conflict() {
    let (status, body) = send(
        app(Arc::default()),
        post_json(
            "/register",
            json!({"email": "taken@example.com", "password": "password123", "name": "New"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Email already registered");
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let (status, body) = send(
        app(Arc::default()),
        post_json("/login", json!({"email": "jane@example.com", "password": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_returns_token_pair() {
    let (status, body) = send(
        app(Arc::default()),
        post_json("/login", json!({"email": "jane@example.com", "password": "password123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["refreshToken"], "refresh");
}

#[tokio::test]
async fn refresh_accepts_body_or_bearer() {
    let (from_body, _) = send(
        app(Arc::default()),
        post_json("/refresh", json!({"refreshToken": "good-refresh"})),
    )
    .await;

    let request = Request::post("/refresh")
        .header(header::AUTHORIZATION, "Bearer good-refresh")
        .body(Body::empty())
        .unwrap();
    let (from_header, _) = send(app(Arc::default()), request).await;

    assert_eq!(from_body, StatusCode::OK);
    assert_eq!(from_header, StatusCode::OK);
}

#[tokio::test]
async fn refresh_without_token_is_unauthorized() {
    let request = Request::post("/refresh").body(Body::empty()).unwrap();
    let (status, body) = send(app(Arc::default()), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid refresh token");
}

#[tokio::test]
async fn me_requires_token() {
    let request = Request::get("/me").body(Body::empty()).unwrap();
    let (status, body) = send(app(Arc::default()), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn me_returns_profile_for_token_subject() {
    let id = Uuid::new_v4();
    let request = Request::get("/me")
        .header(header::AUTHORIZATION, bearer_for(id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Arc::default()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.to_string());
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn logout_clears_session_of_caller() {
    let service = Arc::new(FakeAuthService::default());
    let id = Uuid::new_v4();
    let request = Request::post("/logout")
        .header(header::AUTHORIZATION, bearer_for(id))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(service.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");
    assert_eq!(*service.logged_out.lock().unwrap(), vec![id]);
}

#[tokio::test]
async fn health_without_database_is_ok() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(Arc::default()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "auth-service");
}
