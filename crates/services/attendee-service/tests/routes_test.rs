//! Router tests for the attendee service.

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

use attendee_service_lib::routes::create_router;
use attendee_service_lib::service::{AttendeeService, RegistrationStatus};
use attendee_service_lib::state::AppState;
use common::{AppError, AppResult, TokenKeys};
use domain::{Attendee, AttendeeStatus, RegistrationCount, User, UserRole};

const SECRET: &str = "router-test-secret-0123456789abcdefgh";

// =============================================================================
// Fake service
// =============================================================================

#[derive(Default)]
struct FakeAttendeeService {
    full: bool,
    registered: Mutex<Vec<(Uuid, Uuid)>>,
}

fn sample(event_id: Uuid, user_id: Uuid, status: AttendeeStatus) -> Attendee {
    let now = Utc::now();
    Attendee {
        id: Uuid::new_v4(),
        event_id,
        user_id,
        ticket_number: "TKT-1700000000000-ABC123".into(),
        status,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl AttendeeService for FakeAttendeeService {
    async fn register(&self, event_id: Uuid, user_id: Uuid) -> AppResult<Attendee> {
        if self.full {
            return Err(AppError::validation("Event registration is full or closed"));
        }
        self.registered.lock().unwrap().push((event_id, user_id));
        Ok(sample(event_id, user_id, AttendeeStatus::Registered))
    }

    async fn user_registrations(&self, user_id: Uuid) -> AppResult<Vec<Attendee>> {
        Ok(vec![sample(Uuid::new_v4(), user_id, AttendeeStatus::Registered)])
    }

    async fn registration_status(&self, _event_id: Uuid, _user_id: Uuid) -> AppResult<RegistrationStatus> {
        Ok(RegistrationStatus {
            is_registered: false,
            registration: None,
        })
    }

    async fn cancel(&self, _event_id: Uuid, _user_id: Uuid) -> AppResult<()> {
        Err(AppError::not_found("Registration not found"))
    }

    async fn event_attendees(&self, _event_id: Uuid, _organizer_id: Uuid) -> AppResult<Vec<Attendee>> {
        Err(AppError::forbidden("You are not the organizer of this event"))
    }

    async fn check_in(&self, event_id: Uuid, _organizer_id: Uuid, user_id: Uuid) -> AppResult<Attendee> {
        Ok(sample(event_id, user_id, AttendeeStatus::Attended))
    }

    async fn find_by_ticket(&self, _ticket_number: &str) -> AppResult<Attendee> {
        Err(AppError::not_found("Ticket not found"))
    }

    async fn registration_count(&self, event_id: Uuid) -> AppResult<RegistrationCount> {
        Ok(RegistrationCount { event_id, count: 42 })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn keys() -> Arc<TokenKeys> {
    Arc::new(TokenKeys::new(SECRET, Duration::hours(1)))
}

fn app_with(service: Arc<FakeAttendeeService>) -> Router {
    create_router(AppState::new(service, keys(), None))
}

fn app() -> Router {
    app_with(Arc::new(FakeAttendeeService::default()))
}

fn user(roles: Vec<UserRole>) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: "someone@example.com".into(),
        password_hash: String::new(),
        name: "Someone".into(),
        roles,
        refresh_token: None,
        created_at: now,
        updated_at: now,
    }
}

fn bearer_for(user: &User) -> String {
    format!("Bearer {}", keys().issue(user).unwrap())
}

fn bearer(roles: Vec<UserRole>) -> String {
    bearer_for(&user(roles))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn register_request(token: Option<String>, event_id: Uuid) -> Request<Body> {
    let mut builder = Request::post("/register").header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder
        .body(Body::from(json!({ "eventId": event_id }).to_string()))
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn register_requires_token() {
    let (status, body) = send(app(), register_request(None, Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn organizers_cannot_register() {
    let request = register_request(Some(bearer(vec![UserRole::Organizer])), Uuid::new_v4());
    let (status, _) = send(app(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn attendee_registers_for_themselves() {
    let service = Arc::new(FakeAttendeeService::default());
    let caller = user(vec![UserRole::Attendee]);
    let event_id = Uuid::new_v4();

    let (status, body) = send(
        app_with(service.clone()),
        register_request(Some(bearer_for(&caller)), event_id),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Successfully registered for event");
    assert_eq!(body["data"]["status"], "REGISTERED");
    assert_eq!(body["data"]["eventId"], event_id.to_string());
    assert_eq!(*service.registered.lock().unwrap(), vec![(event_id, caller.id)]);
}

#[tokio::test]
async fn full_event_is_bad_request() {
    let service = Arc::new(FakeAttendeeService {
        full: true,
        ..Default::default()
    });
    let request = register_request(Some(bearer(vec![UserRole::Attendee])), Uuid::new_v4());
    let (status, body) = send(app_with(service), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Event registration is full or closed");
}

#[tokio::test]
async fn status_reports_not_registered() {
    let request = Request::get(format!("/event/{}/status", Uuid::new_v4()))
        .header(header::AUTHORIZATION, bearer(vec![UserRole::Attendee]))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isRegistered"], false);
    assert_eq!(body["data"]["registration"], Value::Null);
}

#[tokio::test]
async fn cancel_without_registration_is_not_found() {
    let request = Request::delete(format!("/event/{}", Uuid::new_v4()))
        .header(header::AUTHORIZATION, bearer(vec![UserRole::Attendee]))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Registration not found");
}

#[tokio::test]
async fn attendee_list_is_for_organizers() {
    let event_id = Uuid::new_v4();
    let as_attendee = Request::get(format!("/event/{}", event_id))
        .header(header::AUTHORIZATION, bearer(vec![UserRole::Attendee]))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(), as_attendee).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let as_other_organizer = Request::get(format!("/event/{}", event_id))
        .header(header::AUTHORIZATION, bearer(vec![UserRole::Organizer]))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), as_other_organizer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "You are not the organizer of this event");
}

#[tokio::test]
async fn check_in_returns_attended_registration() {
    let user_id = Uuid::new_v4();
    let request = Request::post(format!("/event/{}/check-in", Uuid::new_v4()))
        .header(header::AUTHORIZATION, bearer(vec![UserRole::Organizer]))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "userId": user_id }).to_string()))
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ATTENDED");
    assert_eq!(body["data"]["userId"], user_id.to_string());
}

#[tokio::test]
async fn unknown_ticket_is_not_found() {
    let request = Request::get("/ticket/TKT-0-NOPE00")
        .header(header::AUTHORIZATION, bearer(vec![UserRole::Organizer]))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Ticket not found");
}

#[tokio::test]
async fn internal_count_needs_no_token() {
    let event_id = Uuid::new_v4();
    let request = Request::get(format!("/internal/events/{}/count", event_id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "eventId": event_id, "count": 42 }));
}

#[tokio::test]
async fn health_without_database_is_ok() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "attendee-service");
}
