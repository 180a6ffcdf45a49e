//! Attendee handlers.

use axum::{
    extract::{Extension, Path, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{require_role, ApiResponse, AppResult, Created, CurrentUser, ValidatedJson};
use domain::{Attendee, RegistrationCount, UserRole};

use crate::service::RegistrationStatus;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub event_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub user_id: Uuid,
}

/// Called by event-service; not exposed through the gateway's auth.
pub fn internal_routes() -> Router<AppState> {
    Router::new().route("/internal/events/:event_id/count", get(registration_count))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/user/events", get(user_events))
        .route("/event/:event_id", get(event_attendees).delete(cancel_registration))
        .route("/event/:event_id/status", get(registration_status))
        .route("/event/:event_id/check-in", post(check_in))
        .route("/ticket/:ticket_number", get(find_ticket))
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Attendees",
    security(("bearer_auth" = [])),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = Attendee),
        (status = 400, description = "Event full, closed, or already registered"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Concurrent duplicate registration"),
        (status = 503, description = "Event service unavailable")
    )
)]
pub async fn register(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<Attendee>> {
    require_role(&current_user, UserRole::Attendee)?;

    let attendee = state
        .attendee_service
        .register(payload.event_id, current_user.id)
        .await?;
    Ok(Created(attendee, "Successfully registered for event"))
}

#[utoipa::path(
    get,
    path = "/user/events",
    tag = "Attendees",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Registrations of the caller", body = Vec<Attendee>))
)]
pub async fn user_events(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<Attendee>>> {
    require_role(&current_user, UserRole::Attendee)?;

    let registrations = state.attendee_service.user_registrations(current_user.id).await?;
    Ok(ApiResponse::with_message(registrations, "User registrations retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/event/{event_id}/status",
    tag = "Attendees",
    security(("bearer_auth" = [])),
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses((status = 200, description = "Registration status of the caller", body = RegistrationStatus))
)]
pub async fn registration_status(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<ApiResponse<RegistrationStatus>> {
    require_role(&current_user, UserRole::Attendee)?;

    let status = state
        .attendee_service
        .registration_status(event_id, current_user.id)
        .await?;
    Ok(ApiResponse::with_message(status, "Registration status retrieved"))
}

#[utoipa::path(
    delete,
    path = "/event/{event_id}",
    tag = "Attendees",
    security(("bearer_auth" = [])),
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registration cancelled"),
        (status = 400, description = "Already cancelled"),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn cancel_registration(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_role(&current_user, UserRole::Attendee)?;

    state.attendee_service.cancel(event_id, current_user.id).await?;
    Ok(ApiResponse::message("Registration cancelled successfully"))
}

#[utoipa::path(
    get,
    path = "/event/{event_id}",
    tag = "Attendees",
    security(("bearer_auth" = [])),
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registrations of the event", body = Vec<Attendee>),
        (status = 403, description = "Not the organizer of this event"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn event_attendees(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<ApiResponse<Vec<Attendee>>> {
    require_role(&current_user, UserRole::Organizer)?;

    let attendees = state
        .attendee_service
        .event_attendees(event_id, current_user.id)
        .await?;
    Ok(ApiResponse::with_message(attendees, "Event attendees retrieved successfully"))
}

#[utoipa::path(
    post,
    path = "/event/{event_id}/check-in",
    tag = "Attendees",
    security(("bearer_auth" = [])),
    params(("event_id" = Uuid, Path, description = "Event ID")),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Attendee checked in", body = Attendee),
        (status = 403, description = "Not the organizer of this event"),
        (status = 404, description = "Active registration not found")
    )
)]
pub async fn check_in(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CheckInRequest>,
) -> AppResult<ApiResponse<Attendee>> {
    require_role(&current_user, UserRole::Organizer)?;

    let attendee = state
        .attendee_service
        .check_in(event_id, current_user.id, payload.user_id)
        .await?;
    Ok(ApiResponse::with_message(attendee, "Attendee checked in successfully"))
}

#[utoipa::path(
    get,
    path = "/ticket/{ticket_number}",
    tag = "Attendees",
    security(("bearer_auth" = [])),
    params(("ticket_number" = String, Path, description = "Ticket number")),
    responses(
        (status = 200, description = "Registration for the ticket", body = Attendee),
        (status = 404, description = "Ticket not found")
    )
)]
pub async fn find_ticket(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(ticket_number): Path<String>,
) -> AppResult<ApiResponse<Attendee>> {
    require_role(&current_user, UserRole::Organizer)?;

    let attendee = state.attendee_service.find_by_ticket(&ticket_number).await?;
    Ok(ApiResponse::with_message(attendee, "Ticket retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/internal/events/{event_id}/count",
    tag = "Internal",
    params(("event_id" = Uuid, Path, description = "Event ID")),
    responses((status = 200, description = "Seats taken", body = RegistrationCount))
)]
pub async fn registration_count(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<ApiResponse<RegistrationCount>> {
    let count = state.attendee_service.registration_count(event_id).await?;
    Ok(ApiResponse::with_message(count, "Registration count retrieved"))
}
