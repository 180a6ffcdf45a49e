//! Event handlers.

use axum::{
    extract::{Extension, Path, State},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{require_role, ApiResponse, AppResult, Created, CurrentUser, ValidatedJson};
use domain::{
    CreateEvent, Event, RegistrationAvailability, UpdateEvent, UserRole, VenueAvailability,
    VenueAvailabilityRequest,
};

use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "RustConf 2030")]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub date: DateTime<Utc>,
    pub venue_id: Uuid,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    #[schema(example = 250)]
    pub capacity: i32,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    #[schema(example = 49.5)]
    pub price: f64,
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub venue_id: Option<Uuid>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueAvailabilityBody {
    #[validate(length(min = 1, message = "venueIds must be a non-empty array"))]
    pub venue_ids: Vec<Uuid>,
    pub date: DateTime<Utc>,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(req: CreateEventRequest) -> Self {
        CreateEvent {
            title: req.title.trim().to_string(),
            description: req.description,
            date: req.date,
            venue_id: req.venue_id,
            capacity: req.capacity,
            price: req.price,
        }
    }
}

impl From<UpdateEventRequest> for UpdateEvent {
    fn from(req: UpdateEventRequest) -> Self {
        UpdateEvent {
            title: req.title.map(|t| t.trim().to_string()),
            description: req.description,
            date: req.date,
            venue_id: req.venue_id,
            capacity: req.capacity,
            price: req.price,
        }
    }
}

/// Routes that need no token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_event))
        .route("/:id/registration-availability", get(registration_availability))
        .route("/venue-availability", post(venue_availability))
}

/// Routes behind the access-token middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_event))
        .route("/:id", axum::routing::put(update_event).delete(delete_event))
        .route("/organizer/events", get(organizer_events))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Event>> {
    let event = state.event_service.get_event(id).await?;
    Ok(ApiResponse::with_message(event, "Event retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/{id}/registration-availability",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Availability computed", body = RegistrationAvailability),
        (status = 404, description = "Event not found"),
        (status = 503, description = "Attendee service unavailable")
    )
)]
pub async fn registration_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<RegistrationAvailability>> {
    let availability = state.event_service.registration_availability(id).await?;
    Ok(ApiResponse::with_message(availability, "Registration availability retrieved"))
}

#[utoipa::path(
    post,
    path = "/venue-availability",
    tag = "Events",
    request_body = VenueAvailabilityBody,
    responses(
        (status = 200, description = "Venues split into available and booked", body = VenueAvailability),
        (status = 400, description = "No venue ids given")
    )
)]
pub async fn venue_availability(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<VenueAvailabilityBody>,
) -> AppResult<ApiResponse<VenueAvailability>> {
    let availability = state
        .event_service
        .venue_availability(VenueAvailabilityRequest {
            venue_ids: body.venue_ids,
            date: body.date,
        })
        .await?;
    Ok(ApiResponse::with_message(availability, "Venue availability checked"))
}

#[utoipa::path(
    get,
    path = "/organizer/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Events of the caller", body = Vec<Event>),
        (status = 403, description = "Caller is not an organizer")
    )
)]
pub async fn organizer_events(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<Event>>> {
    require_role(&current_user, UserRole::Organizer)?;

    let events = state.event_service.organizer_events(current_user.id).await?;
    Ok(ApiResponse::with_message(events, "Organizer's events retrieved successfully"))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Events",
    security(("bearer_auth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation error or unsuitable venue"),
        (status = 403, description = "Caller is not an organizer"),
        (status = 409, description = "Venue already booked that day"),
        (status = 503, description = "Venue service unavailable")
    )
)]
pub async fn create_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> AppResult<Created<Event>> {
    require_role(&current_user, UserRole::Organizer)?;

    let event = state
        .event_service
        .create_event(current_user.id, payload.into())
        .await?;
    Ok(Created(event, "Event created successfully"))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 403, description = "Not the organizer of this event"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Venue already booked that day")
    )
)]
pub async fn update_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequest>,
) -> AppResult<ApiResponse<Event>> {
    require_role(&current_user, UserRole::Organizer)?;

    let event = state
        .event_service
        .update_event(id, current_user.id, payload.into())
        .await?;
    Ok(ApiResponse::with_message(event, "Event updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 400, description = "Event still has registrations"),
        (status = 403, description = "Not the organizer of this event"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn delete_event(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_role(&current_user, UserRole::Organizer)?;

    state.event_service.delete_event(id, current_user.id).await?;
    Ok(ApiResponse::message("Event deleted successfully"))
}
