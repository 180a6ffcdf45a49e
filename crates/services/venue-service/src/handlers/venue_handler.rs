//! Venue handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::{require_role, ApiResponse, AppError, AppResult, Created, CurrentUser, ValidatedJson};
use domain::{CreateVenue, UpdateVenue, UserRole, Venue, VenueStatus};

use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVenueRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Grand Hall")]
    pub name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    #[schema(example = "1 Main Street")]
    pub address: String,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    #[schema(example = 500)]
    pub capacity: i32,
    /// Defaults to ACTIVE
    pub status: Option<VenueStatus>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVenueRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub status: Option<VenueStatus>,
}

/// Query of `GET /available`. Kept as strings so bad input gets the JSON
/// error body instead of the extractor's plain-text rejection.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailableQuery {
    /// Minimum seats (required)
    pub capacity: Option<String>,
    /// Only venues free on this UTC day (RFC 3339)
    pub date: Option<String>,
}

impl AvailableQuery {
    fn parse(self) -> AppResult<(i32, Option<DateTime<Utc>>)> {
        let capacity = self
            .capacity
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::bad_request("Missing required query parameters"))?
            .parse::<i32>()
            .map_err(|_| AppError::bad_request("capacity must be an integer"))?;

        let date = self
            .date
            .filter(|d| !d.is_empty())
            .map(|d| {
                DateTime::parse_from_rfc3339(&d)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| AppError::bad_request("date must be an RFC 3339 timestamp"))
            })
            .transpose()?;

        Ok((capacity, date))
    }
}

impl From<CreateVenueRequest> for CreateVenue {
    fn from(req: CreateVenueRequest) -> Self {
        CreateVenue {
            name: req.name.trim().to_string(),
            address: req.address.trim().to_string(),
            capacity: req.capacity,
            status: req.status.unwrap_or_default(),
        }
    }
}

impl From<UpdateVenueRequest> for UpdateVenue {
    fn from(req: UpdateVenueRequest) -> Self {
        UpdateVenue {
            name: req.name.map(|n| n.trim().to_string()),
            address: req.address.map(|a| a.trim().to_string()),
            capacity: req.capacity,
            status: req.status,
        }
    }
}

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_venues))
        .route("/available", get(available_venues))
        .route("/:id", get(get_venue))
}

/// ADMIN-only catalogue management.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_venue))
        .route("/:id", put(update_venue).delete(delete_venue))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Venues",
    responses((status = 200, description = "All venues, newest first", body = Vec<Venue>))
)]
pub async fn list_venues(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Venue>>> {
    let venues = state.venue_service.list_venues().await?;
    Ok(ApiResponse::with_message(venues, "Venues retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/available",
    tag = "Venues",
    params(AvailableQuery),
    responses(
        (status = 200, description = "Active venues large enough (and free on the date)", body = Vec<Venue>),
        (status = 400, description = "Missing or malformed query parameters"),
        (status = 503, description = "Event service unavailable")
    )
)]
pub async fn available_venues(
    State(state): State<AppState>,
    Query(query): Query<AvailableQuery>,
) -> AppResult<ApiResponse<Vec<Venue>>> {
    let (capacity, date) = query.parse()?;

    let venues = state.venue_service.available_venues(capacity, date).await?;
    Ok(ApiResponse::with_message(venues, "Available venues retrieved successfully"))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Venues",
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue found", body = Venue),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Venue>> {
    let venue = state.venue_service.get_venue(id).await?;
    Ok(ApiResponse::with_message(venue, "Venue retrieved successfully"))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Venues",
    security(("bearer_auth" = [])),
    request_body = CreateVenueRequest,
    responses(
        (status = 201, description = "Venue created", body = Venue),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_venue(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateVenueRequest>,
) -> AppResult<Created<Venue>> {
    require_role(&current_user, UserRole::Admin)?;

    let venue = state.venue_service.create_venue(payload.into()).await?;
    Ok(Created(venue, "Venue created successfully"))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Venues",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    request_body = UpdateVenueRequest,
    responses(
        (status = 200, description = "Venue updated", body = Venue),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn update_venue(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateVenueRequest>,
) -> AppResult<ApiResponse<Venue>> {
    require_role(&current_user, UserRole::Admin)?;

    let venue = state.venue_service.update_venue(id, payload.into()).await?;
    Ok(ApiResponse::with_message(venue, "Venue updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Venues",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Venue ID")),
    responses(
        (status = 200, description = "Venue deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Venue not found")
    )
)]
pub async fn delete_venue(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_role(&current_user, UserRole::Admin)?;

    state.venue_service.delete_venue(id).await?;
    Ok(ApiResponse::message("Venue deleted successfully"))
}
