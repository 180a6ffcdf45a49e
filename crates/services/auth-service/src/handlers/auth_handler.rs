//! Authentication handlers.

use axum::{
    extract::{Extension, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{ApiResponse, AppError, AppResult, Created, CurrentUser, ValidatedJson};
use domain::UserResponse;

use crate::service::{AuthSession, Registration};
use crate::state::AppState;

/// Registration request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Defaults to `["ATTENDEE"]`
    #[schema(example = json!(["ORGANIZER"]))]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body form of a refresh request. The bearer header takes precedence.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Routes that need no token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

/// Routes behind the access-token middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthSession),
        (status = 400, description = "Validation error or invalid role"),
        (status = 403, description = "ADMIN cannot self-register"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthSession>> {
    let session = state
        .auth_service
        .register(Registration {
            email: payload.email.trim().to_string(),
            password: payload.password,
            name: payload.name.trim().to_string(),
            roles: payload.roles,
        })
        .await?;

    Ok(Created(session, "User registered successfully"))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthSession),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state
        .auth_service
        .login(payload.email.trim(), &payload.password)
        .await?;

    Ok(ApiResponse::with_message(session, "Login successful"))
}

#[utoipa::path(
    post,
    path = "/refresh",
    tag = "Authentication",
    request_body(content = RefreshRequest, description = "Optional when the token is sent as a bearer header"),
    responses(
        (status = 200, description = "New token pair", body = AuthSession),
        (status = 401, description = "Invalid refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    body: Option<Json<RefreshRequest>>,
) -> AppResult<ApiResponse<AuthSession>> {
    let token = bearer
        .map(|TypedHeader(auth)| auth.token().to_string())
        .or_else(|| body.and_then(|Json(b)| b.refresh_token))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

    let session = state.auth_service.refresh(&token).await?;

    Ok(ApiResponse::with_message(session, "Token refreshed successfully"))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn logout(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.auth_service.logout(current_user.id).await?;
    Ok(ApiResponse::message("Logged out successfully"))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn me(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.auth_service.me(current_user.id).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}
