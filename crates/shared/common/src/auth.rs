//! Authentication middleware and role checks.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use domain::{UserRole, BEARER_TOKEN_PREFIX};

use crate::error::{AppError, AppResult};
use crate::jwt::{Claims, TokenKeys};

/// Current authenticated user extracted from the access token.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub roles: Vec<UserRole>,
}

impl CurrentUser {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            roles: claims.roles,
        }
    }
}

/// 403 unless the user holds `role`.
pub fn require_role(user: &CurrentUser, role: UserRole) -> AppResult<()> {
    require_any_role(user, &[role])
}

/// 403 unless the user holds at least one of `roles`.
pub fn require_any_role(user: &CurrentUser, roles: &[UserRole]) -> AppResult<()> {
    if roles.iter().any(|r| user.has_role(*r)) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Validate the bearer access token locally and attach [`CurrentUser`].
///
/// Mount with `middleware::from_fn_with_state(keys, auth_middleware)`.
pub async fn auth_middleware(
    State(keys): State<Arc<TokenKeys>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = keys.verify(token)?;

    request.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(request).await)
}

/// Token from an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderValue, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use chrono::{Duration, Utc};
    use domain::User;
    use tower::ServiceExt;

    const SECRET: &str = "middleware-test-secret-0123456789abcdef";

    fn user(roles: Vec<UserRole>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "u@example.com".into(),
            name: "U".into(),
            roles,
        }
    }

    #[test]
    fn role_checks_require_membership() {
        let admin = user(vec![UserRole::Admin]);
        assert!(require_role(&admin, UserRole::Admin).is_ok());
        assert!(matches!(
            require_role(&admin, UserRole::Organizer),
            Err(AppError::Forbidden)
        ));

        let both = user(vec![UserRole::Attendee, UserRole::Organizer]);
        assert!(require_any_role(&both, &[UserRole::Admin, UserRole::Organizer]).is_ok());
    }

    #[test]
    fn bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    fn app(keys: Arc<TokenKeys>) -> Router {
        Router::new()
            .route(
                "/me",
                get(|Extension(user): Extension<CurrentUser>| async move { user.email }),
            )
            .route_layer(middleware::from_fn_with_state(keys, auth_middleware))
    }

    #[tokio::test]
    async fn middleware_rejects_missing_token() {
        let keys = Arc::new(TokenKeys::new(SECRET, Duration::hours(1)));
        let response = app(keys)
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn middleware_attaches_current_user() {
        let keys = Arc::new(TokenKeys::new(SECRET, Duration::hours(1)));
        let now = Utc::now();
        let token = keys
            .issue(&User {
                id: Uuid::new_v4(),
                email: "jane@example.com".into(),
                password_hash: String::new(),
                name: "Jane".into(),
                roles: vec![UserRole::Attendee],
                refresh_token: None,
                created_at: now,
                updated_at: now,
            })
            .unwrap();

        let response = app(keys)
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"jane@example.com");
    }
}
