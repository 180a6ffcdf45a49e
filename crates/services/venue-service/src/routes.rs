//! Route configuration.

use axum::{middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::auth_middleware;

use crate::handlers::{health_routes, protected_routes, public_routes};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the venue service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes())
        .merge(protected_routes().route_layer(middleware::from_fn_with_state(
            state.token_keys.clone(),
            auth_middleware,
        )))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
