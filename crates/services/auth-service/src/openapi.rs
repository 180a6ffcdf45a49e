//! OpenAPI documentation.

use utoipa::OpenApi;

use common::openapi::SecurityAddon;
use domain::{UserResponse, UserRole};

use crate::handlers::auth_handler::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::service::AuthSession;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::refresh,
        crate::handlers::auth_handler::logout,
        crate::handlers::auth_handler::me,
    ),
    components(schemas(RegisterRequest, LoginRequest, RefreshRequest, AuthSession, UserResponse, UserRole)),
    modifiers(&SecurityAddon),
    tags((name = "Authentication", description = "Registration, login and token rotation"))
)]
pub struct ApiDoc;
