//! HTTP handlers.

pub mod auth_handler;
pub mod health_handler;

pub use auth_handler::{protected_routes, public_routes};
pub use health_handler::health_routes;
