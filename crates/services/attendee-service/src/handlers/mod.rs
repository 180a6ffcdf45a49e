//! HTTP handlers.

pub mod attendee_handler;
pub mod health_handler;

pub use attendee_handler::{internal_routes, protected_routes};
pub use health_handler::health_routes;
