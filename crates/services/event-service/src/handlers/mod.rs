//! HTTP handlers.

pub mod event_handler;
pub mod health_handler;

pub use event_handler::{protected_routes, public_routes};
pub use health_handler::health_routes;
