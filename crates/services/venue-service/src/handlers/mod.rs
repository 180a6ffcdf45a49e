//! HTTP handlers.

pub mod health_handler;
pub mod venue_handler;

pub use health_handler::health_routes;
pub use venue_handler::{protected_routes, public_routes};
