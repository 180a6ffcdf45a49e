//! HTTP handlers.

pub mod health_handler;
pub mod proxy_handler;

pub use health_handler::health_routes;
pub use proxy_handler::proxy_request;
