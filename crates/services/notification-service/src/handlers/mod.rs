//! HTTP handlers.

pub mod health_handler;

pub use health_handler::{health_check, service_info};
