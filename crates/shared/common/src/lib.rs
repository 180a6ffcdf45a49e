//! Common utilities shared across all microservices.
//!
//! This crate provides:
//! - Unified error handling and the JSON response envelope
//! - Configuration helpers
//! - Token verification middleware and role checks (`jwt`)
//! - Database wrapper (`database`), Redis Streams messaging (`messaging`)
//!   and the sibling-service HTTP client (`http-client`)

pub mod config;
pub mod error;
pub mod extractors;
pub mod health;
pub mod response;

#[cfg(feature = "jwt")]
pub mod auth;
#[cfg(feature = "http-client")]
pub mod client;
#[cfg(feature = "database")]
pub mod db;
#[cfg(feature = "jwt")]
pub mod jwt;
#[cfg(feature = "messaging")]
pub mod messaging;
#[cfg(feature = "openapi")]
pub mod openapi;

pub use config::{env_or, env_parse_or, require_env, ConfigError, DatabaseConfig, HttpClientConfig, JwtSettings};
pub use error::{AppError, AppResult, OptionExt};
pub use extractors::ValidatedJson;
pub use health::HealthResponse;
pub use response::{ApiResponse, Created};

#[cfg(feature = "jwt")]
pub use auth::{auth_middleware, require_any_role, require_role, CurrentUser};
#[cfg(feature = "http-client")]
pub use client::ServiceClient;
#[cfg(feature = "database")]
pub use db::{Database, MigrateAction};
#[cfg(feature = "jwt")]
pub use jwt::{Claims, TokenKeys, TokenKind};
