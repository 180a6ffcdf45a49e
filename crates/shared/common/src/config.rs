//! Shared configuration helpers.
//!
//! Every lookup takes a list of variable names and uses the first one that is
//! set, so `EVENT_SERVICE_DATABASE_URL` can override `DATABASE_URL`.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use domain::MIN_JWT_SECRET_LENGTH;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

fn first_set(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| env::var(k).ok().filter(|v| !v.is_empty()))
}

/// First set variable among `keys`, or `default`.
pub fn env_or(keys: &[&str], default: &str) -> String {
    first_set(keys).unwrap_or_else(|| default.to_string())
}

/// First set variable among `keys` parsed as `T`. Unparsable values fall back
/// to `default`.
pub fn env_parse_or<T: FromStr>(keys: &[&str], default: T) -> T {
    first_set(keys)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// First set variable among `keys`, or a [`ConfigError::Missing`] naming the
/// first key.
pub fn require_env(keys: &[&str]) -> Result<String, ConfigError> {
    first_set(keys).ok_or_else(|| ConfigError::Missing(keys.first().copied().unwrap_or("").to_string()))
}

/// HMAC secret used to sign or verify tokens.
#[derive(Clone)]
pub struct JwtSettings {
    pub secret: String,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl JwtSettings {
    /// Access token secret from `JWT_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_var("JWT_SECRET")
    }

    pub fn from_var(name: &str) -> Result<Self, ConfigError> {
        let secret = require_env(&[name])?;
        Self::new(name, secret)
    }

    pub fn new(name: &str, secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                name: name.to_string(),
                reason: format!("must be at least {} characters", MIN_JWT_SECRET_LENGTH),
            });
        }
        Ok(Self { secret })
    }
}

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Load `<PREFIX>_DATABASE_URL` falling back to `DATABASE_URL`.
    pub fn from_env(prefix: &str, default_url: &str) -> Self {
        let url_key = format!("{}_DATABASE_URL", prefix);
        let max_key = format!("{}_DATABASE_MAX_CONNECTIONS", prefix);
        Self {
            url: env_or(&[&url_key, "DATABASE_URL"], default_url),
            max_connections: env_parse_or(&[&max_key, "DATABASE_MAX_CONNECTIONS"], 10),
            min_connections: 1,
        }
    }
}

/// Timeouts for outgoing HTTP calls to sibling services.
#[derive(Debug, Clone, Copy)]
pub struct HttpClientConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(2_000),
            request_timeout: Duration::from_millis(10_000),
        }
    }
}

impl HttpClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            connect_timeout: Duration::from_millis(env_parse_or(
                &["HTTP_CONNECT_TIMEOUT_MS"],
                defaults.connect_timeout.as_millis() as u64,
            )),
            request_timeout: Duration::from_millis(env_parse_or(
                &["HTTP_REQUEST_TIMEOUT_MS"],
                defaults.request_timeout.as_millis() as u64,
            )),
        }
    }
}
