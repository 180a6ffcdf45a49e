//! Gateway configuration.

use std::time::Duration;

use common::{env_or, env_parse_or, HttpClientConfig};

use crate::proxy::Upstream;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub auth_service_url: String,
    pub event_service_url: String,
    pub venue_service_url: String,
    pub attendee_service_url: String,
    /// Timeouts for proxied requests
    pub http: HttpClientConfig,
    /// Timeout of each backend probe in `/health`
    pub health_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_service_url: env_or(&["AUTH_SERVICE_URL"], &defaults.auth_service_url),
            event_service_url: env_or(&["EVENT_SERVICE_URL"], &defaults.event_service_url),
            venue_service_url: env_or(&["VENUE_SERVICE_URL"], &defaults.venue_service_url),
            attendee_service_url: env_or(&["ATTENDEE_SERVICE_URL"], &defaults.attendee_service_url),
            http: HttpClientConfig {
                connect_timeout: defaults.http.connect_timeout,
                request_timeout: Duration::from_millis(env_parse_or(
                    &["GATEWAY_REQUEST_TIMEOUT_MS"],
                    defaults.http.request_timeout.as_millis() as u64,
                )),
            },
            health_timeout: Duration::from_millis(env_parse_or(
                &["GATEWAY_HEALTH_TIMEOUT_MS"],
                defaults.health_timeout.as_millis() as u64,
            )),
            host: env_or(&["GATEWAY_HOST"], &defaults.host),
            port: env_parse_or(&["GATEWAY_PORT", "PORT"], defaults.port),
        }
    }

    /// Prefix table, in match order.
    pub fn upstreams(&self) -> Vec<Upstream> {
        vec![
            Upstream::new("auth-service", "/api/auth", &self.auth_service_url),
            Upstream::new("event-service", "/api/events", &self.event_service_url),
            Upstream::new("venue-service", "/api/venues", &self.venue_service_url),
            Upstream::new("attendee-service", "/api/attendees", &self.attendee_service_url),
        ]
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            auth_service_url: "http://localhost:3001".to_string(),
            event_service_url: "http://localhost:3002".to_string(),
            venue_service_url: "http://localhost:3003".to_string(),
            attendee_service_url: "http://localhost:3004".to_string(),
            http: HttpClientConfig {
                connect_timeout: Duration::from_secs(2),
                request_timeout: Duration::from_secs(30),
            },
            health_timeout: Duration::from_secs(5),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}
