//! Client for attendee-service.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use common::{AppResult, HttpClientConfig, ServiceClient};
use domain::RegistrationCount;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Registration counts needed by event-service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttendeeServiceClient: Send + Sync {
    /// Seat-occupying registrations (REGISTERED or ATTENDED) of an event.
    async fn registration_count(&self, event_id: Uuid) -> AppResult<i64>;
}

/// HTTP client wrapper for attendee-service.
pub struct AttendeeClient {
    http: ServiceClient,
}

impl AttendeeClient {
    pub fn new(base_url: &str, config: HttpClientConfig) -> AppResult<Self> {
        debug!("Using attendee-service at {}", base_url);
        Ok(Self {
            http: ServiceClient::new("attendee-service", base_url, config)?,
        })
    }
}

#[async_trait]
impl AttendeeServiceClient for AttendeeClient {
    async fn registration_count(&self, event_id: Uuid) -> AppResult<i64> {
        let count: RegistrationCount = self
            .http
            .get(&format!("/internal/events/{}/count", event_id))
            .await?;
        Ok(count.count)
    }
}
