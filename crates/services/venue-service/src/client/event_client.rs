//! Client for event-service.

use async_trait::async_trait;
use tracing::debug;

use common::{AppResult, HttpClientConfig, ServiceClient};
use domain::{VenueAvailability, VenueAvailabilityRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Booking lookups needed by venue-service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventServiceClient: Send + Sync {
    async fn venue_availability(&self, request: VenueAvailabilityRequest) -> AppResult<VenueAvailability>;
}

/// HTTP client wrapper for event-service.
pub struct EventClient {
    http: ServiceClient,
}

impl EventClient {
    pub fn new(base_url: &str, config: HttpClientConfig) -> AppResult<Self> {
        debug!("Using event-service at {}", base_url);
        Ok(Self {
            http: ServiceClient::new("event-service", base_url, config)?,
        })
    }
}

#[async_trait]
impl EventServiceClient for EventClient {
    async fn venue_availability(&self, request: VenueAvailabilityRequest) -> AppResult<VenueAvailability> {
        self.http.post("/venue-availability", &request).await
    }
}
