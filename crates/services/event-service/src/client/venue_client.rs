//! Client for venue-service.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult, HttpClientConfig, ServiceClient};
use domain::Venue;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Venue lookups needed by event-service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait VenueServiceClient: Send + Sync {
    /// `None` when the venue does not exist.
    async fn get_venue(&self, id: Uuid) -> AppResult<Option<Venue>>;
}

/// HTTP client wrapper for venue-service.
pub struct VenueClient {
    http: ServiceClient,
}

impl VenueClient {
    pub fn new(base_url: &str, config: HttpClientConfig) -> AppResult<Self> {
        debug!("Using venue-service at {}", base_url);
        Ok(Self {
            http: ServiceClient::new("venue-service", base_url, config)?,
        })
    }
}

#[async_trait]
impl VenueServiceClient for VenueClient {
    async fn get_venue(&self, id: Uuid) -> AppResult<Option<Venue>> {
        match self.http.get::<Venue>(&format!("/{}", id)).await {
            Ok(venue) => Ok(Some(venue)),
            Err(AppError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
