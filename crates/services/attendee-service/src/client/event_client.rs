//! Client for event-service.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult, HttpClientConfig, ServiceClient};
use domain::{Event, RegistrationAvailability};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Event lookups needed by attendee-service.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventServiceClient: Send + Sync {
    /// `None` when the event does not exist.
    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>>;

    async fn registration_availability(&self, id: Uuid) -> AppResult<RegistrationAvailability>;
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
    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>> {
        match self.http.get::<Event>(&format!("/{}", id)).await {
            Ok(event) => Ok(Some(event)),
            Err(AppError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn registration_availability(&self, id: Uuid) -> AppResult<RegistrationAvailability> {
        self.http
            .get(&format!("/{}/registration-availability", id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> EventClient {
        EventClient::new(
            base,
            HttpClientConfig {
                connect_timeout: Duration::from_millis(200),
                request_timeout: Duration::from_millis(500),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn reads_availability() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path(format!("/{}/registration-availability", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": 200,
                "data": {
                    "available": true,
                    "reason": "Registration open",
                    "currentRegistrations": 3,
                    "maxCapacity": 10,
                    "remainingSpots": 7
                },
                "message": "Registration availability retrieved",
                "success": true
            })))
            .mount(&server)
            .await;

        let availability = client(&server.uri()).registration_availability(id).await.unwrap();
        assert!(availability.available);
        assert_eq!(availability.remaining_spots, 7);
    }

    #[tokio::test]
    async fn missing_event_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "NOT_FOUND", "message": "Event not found"}
            })))
            .mount(&server)
            .await;

        assert!(client(&server.uri()).get_event(Uuid::new_v4()).await.unwrap().is_none());
    }
}
