//! HTTP client for calls between services.
//!
//! Responses are expected in the [`ApiResponse`] envelope. Failures map onto
//! [`AppError`] the same way for every caller:
//!
//! | failure                         | error                |
//! |---------------------------------|----------------------|
//! | connect error, timeout          | `ServiceUnavailable` |
//! | upstream 404                    | `NotFound`           |
//! | any other non-2xx               | `Upstream` (502)     |
//! | body not an envelope of `T`     | `Upstream` (502)     |

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::HttpClientConfig;
use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;

/// Base URL plus a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    http: Client,
    base_url: String,
    service: &'static str,
}

impl ServiceClient {
    /// `service` names the sibling in errors and logs.
    pub fn new(service: &'static str, base_url: &str, config: HttpClientConfig) -> AppResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `path` and unwrap the envelope.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.send(self.http.request(Method::GET, self.url(path))).await
    }

    /// POST a JSON body and unwrap the envelope.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(service = self.service, error = %e, "Sibling service unreachable");
            if e.is_connect() || e.is_timeout() || e.is_request() {
                AppError::service_unavailable(self.service)
            } else {
                AppError::Http(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound);
        }
        if !status.is_success() {
            return Err(AppError::upstream(format!("{} responded {}", self.service, status)));
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AppError::service_unavailable(self.service)
            } else {
                AppError::upstream(format!("{} sent an unexpected body: {}", self.service, e))
            }
        })?;

        envelope
            .data
            .ok_or_else(|| AppError::upstream(format!("{} sent an empty envelope", self.service)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        id: u32,
    }

    fn client(base: &str) -> ServiceClient {
        ServiceClient::new(
            "thing-service",
            base,
            HttpClientConfig {
                connect_timeout: Duration::from_millis(200),
                request_timeout: Duration::from_millis(500),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/things/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": 200, "data": {"id": 7}, "message": "Success", "success": true
            })))
            .mount(&server)
            .await;

        let thing: Thing = client(&server.uri()).get("/things/7").await.unwrap();
        assert_eq!(thing, Thing { id: 7 });
    }

    #[tokio::test]
    async fn not_found_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server.uri()).get::<Thing>("/things/1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn server_error_maps_to_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server.uri()).get::<Thing>("/things/1").await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server.uri()).get::<Thing>("/things/1").await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn slow_upstream_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let err = client(&server.uri()).get::<Thing>("/things/1").await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(ref s) if s == "thing-service"));
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        // Nothing listens on port 9 of localhost in the test environment.
        let err = client("http://127.0.0.1:9").get::<Thing>("/").await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn posts_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(json!({"q": "x"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": 200, "data": {"id": 2}, "message": "Success", "success": true
            })))
            .mount(&server)
            .await;

        let thing: Thing = client(&server.uri())
            .post("/search", &json!({"q": "x"}))
            .await
            .unwrap();
        assert_eq!(thing.id, 2);
    }
}
