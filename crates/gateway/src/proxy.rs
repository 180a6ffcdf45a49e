//! Prefix-based reverse proxy.
//!
//! `/api/events/123?x=1` goes to `{EVENT_SERVICE_URL}/123?x=1`. Method, body
//! and end-to-end headers are forwarded; the upstream answer is returned as
//! is. Requests are never retried.

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, HeaderName, Uri},
    response::Response,
};
use reqwest::{redirect, Client};
use serde::Serialize;
use tracing::{debug, warn};

use common::{AppError, AppResult, HttpClientConfig};

/// Largest request body accepted for forwarding.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Per-hop headers (RFC 9110 section 7.6.1) plus `content-length`, which is
/// recomputed on each side.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

/// One backend and the path prefix routed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub name: &'static str,
    pub prefix: &'static str,
    pub base_url: String,
}

impl Upstream {
    pub fn new(name: &'static str, prefix: &'static str, base_url: &str) -> Self {
        Self {
            name,
            prefix,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Path left after the prefix, or `None` when the prefix does not match
    /// on a segment boundary.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix)?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Upstream URL for `uri`, keeping the query string.
    pub fn target_url(&self, uri: &Uri) -> Option<String> {
        let rest = self.strip(uri.path())?;
        let path = if rest.is_empty() { "/" } else { rest };
        Some(match uri.query() {
            Some(query) => format!("{}{}?{}", self.base_url, path, query),
            None => format!("{}{}", self.base_url, path),
        })
    }
}

/// Result of probing one backend's `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Copy of `headers` without hop-by-hop headers, the headers named in
/// `Connection`, and `Host` when `drop_host` is set.
pub fn forwardable_headers(headers: &HeaderMap, drop_host: bool) -> HeaderMap {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if HOP_BY_HOP.contains(&name.as_str()) || listed.contains(name) {
            continue;
        }
        if drop_host && name == header::HOST {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Forwards requests to the matching [`Upstream`].
pub struct Proxy {
    http: Client,
    upstreams: Vec<Upstream>,
    health_timeout: Duration,
}

impl Proxy {
    pub fn new(upstreams: Vec<Upstream>, config: HttpClientConfig, health_timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| AppError::internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http,
            upstreams,
            health_timeout,
        })
    }

    pub fn upstreams(&self) -> &[Upstream] {
        &self.upstreams
    }

    fn route(&self, uri: &Uri) -> Option<(&Upstream, String)> {
        self.upstreams
            .iter()
            .find_map(|u| u.target_url(uri).map(|url| (u, url)))
    }

    pub async fn forward(&self, request: Request) -> AppResult<Response> {
        let (parts, body) = request.into_parts();
        let (upstream, url) = self
            .route(&parts.uri)
            .ok_or_else(|| AppError::not_found("Route not found"))?;

        let body = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|_| AppError::PayloadTooLarge(MAX_BODY_BYTES))?;

        let upstream_response = self
            .http
            .request(parts.method.clone(), &url)
            .headers(forwardable_headers(&parts.headers, true))
            .body(body)
            .send()
            .await
            .map_err(|e| unavailable(upstream, e))?;

        let status = upstream_response.status();
        let headers = forwardable_headers(upstream_response.headers(), false);
        let bytes = upstream_response
            .bytes()
            .await
            .map_err(|e| unavailable(upstream, e))?;

        debug!(
            method = %parts.method,
            path = %parts.uri.path(),
            upstream = upstream.name,
            status = status.as_u16(),
            "Proxied request"
        );

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }

    /// GET `{base_url}/health`; any 2xx counts as healthy.
    pub async fn probe(&self, upstream: &Upstream) -> ServiceHealth {
        let url = format!("{}/health", upstream.base_url);
        let result = self
            .http
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await;

        let error = match result {
            Ok(response) if response.status().is_success() => None,
            Ok(response) => Some(format!("responded {}", response.status())),
            Err(e) if e.is_timeout() => Some("timed out".to_string()),
            Err(e) => Some(e.to_string()),
        };

        ServiceHealth {
            status: if error.is_none() { "healthy" } else { "unhealthy" },
            url: upstream.base_url.clone(),
            error,
        }
    }
}

fn unavailable(upstream: &Upstream, e: reqwest::Error) -> AppError {
    warn!(upstream = upstream.name, error = %e, "Upstream request failed");
    if e.is_connect() || e.is_timeout() || e.is_request() {
        AppError::service_unavailable(upstream.name)
    } else {
        AppError::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn events() -> Upstream {
        Upstream::new("event-service", "/api/events", "http://events:3002/")
    }

    fn target(uri: &str) -> Option<String> {
        events().target_url(&uri.parse::<Uri>().unwrap())
    }

    #[test]
    fn strips_prefix_and_keeps_query() {
        assert_eq!(target("/api/events/42?page=2").as_deref(), Some("http://events:3002/42?page=2"));
        assert_eq!(
            target("/api/events/organizer/events").as_deref(),
            Some("http://events:3002/organizer/events")
        );
    }

    #[test]
    fn bare_prefix_maps_to_root() {
        assert_eq!(target("/api/events").as_deref(), Some("http://events:3002/"));
        assert_eq!(target("/api/events/").as_deref(), Some("http://events:3002/"));
        assert_eq!(target("/api/events?x=1").as_deref(), Some("http://events:3002/?x=1"));
    }

    #[test]
    fn prefix_must_end_on_segment() {
        assert_eq!(target("/api/eventsfoo"), None);
        assert_eq!(target("/api/venues/1"), None);
    }

    #[test]
    fn hop_by_hop_headers_are_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("gateway:3000"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace-hop"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-trace-hop", HeaderValue::from_static("1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.append("x-tag", HeaderValue::from_static("a"));
        headers.append("x-tag", HeaderValue::from_static("b"));

        let request_side = forwardable_headers(&headers, true);
        assert_eq!(request_side.len(), 3);
        assert_eq!(request_side[header::AUTHORIZATION], "Bearer abc");
        assert_eq!(request_side.get_all("x-tag").iter().count(), 2);

        let response_side = forwardable_headers(&headers, false);
        assert!(response_side.contains_key(header::HOST));
        assert!(!response_side.contains_key("x-trace-hop"));
    }
}
