//! HTTP transport seam
//!
//! Source adapters describe requests as plain data and hand them to an
//! [`HttpTransport`]. Production uses [`ReqwestTransport`]; tests script
//! responses without touching the network.

use crate::error::{SearchError, SearchResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("bizscan/", env!("CARGO_PKG_VERSION"));

/// Transport-level failures (no HTTP status was obtained)
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Outbound request description
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub json_body: Option<Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            json_body: None,
            timeout,
        }
    }

    pub fn post_json(url: impl Into<String>, body: Value, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            json_body: Some(body),
            timeout,
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Value of a query parameter, if present
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a header (case-insensitive name), if present
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status code plus body
///
/// `body` is `None` when the response text was not valid JSON; whether that
/// matters is up to the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Executes one request, returning a response or a transport failure
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> SearchResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SearchError::HttpClient(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http_client.get(&request.url),
            HttpMethod::Post => self.http_client.post(&request.url),
        };

        builder = builder.timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.json_body {
            builder = builder.json(body);
        }

        tracing::debug!(url = %request.url, method = ?request.method, "Sending request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(request.timeout)
            } else if e.is_builder() {
                TransportError::InvalidRequest(e.to_string())
            } else {
                TransportError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(request.timeout)
            } else {
                TransportError::NetworkError(e.to_string())
            }
        })?;

        let body = serde_json::from_str(&text).ok();
        if body.is_none() {
            tracing::debug!(url = %request.url, status, "Response body is not JSON");
        }

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builders() {
        let request = HttpRequest::get("https://example.test/entities", Duration::from_secs(30))
            .query("legalBusinessName", "Acme")
            .header("User-Agent", "Test Agent ops@example.test");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.query_value("legalBusinessName"), Some("Acme"));
        assert_eq!(request.query_value("missing"), None);
        assert_eq!(request.header_value("user-agent"), Some("Test Agent ops@example.test"));
        assert!(request.json_body.is_none());
    }

    #[test]
    fn test_post_json_carries_body() {
        let request = HttpRequest::post_json("https://example.test/search", json!({"limit": 10}), Duration::from_secs(5));
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.json_body, Some(json!({"limit": 10})));
        assert_eq!(request.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_transport_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[test]
    fn test_response_is_ok_only_for_200() {
        assert!(HttpResponse::json(200, json!({})).is_ok());
        assert!(!HttpResponse::json(204, json!({})).is_ok());
        assert!(!HttpResponse::json(404, json!({})).is_ok());
    }
}
