//! # HTTP Transport
//!
//! The seam between request building and the network.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Transport Pipeline                               │
//! │                                                                         │
//! │  VoucherifyClient                                                       │
//! │       │ HttpRequest { method, url, headers, body, timeout }             │
//! │       ▼                                                                 │
//! │  ┌──────────────────────┐   ┌──────────────────────────────────────┐    │
//! │  │  ReqwestTransport    │   │  Embedder transport (any impl of     │    │
//! │  │  (bundled)           │   │  Transport, e.g. in-memory in tests) │    │
//! │  └──────────┬───────────┘   └──────────────────┬───────────────────┘    │
//! │             └────────────── HttpResponse ──────┘                        │
//! │                                  │ { status, body }                     │
//! │                                  ▼                                      │
//! │                      interpret_response()                               │
//! │             200-399 + known shape  → Ok(ApiResponse)                    │
//! │             other status           → UnexpectedStatus                   │
//! │             unknown / non-JSON     → ResponseShape                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transports only move bytes. Classification happens once, in
//! [`interpret_response`], so every transport yields the same outcome for
//! the same response.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::protocol::ApiResponse;

pub const HEADER_APPLICATION_ID: &str = "X-Client-Application-Id";
pub const HEADER_CLIENT_TOKEN: &str = "X-Client-Token";
pub const HEADER_CHANNEL: &str = "X-Voucherify-Channel";

const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// Request / Response
// =============================================================================

/// HTTP methods used by the client API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built request, ready for any [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Builds a request carrying the credential and channel headers.
    pub fn new(config: &ClientConfig, method: HttpMethod, url: Url, body: Option<Value>) -> Self {
        let mut headers = vec![
            (HEADER_APPLICATION_ID.to_string(), config.application_id.clone()),
            (HEADER_CLIENT_TOKEN.to_string(), config.token.clone()),
            (HEADER_CHANNEL.to_string(), config.channel.clone()),
            ("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
        ];
        if method == HttpMethod::Post {
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: config.timeout(),
        }
    }

    /// Looks up a header value, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A completed exchange: status and raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }

    /// 2xx and 3xx count as success.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends one request and returns the raw response.
///
/// Implementations return `ClientError::Transport` when no response
/// arrived (connect failure, timeout). Any response, whatever its status,
/// is returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// The bundled transport, backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> ClientResult<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(ReqwestTransport { http })
    }

    /// Wraps an existing `reqwest` client (proxies, custom TLS).
    pub fn with_client(http: reqwest::Client) -> Self {
        ReqwestTransport { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(request.url.clone()),
            HttpMethod::Post => self.http.post(request.url.clone()),
        }
        .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        trace!(status, bytes = body.len(), "Response received");
        Ok(HttpResponse { status, body })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

// =============================================================================
// Response Classification
// =============================================================================

/// Classifies a raw response.
///
/// ## Rules
/// - Non-JSON body on a success status → `ResponseShape` with the text as
///   a JSON string context
/// - Status outside 200-399 → `UnexpectedStatus`, keeping the parsed body
///   (if any) for error-key lookup
/// - JSON body of an unknown shape → `ResponseShape` with the body
pub fn interpret_response(response: HttpResponse) -> ClientResult<ApiResponse> {
    let parsed: Option<Value> = serde_json::from_str(&response.body).ok();

    if !response.is_success() {
        debug!(status = response.status, "Unsuccessful status");
        return Err(ClientError::UnexpectedStatus {
            status: response.status,
            body: parsed,
        });
    }

    let body = parsed.ok_or_else(|| ClientError::ResponseShape {
        context: Value::String(response.body.clone()),
    })?;

    ApiResponse::from_body(body).map_err(|context| ClientError::ResponseShape { context })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ResponseShape;
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig::new("app-id", "secret", Some(Duration::from_millis(750)))
    }

    fn url() -> Url {
        Url::parse("https://api.voucherify.io/client/v1/redeem").unwrap()
    }

    #[test]
    fn test_request_headers() {
        let get = HttpRequest::new(&config(), HttpMethod::Get, url(), None);
        assert_eq!(get.header("x-client-application-id"), Some("app-id"));
        assert_eq!(get.header(HEADER_CLIENT_TOKEN), Some("secret"));
        assert_eq!(get.header(HEADER_CHANNEL), Some("Voucherify.js"));
        assert_eq!(get.header("Accept"), Some("application/json"));
        assert_eq!(get.header("Content-Type"), None);
        assert_eq!(get.timeout, Duration::from_millis(750));

        let post = HttpRequest::new(&config(), HttpMethod::Post, url(), Some(json!({})));
        assert_eq!(post.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_success_statuses() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(304, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(400, "").is_success());
    }

    #[test]
    fn test_interpret_recognized_body() {
        let response = interpret_response(HttpResponse::new(200, r#"{"result":"SUCCESS"}"#)).unwrap();
        assert_eq!(response.shape(), ResponseShape::Redemption);
    }

    #[test]
    fn test_interpret_unknown_shape() {
        let err = interpret_response(HttpResponse::new(200, r#"{"foo":1}"#)).unwrap_err();
        match err {
            ClientError::ResponseShape { context } => assert_eq!(context, json!({ "foo": 1 })),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_interpret_non_json_body() {
        let err = interpret_response(HttpResponse::new(200, "<html>")).unwrap_err();
        match err {
            ClientError::ResponseShape { context } => assert_eq!(context, json!("<html>")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_interpret_error_status_keeps_body() {
        let err = interpret_response(HttpResponse::new(
            400,
            r#"{"code":400,"key":"missing_amount"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.api_error_key().unwrap().is_amount_error());

        let err = interpret_response(HttpResponse::new(502, "Bad Gateway")).unwrap_err();
        assert!(matches!(
            err,
            ClientError::UnexpectedStatus { status: 502, body: None }
        ));
    }

    #[test]
    fn test_recognized_shape_on_error_status_is_still_an_error() {
        let err = interpret_response(HttpResponse::new(404, r#"{"valid":false}"#)).unwrap_err();
        assert_eq!(err.status(), Some(404));
    }
}
