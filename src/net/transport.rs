//! Transport seam between the refresh coordinator and the HTTP stack.
//!
//! DESIGN
//! ======
//! [`Transport`] is the narrow async trait the coordinator retries against;
//! [`HttpTransport`] is the reqwest-backed production implementation with a
//! cookie store, so the backend's credential cookies ride along without any
//! per-request handling. Tests substitute scripted doubles and never touch
//! the network.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::types::ApiError;
use crate::config::ApiConfig;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// HTTP method subset the session core issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One attempt against the backend.
///
/// `retried` marks a request that has already been replayed once after a
/// credential refresh; replay never recurses.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub(crate) retried: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: None, retried: false }
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self { method: Method::Post, path: path.into(), body: None, retried: false }
    }

    #[must_use]
    pub fn post_json(path: impl Into<String>, body: Value) -> Self {
        Self { method: Method::Post, path: path.into(), body: Some(body), retried: false }
    }

    /// Copy of this request marked as already replayed.
    #[must_use]
    pub(crate) fn as_retry(&self) -> Self {
        let mut retry = self.clone();
        retry.retried = true;
        retry
    }
}

/// Decoded backend response. `body` is `Value::Null` when the backend sent
/// no JSON payload.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Deserialize the body into a typed payload.
    ///
    /// # Errors
    /// [`ApiError::Parse`] when the body does not match `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone()).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

// =============================================================================
// TRANSPORT TRAIT
// =============================================================================

/// Issues one HTTP request and classifies the outcome.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `req` against the backend.
    ///
    /// # Errors
    /// [`ApiError::Network`] when no response arrived, [`ApiError::Status`]
    /// for non-2xx replies, [`ApiError::Parse`] when the body was unreadable.
    async fn execute(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

// =============================================================================
// HTTP TRANSPORT
// =============================================================================

/// Production transport backed by reqwest.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for the configured backend.
    ///
    /// # Errors
    /// [`ApiError::Network`] when the underlying client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, req: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&req.path);
        let mut builder = match req.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;

        // Non-JSON bodies (empty 204s, proxy error pages) decode to Null;
        // typed extraction happens at the call site via `ApiResponse::json`.
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if (200..300).contains(&status) {
            Ok(ApiResponse { status, body })
        } else {
            let message = body.get("message").and_then(Value::as_str).map(str::to_owned);
            Err(ApiError::Status { status, message })
        }
    }
}
