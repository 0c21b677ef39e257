//! HTTP transport adapter.
//!
//! Implements [`opensocial::HttpTransport`] on top of a pooled
//! [`reqwest::Client`]. Any completed exchange is a response, whatever its
//! status; only failures to complete one are errors.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. It knows
//! nothing about REST templates, RPC envelopes, or signing.

use std::time::Duration;

use async_trait::async_trait;
use opensocial::{HttpMessage, HttpMethod, HttpResponse, HttpTransport, TransportError};
use tracing::debug;

/// Default whole-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timeouts and identification for the underlying HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// [`HttpTransport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// [`TransportError::Io`] if the TLS backend cannot be initialised.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Io(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an existing client, e.g. one shared with other components.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn map_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Io(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, message: HttpMessage) -> Result<HttpResponse, TransportError> {
        let HttpMessage {
            method,
            url,
            headers,
            body,
        } = message;

        let mut request = self.client.request(to_reqwest_method(method), url.as_str());
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(map_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_error)?;

        debug!(method = method.as_str(), status, "HTTP exchange complete");
        Ok(HttpResponse { status, body })
    }
}
