//! Transport-neutral HTTP message types.
//!
//! The client renders a [`crate::Request`] into an [`HttpMessage`], hands it to
//! an [`crate::AuthScheme`] for signing, then to an [`crate::HttpTransport`]
//! for execution.

use serde::{Deserialize, Serialize};

use crate::types::HttpMethod;

/// Header name carrying the body's media type.
pub const CONTENT_TYPE: &str = "Content-Type";

/// An outgoing HTTP request, before or after signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpMessage {
    pub method: HttpMethod,
    pub url: String,
    /// Header pairs in insertion order.
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpMessage {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Sets `name`, replacing any existing value (case-insensitive match).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    /// Value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }
}

/// A completed HTTP exchange. Non-2xx statuses are still responses; the
/// client decides how to interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
