//! Error taxonomy and retry-policy types for the dispatch core.
//!
//! Each stage of a dispatch has its own error type:
//!
//! | Stage | Type | Sent over the wire? |
//! |-------|------|---------------------|
//! | Request construction | [`BuildError`] | never |
//! | Signing / token exchange | [`AuthError`] | maybe (token endpoints) |
//! | HTTP execution | [`TransportError`] | yes |
//! | Response decoding | [`ProtocolError`] | yes |
//!
//! [`ClientError`] is the umbrella returned by `Client::send`. All variants
//! carry owned strings so errors are `Clone` and can be stored inside a failed
//! [`crate::Response`] for a single batch key.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
///
/// The client never retries on its own; callers use this classification to
/// decide whether re-sending a request is worthwhile.
///
/// - `Retryable`: I/O failures, timeouts, HTTP 429 and 5xx responses.
/// - `NonRetryable`: build errors, authentication failures, protocol
///   violations, container-reported errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// The operation must not be retried without changing the request.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Stage errors
// ---------------------------------------------------------------------------

/// A malformed [`crate::Request`]. Never sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A required REST template placeholder has no value on the request.
    #[error("unresolved placeholder {{{placeholder}}} in template '{template}'")]
    UnresolvedPlaceholder {
        /// Placeholder name without braces.
        placeholder: String,
        /// The template being resolved.
        template: String,
    },

    /// The REST template names a placeholder the request model does not know.
    #[error("unknown placeholder {{{placeholder}}} in template '{template}'")]
    UnknownPlaceholder {
        /// Placeholder name without braces.
        placeholder: String,
        /// The template being resolved.
        template: String,
    },

    /// A query, payload, or RPC parameter was added with an empty key.
    #[error("parameter key must not be empty")]
    EmptyParameterKey,

    /// RPC dispatch was selected but the request has no RPC method.
    #[error("request has no RPC method and provider '{provider}' has no REST endpoint")]
    MissingRpcMethod {
        /// Provider the request was dispatched to.
        provider: String,
    },

    /// The provider exposes neither a REST nor an RPC endpoint.
    #[error("provider '{provider}' has no REST or RPC endpoint")]
    NoEndpoint {
        /// Provider name.
        provider: String,
    },

    /// `send_batch` was called with no requests.
    #[error("request batch is empty")]
    EmptyBatch,

    /// Two requests in one batch carry the same correlation id.
    #[error("duplicate correlation id '{0}' in batch")]
    DuplicateCorrelationId(String),

    /// A service factory rejected its input (e.g. media item without album id).
    #[error("invalid request: {0}")]
    Invalid(String),

    /// The request payload could not be serialized.
    #[error("payload serialization failed: {0}")]
    Serialization(String),
}

/// Token exchange or signing failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A three-legged scheme was asked to sign before an access token exists.
    #[error("not authenticated: no access token has been issued")]
    NotAuthenticated,

    /// A new authorization was started while an access token is still
    /// issued. Reset the scheme first.
    #[error("already authenticated: reset before starting a new authorization")]
    AlreadyAuthenticated,

    /// An access-token exchange was attempted with no pending request token.
    #[error("no authorization is pending")]
    NoPendingAuthorization,

    /// The provider lacks an OAuth endpoint the flow needs.
    #[error("provider has no {0} URL configured")]
    MissingEndpoint(&'static str),

    /// The token endpoint answered with a non-success status.
    #[error("token exchange failed with status {status}: {message}")]
    TokenExchange {
        /// HTTP status returned by the token endpoint.
        status: u16,
        /// Response body (truncated by the caller if needed).
        message: String,
    },

    /// The token endpoint answered 2xx but without `oauth_token`/`oauth_token_secret`.
    #[error("malformed token response: {0}")]
    MalformedTokenResponse(String),

    /// The token endpoint could not be reached.
    #[error("token endpoint unreachable: {0}")]
    Transport(String),

    /// The message could not be signed (e.g. unparseable URL).
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Network or HTTP-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, DNS, TLS, or body-read failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// The call did not complete before its deadline.
    #[error("request timed out")]
    Timeout,

    /// Non-2xx status without a parseable container error body.
    #[error("HTTP status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

/// The response body violates the expected REST / JSON-RPC shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The provider declares a content type the parser cannot decode.
    #[error("unsupported content type '{0}'")]
    UnsupportedContentType(String),

    /// The body is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The body is JSON but not in any recognised shape.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// A batch reply contains no entry for this correlation id.
    #[error("no response entry for correlation id '{id}'")]
    MissingResponse {
        /// The correlation id that went unanswered.
        id: String,
    },
}

/// Shape violations in the field model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A value of the wrong shape was added to or requested from a field.
    #[error("type mismatch: field is {found}, operation requires {expected}")]
    TypeMismatch {
        /// Shape the operation needed.
        expected: &'static str,
        /// Shape the field actually has.
        found: &'static str,
    },

    /// A scalar accessor was called on a field with no values.
    #[error("field has no values")]
    EmptyField,
}

// ---------------------------------------------------------------------------
// Umbrella error
// ---------------------------------------------------------------------------

/// Any failure of a single dispatch, or of one key within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Signing or token exchange failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The HTTP call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The container answered with an explicit error entry.
    #[error("container error {code}: {message}")]
    Remote {
        /// Error code reported by the container (HTTP-like, e.g. 404).
        code: i64,
        /// Container-supplied message.
        message: String,
    },
}

impl ClientError {
    /// Classifies this error for callers deciding whether to re-send.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport(TransportError::Io(_) | TransportError::Timeout) => {
                RetryPolicy::Retryable { after: None }
            }
            Self::Transport(TransportError::Status { status, .. })
                if *status == 429 || *status >= 500 =>
            {
                RetryPolicy::Retryable { after: None }
            }
            Self::Remote { code, .. } if *code == 429 || *code >= 500 => {
                RetryPolicy::Retryable { after: None }
            }
            Self::Auth(AuthError::Transport(_)) => RetryPolicy::Retryable { after: None },
            _ => RetryPolicy::NonRetryable,
        }
    }

    /// HTTP-like status code associated with this error, if any.
    pub fn status_code(&self) -> Option<i64> {
        match self {
            Self::Transport(TransportError::Status { status, .. }) => Some(i64::from(*status)),
            Self::Auth(AuthError::TokenExchange { status, .. }) => Some(i64::from(*status)),
            Self::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns `true` if this error marks a call that missed its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout))
    }
}

/// One or more entries of a batch failed while the rest succeeded.
///
/// Not fatal: the batch result still holds every key. Produced on demand by
/// [`crate::BatchResponse::partial_failure`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} of {total} batch entries failed", .failed.len())]
pub struct PartialBatchError {
    /// Failed keys with their errors, in key order.
    pub failed: Vec<(String, ClientError)>,
    /// Number of entries in the batch.
    pub total: usize,
}
