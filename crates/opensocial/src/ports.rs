//! Port traits implemented by infrastructure crates.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`HttpTransport`] | `transport::ReqwestTransport`, test stubs |
//! | [`AuthScheme`] | `auth::{TwoLeggedOAuth, ThreeLeggedOAuth, SecurityToken, FcAuth}` |

use async_trait::async_trait;

use crate::errors::{AuthError, TransportError};
use crate::http::{HttpMessage, HttpResponse};
use crate::provider::Provider;

/// Executes HTTP messages.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `message` and returns the response, whatever its status.
    ///
    /// Only failures to complete the exchange (connection, timeout, body read)
    /// are errors.
    async fn execute(&self, message: HttpMessage) -> Result<HttpResponse, TransportError>;
}

/// Adds credentials to an outgoing message.
///
/// Stateless schemes sign from fixed configuration. Stateful schemes (three-
/// legged OAuth) read their current token under an internal lock and fail
/// with [`AuthError::NotAuthenticated`] until a token has been issued.
#[async_trait]
pub trait AuthScheme: Send + Sync {
    /// Short scheme name used in logs.
    fn name(&self) -> &'static str;

    /// Returns `message` with credentials applied.
    async fn sign(&self, provider: &Provider, message: HttpMessage)
        -> Result<HttpMessage, AuthError>;
}
