//! Container-issued security tokens passed as a query parameter.

use async_trait::async_trait;
use opensocial::{AuthError, AuthScheme, HttpMessage, Provider};

use crate::params::append_query;

/// Default query parameter name for security tokens.
pub const DEFAULT_TOKEN_NAME: &str = "st";

/// Appends `st=<token>` (or a custom parameter name) to every request URL.
#[derive(Clone, PartialEq, Eq)]
pub struct SecurityToken {
    name: String,
    token: String,
}

impl SecurityToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_name(DEFAULT_TOKEN_NAME, token)
    }

    /// A token sent under parameter `name` instead of `st`.
    pub fn with_name(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
        }
    }

    /// Query parameter the token is sent under.
    pub fn parameter_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for SecurityToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityToken")
            .field("name", &self.name)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl AuthScheme for SecurityToken {
    fn name(&self) -> &'static str {
        "security-token"
    }

    async fn sign(
        &self,
        _provider: &Provider,
        mut message: HttpMessage,
    ) -> Result<HttpMessage, AuthError> {
        append_query(&mut message.url, &[(self.name.as_str(), self.token.as_str())]);
        Ok(message)
    }
}
