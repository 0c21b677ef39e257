//! Two-legged OAuth: consumer credentials only, no user token.

use async_trait::async_trait;
use opensocial::{AuthError, AuthScheme, HttpMessage, Provider};

use crate::config::ConsumerCredentials;
use crate::oauth::{NonceSource, OAuthSigner};
use crate::params::append_query;

/// Query parameter naming the user a two-legged call acts for.
pub const REQUESTOR_ID_PARAM: &str = "xoauth_requestor_id";

/// Signs every request with the consumer key and secret.
///
/// With a requestor id, `xoauth_requestor_id` is appended to the URL before
/// signing so the container knows which user the call is made for.
#[derive(Debug, Clone)]
pub struct TwoLeggedOAuth {
    signer: OAuthSigner,
    requestor_id: Option<String>,
}

impl TwoLeggedOAuth {
    pub fn new(credentials: ConsumerCredentials) -> Self {
        Self {
            signer: OAuthSigner::new(credentials),
            requestor_id: None,
        }
    }

    pub fn with_requestor_id(mut self, requestor_id: impl Into<String>) -> Self {
        self.requestor_id = Some(requestor_id.into());
        self
    }

    pub fn with_nonce_source(mut self, source: impl NonceSource + 'static) -> Self {
        self.signer = self.signer.with_nonce_source(source);
        self
    }

    pub fn requestor_id(&self) -> Option<&str> {
        self.requestor_id.as_deref()
    }
}

#[async_trait]
impl AuthScheme for TwoLeggedOAuth {
    fn name(&self) -> &'static str {
        "oauth-2-legged"
    }

    async fn sign(
        &self,
        provider: &Provider,
        mut message: HttpMessage,
    ) -> Result<HttpMessage, AuthError> {
        if let Some(requestor) = &self.requestor_id {
            append_query(&mut message.url, &[(REQUESTOR_ID_PARAM, requestor.as_str())]);
        }
        self.signer.sign(message, None, &[], provider.sign_body_hash())
    }
}
