//! Three-legged OAuth: a user authorizes the consumer through a redirect.
//!
//! ```text
//! Unauthenticated ──authorization_url()──▶ AuthorizationPending
//!        ▲                                        │
//!        │ reset()                 exchange_access_token()
//!        │                                        ▼
//!        └──────────────────────────────── AccessTokenIssued
//! ```
//!
//! `RequestTokenIssued` is entered when a persisted request token is reloaded
//! with [`ThreeLeggedOAuth::set_request_token`]; it accepts the same exchange
//! as `AuthorizationPending`. `AccessTokenIssued` is left only through
//! `reset()`; starting a new authorization from it is refused.
//!
//! Token state lives behind a `tokio::sync::Mutex`, so transitions of one
//! scheme instance are serialized. A failed exchange leaves the state as it
//! was. Driving the redirect and persisting tokens are the application's job.

use std::sync::Arc;

use async_trait::async_trait;
use opensocial::{
    AuthError, AuthScheme, HttpMessage, HttpMethod, HttpResponse, HttpTransport, Provider,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{ConsumerCredentials, TokenPair};
use crate::oauth::{NonceSource, OAuthSigner};
use crate::params::{parse_form, percent_encode, push_separator};

const TOKEN_PARAM: &str = "oauth_token";
const TOKEN_SECRET_PARAM: &str = "oauth_token_secret";
const CALLBACK_PARAM: &str = "oauth_callback";
const VERIFIER_PARAM: &str = "oauth_verifier";

/// Observable position in the authorization flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Unauthenticated,
    RequestTokenIssued,
    AuthorizationPending,
    AccessTokenIssued,
}

#[derive(Debug, Clone)]
enum Flow {
    Unauthenticated,
    RequestTokenIssued(TokenPair),
    /// `None` for providers without a request-token endpoint.
    AuthorizationPending(Option<TokenPair>),
    AccessTokenIssued(TokenPair),
}

impl Flow {
    fn state(&self) -> FlowState {
        match self {
            Self::Unauthenticated => FlowState::Unauthenticated,
            Self::RequestTokenIssued(_) => FlowState::RequestTokenIssued,
            Self::AuthorizationPending(_) => FlowState::AuthorizationPending,
            Self::AccessTokenIssued(_) => FlowState::AccessTokenIssued,
        }
    }

    fn request_token(&self) -> Option<&TokenPair> {
        match self {
            Self::RequestTokenIssued(token) => Some(token),
            Self::AuthorizationPending(token) => token.as_ref(),
            _ => None,
        }
    }
}

/// OAuth 1.0a with user authorization.
pub struct ThreeLeggedOAuth {
    signer: OAuthSigner,
    transport: Arc<dyn HttpTransport>,
    flow: Mutex<Flow>,
}

impl ThreeLeggedOAuth {
    /// A scheme with no tokens. `transport` carries the token-endpoint calls.
    pub fn new(credentials: ConsumerCredentials, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            signer: OAuthSigner::new(credentials),
            transport,
            flow: Mutex::new(Flow::Unauthenticated),
        }
    }

    /// A scheme already holding an access token, e.g. reloaded from storage.
    pub fn with_access_token(
        credentials: ConsumerCredentials,
        transport: Arc<dyn HttpTransport>,
        access_token: TokenPair,
    ) -> Self {
        Self {
            signer: OAuthSigner::new(credentials),
            transport,
            flow: Mutex::new(Flow::AccessTokenIssued(access_token)),
        }
    }

    pub fn with_nonce_source(mut self, source: impl NonceSource + 'static) -> Self {
        self.signer = self.signer.with_nonce_source(source);
        self
    }

    pub async fn state(&self) -> FlowState {
        self.flow.lock().await.state()
    }

    /// Starts the flow and returns the URL the user must visit.
    ///
    /// Fetches a request token first when the provider has a request-token
    /// endpoint; otherwise the URL carries only the callback. The callback is
    /// appended verbatim.
    ///
    /// # Errors
    ///
    /// [`AuthError::AlreadyAuthenticated`] while an access token is issued,
    /// [`AuthError::MissingEndpoint`] without an authorize URL, or any
    /// failure of the request-token call. The state is unchanged on error.
    pub async fn authorization_url(
        &self,
        provider: &Provider,
        callback: &str,
    ) -> Result<String, AuthError> {
        let authorize = provider
            .authorize_url()
            .ok_or(AuthError::MissingEndpoint("authorize"))?;

        let mut flow = self.flow.lock().await;
        if matches!(*flow, Flow::AccessTokenIssued(_)) {
            return Err(AuthError::AlreadyAuthenticated);
        }

        let request_token = match provider.request_token_url() {
            Some(endpoint) => Some(self.fetch_request_token(provider, endpoint).await?),
            None => {
                debug!(provider = %provider.name(), "provider has no request-token endpoint");
                None
            }
        };

        let mut url = authorize.to_owned();
        if let Some(token) = &request_token {
            push_separator(&mut url);
            url.push_str(TOKEN_PARAM);
            url.push('=');
            url.push_str(&percent_encode(&token.token));
        }
        push_separator(&mut url);
        url.push_str(CALLBACK_PARAM);
        url.push('=');
        url.push_str(callback);

        *flow = Flow::AuthorizationPending(request_token);
        info!(provider = %provider.name(), "authorization pending");
        Ok(url)
    }

    /// Exchanges the callback token (and verifier, if the container sent one)
    /// for an access token. The request token is discarded on success.
    ///
    /// # Errors
    ///
    /// [`AuthError::NoPendingAuthorization`] outside the pending states,
    /// [`AuthError::MissingEndpoint`] without an access-token URL, or any
    /// failure of the token call. The state is unchanged on error.
    pub async fn exchange_access_token(
        &self,
        provider: &Provider,
        token: &str,
        verifier: Option<&str>,
    ) -> Result<TokenPair, AuthError> {
        let endpoint = provider
            .access_token_url()
            .ok_or(AuthError::MissingEndpoint("access token"))?;

        let mut flow = self.flow.lock().await;
        if !matches!(*flow, Flow::RequestTokenIssued(_) | Flow::AuthorizationPending(_)) {
            return Err(AuthError::NoPendingAuthorization);
        }
        let secret = flow
            .request_token()
            .map(|t| t.secret.clone())
            .unwrap_or_default();

        let extra: Vec<(String, String)> = verifier
            .map(|v| vec![(VERIFIER_PARAM.to_owned(), v.to_owned())])
            .unwrap_or_default();
        let message = self.signer.sign(
            HttpMessage::new(HttpMethod::Get, endpoint),
            Some(&TokenPair::new(token, secret)),
            &extra,
            false,
        )?;

        let access = self.call_token_endpoint(message).await?;
        *flow = Flow::AccessTokenIssued(access.clone());
        info!(provider = %provider.name(), "access token issued");
        Ok(access)
    }

    /// Clears every token and returns to `Unauthenticated`.
    pub async fn reset(&self) {
        *self.flow.lock().await = Flow::Unauthenticated;
    }

    pub async fn access_token(&self) -> Option<TokenPair> {
        match &*self.flow.lock().await {
            Flow::AccessTokenIssued(token) => Some(token.clone()),
            _ => None,
        }
    }

    /// Installs a persisted access token, skipping the authorization flow.
    pub async fn set_access_token(&self, token: TokenPair) {
        *self.flow.lock().await = Flow::AccessTokenIssued(token);
    }

    /// The pending request token, if the flow is waiting for authorization.
    pub async fn request_token(&self) -> Option<TokenPair> {
        self.flow.lock().await.request_token().cloned()
    }

    /// Reloads a persisted request token so the flow can be completed.
    pub async fn set_request_token(&self, token: TokenPair) {
        *self.flow.lock().await = Flow::RequestTokenIssued(token);
    }

    async fn fetch_request_token(
        &self,
        provider: &Provider,
        endpoint: &str,
    ) -> Result<TokenPair, AuthError> {
        let message = self.signer.sign(
            HttpMessage::new(HttpMethod::Get, endpoint),
            None,
            provider.request_token_params(),
            false,
        )?;
        self.call_token_endpoint(message).await
    }

    async fn call_token_endpoint(&self, message: HttpMessage) -> Result<TokenPair, AuthError> {
        let response = self
            .transport
            .execute(message)
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        token_from_response(&response)
    }
}

impl std::fmt::Debug for ThreeLeggedOAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreeLeggedOAuth")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

fn token_from_response(response: &HttpResponse) -> Result<TokenPair, AuthError> {
    if !response.is_success() {
        warn!(status = response.status, "token endpoint rejected the call");
        return Err(AuthError::TokenExchange {
            status: response.status,
            message: response.body.clone(),
        });
    }

    let pairs = parse_form(&response.body);
    let find = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    };
    match (find(TOKEN_PARAM), find(TOKEN_SECRET_PARAM)) {
        (Some(token), Some(secret)) => Ok(TokenPair { token, secret }),
        _ => Err(AuthError::MalformedTokenResponse(format!(
            "expected {TOKEN_PARAM} and {TOKEN_SECRET_PARAM}"
        ))),
    }
}

#[async_trait]
impl AuthScheme for ThreeLeggedOAuth {
    fn name(&self) -> &'static str {
        "oauth-3-legged"
    }

    async fn sign(
        &self,
        provider: &Provider,
        message: HttpMessage,
    ) -> Result<HttpMessage, AuthError> {
        let token = match &*self.flow.lock().await {
            Flow::AccessTokenIssued(token) => token.clone(),
            _ => return Err(AuthError::NotAuthenticated),
        };
        self.signer.sign(message, Some(&token), &[], provider.sign_body_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_response_in_any_order() {
        let response = HttpResponse::new(200, "oauth_token_secret=S&oauth_token=T&x=1");
        assert_eq!(token_from_response(&response).unwrap(), TokenPair::new("T", "S"));
    }

    #[test]
    fn incomplete_token_response_is_malformed() {
        let response = HttpResponse::new(200, "oauth_token=T");
        assert!(matches!(
            token_from_response(&response),
            Err(AuthError::MalformedTokenResponse(_))
        ));
    }

    #[test]
    fn rejected_token_call_carries_status() {
        let response = HttpResponse::new(401, "signature_invalid");
        assert_eq!(
            token_from_response(&response).unwrap_err(),
            AuthError::TokenExchange {
                status: 401,
                message: "signature_invalid".into()
            }
        );
    }
}
