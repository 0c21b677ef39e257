//! OAuth 1.0a message signing (HMAC-SHA1, query-string parameters).
//!
//! Signed parameters are appended to the URL after any existing query, in
//! this order:
//!
//! 1. caller-supplied extra parameters (request-token parameters, verifier)
//! 2. `oauth_timestamp`, `oauth_nonce`
//! 3. `oauth_body_hash` when a body is signed
//! 4. `oauth_token` (omitted without a token), `oauth_consumer_key`,
//!    `oauth_signature_method`, `oauth_version`, `oauth_signature`
//!
//! The signature base string follows RFC 5849 §3.4.1: method, base URL, and
//! the sorted, encoded union of query and OAuth parameters.

use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use opensocial::{AuthError, HttpMessage};
use rand::Rng;
use ring::{digest, hmac};
use tracing::debug;
use url::Url;

use crate::config::{ConsumerCredentials, TokenPair};
use crate::params::{percent_encode, push_separator};

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// Timestamps and nonces
// ---------------------------------------------------------------------------

/// Supplies `oauth_timestamp` and `oauth_nonce` values.
pub trait NonceSource: Send + Sync {
    fn timestamp(&self) -> String;
    fn nonce(&self) -> String;
}

/// Wall-clock seconds and a random 64-bit nonce.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNonceSource;

impl NonceSource for SystemNonceSource {
    fn timestamp(&self) -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    fn nonce(&self) -> String {
        rand::thread_rng().gen::<u64>().to_string()
    }
}

/// Always returns the same timestamp and nonce. For reproducible signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedNonceSource {
    timestamp: String,
    nonce: String,
}

impl FixedNonceSource {
    pub fn new(timestamp: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            nonce: nonce.into(),
        }
    }
}

impl NonceSource for FixedNonceSource {
    fn timestamp(&self) -> String {
        self.timestamp.clone()
    }

    fn nonce(&self) -> String {
        self.nonce.clone()
    }
}

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// Signs messages with a consumer key/secret and an optional token.
#[derive(Clone)]
pub struct OAuthSigner {
    credentials: ConsumerCredentials,
    nonces: Arc<dyn NonceSource>,
}

impl OAuthSigner {
    pub fn new(credentials: ConsumerCredentials) -> Self {
        Self {
            credentials,
            nonces: Arc::new(SystemNonceSource),
        }
    }

    /// Replaces the timestamp/nonce source.
    pub fn with_nonce_source(mut self, source: impl NonceSource + 'static) -> Self {
        self.nonces = Arc::new(source);
        self
    }

    pub fn credentials(&self) -> &ConsumerCredentials {
        &self.credentials
    }

    /// Returns `message` with the OAuth parameters appended to its URL.
    ///
    /// `oauth_body_hash` is added only when `sign_body_hash` is set and the
    /// message has a body. The body itself is never modified.
    ///
    /// # Errors
    ///
    /// [`AuthError::Signing`] if the URL cannot be parsed.
    pub fn sign(
        &self,
        mut message: HttpMessage,
        token: Option<&TokenPair>,
        extra: &[(String, String)],
        sign_body_hash: bool,
    ) -> Result<HttpMessage, AuthError> {
        let parsed = Url::parse(&message.url).map_err(|e| AuthError::Signing(e.to_string()))?;

        let mut oauth: Vec<(String, String)> = extra.to_vec();
        oauth.push(("oauth_timestamp".into(), self.nonces.timestamp()));
        oauth.push(("oauth_nonce".into(), self.nonces.nonce()));
        if sign_body_hash {
            if let Some(body) = &message.body {
                oauth.push(("oauth_body_hash".into(), body_hash(body.as_bytes())));
            }
        }
        if let Some(token) = token.filter(|t| !t.token.is_empty()) {
            oauth.push(("oauth_token".into(), token.token.clone()));
        }
        oauth.push(("oauth_consumer_key".into(), self.credentials.key().to_owned()));
        oauth.push(("oauth_signature_method".into(), SIGNATURE_METHOD.into()));
        oauth.push(("oauth_version".into(), OAUTH_VERSION.into()));

        let base = signature_base_string(message.method.as_str(), &parsed, &oauth);
        let token_secret = token.map(|t| t.secret.as_str()).unwrap_or_default();
        let signature = hmac_sha1(self.credentials.secret(), token_secret, &base);
        oauth.push(("oauth_signature".into(), signature));

        for (name, value) in &oauth {
            push_separator(&mut message.url);
            message.url.push_str(&percent_encode(name));
            message.url.push('=');
            message.url.push_str(&percent_encode(value));
        }

        debug!(
            method = message.method.as_str(),
            has_token = token.is_some(),
            "signed OAuth message"
        );
        Ok(message)
    }
}

impl std::fmt::Debug for OAuthSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthSigner")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// `METHOD&enc(base_url)&enc(normalized_parameters)`.
pub(crate) fn signature_base_string(
    method: &str,
    url: &Url,
    oauth: &[(String, String)],
) -> String {
    let base_url = format!("{}{}", url.origin().ascii_serialization(), url.path());

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (percent_encode(&k).into_owned(), percent_encode(&v).into_owned()))
        .chain(
            oauth
                .iter()
                .map(|(k, v)| (percent_encode(k).into_owned(), percent_encode(v).into_owned())),
        )
        .collect();
    pairs.sort();

    let normalized = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(&base_url),
        percent_encode(&normalized)
    )
}

fn hmac_sha1(consumer_secret: &str, token_secret: &str, base: &str) -> String {
    let key_material = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, key_material.as_bytes());
    general_purpose::STANDARD.encode(hmac::sign(&key, base.as_bytes()).as_ref())
}

/// Base64 SHA-1 of the raw body.
pub(crate) fn body_hash(body: &[u8]) -> String {
    general_purpose::STANDARD.encode(digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, body))
}
