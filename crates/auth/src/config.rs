//! Credential configuration.
//!
//! Credentials are always injected by the application. Nothing here is
//! compiled in, and secrets never appear in `Debug` output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable suffix for the consumer key.
pub const CONSUMER_KEY_SUFFIX: &str = "_CONSUMER_KEY";
/// Environment variable suffix for the consumer secret.
pub const CONSUMER_SECRET_SUFFIX: &str = "_CONSUMER_SECRET";

/// Configuration could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or not valid unicode.
    #[error("environment variable {0} is not set")]
    MissingVariable(String),
}

// ---------------------------------------------------------------------------
// Consumer credentials
// ---------------------------------------------------------------------------

/// OAuth consumer key and secret issued by a container.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerCredentials {
    key: String,
    secret: String,
}

impl ConsumerCredentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Reads `{prefix}_CONSUMER_KEY` and `{prefix}_CONSUMER_SECRET`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingVariable`] naming the first variable not set.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let key = read_var(&format!("{prefix}{CONSUMER_KEY_SUFFIX}"))?;
        let secret = read_var(&format!("{prefix}{CONSUMER_SECRET_SUFFIX}"))?;
        Ok(Self { key, secret })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn read_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVariable(name.to_owned()))
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// An OAuth token with its secret (request token or access token).
///
/// Serializable so an external layer can persist and reload it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub token: String,
    pub secret: String,
}

impl TokenPair {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .finish()
    }
}
