//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use transport::TransportConfig;

pub const ENV_HTTP_TIMEOUT_SECS: &str = "OPENSOCIAL_HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_CONNECT_TIMEOUT_SECS: &str = "OPENSOCIAL_HTTP_CONNECT_TIMEOUT_SECS";
pub const ENV_BATCH_TIMEOUT_MS: &str = "OPENSOCIAL_BATCH_TIMEOUT_MS";
pub const ENV_USER_AGENT: &str = "OPENSOCIAL_USER_AGENT";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Timeouts and identification for a [`crate::Client`].
///
/// `batch_timeout_ms` bounds a whole `send_batch` call; entries still
/// running at the deadline fail with a timeout. `None` waits for every entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub http_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub batch_timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            batch_timeout_ms: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Reads the `OPENSOCIAL_*` environment variables. Unset or unparseable
    /// values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            http_timeout_secs: parse_var(&lookup, ENV_HTTP_TIMEOUT_SECS)
                .unwrap_or(defaults.http_timeout_secs),
            connect_timeout_secs: parse_var(&lookup, ENV_HTTP_CONNECT_TIMEOUT_SECS)
                .unwrap_or(defaults.connect_timeout_secs),
            batch_timeout_ms: parse_var(&lookup, ENV_BATCH_TIMEOUT_MS),
            user_agent: lookup(ENV_USER_AGENT).filter(|agent| !agent.is_empty()),
        }
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_ms.map(Duration::from_millis)
    }

    /// Settings for the reqwest transport.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.http_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}
