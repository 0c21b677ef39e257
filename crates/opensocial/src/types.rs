//! Shared value types for the dispatch core.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! values with invariants (a version has numeric components, a method is one
//! of four verbs) and participate in dispatch decisions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// OpenSocial protocol version spoken by a container (e.g. `0.8`, `0.9`).
///
/// The parser uses it to pick the preferred payload key of JSON-RPC entries:
/// containers below `2.0` answer with `data`, `2.0` and later with `result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProtocolVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl ProtocolVersion {
    /// Version assumed when a provider does not declare one.
    pub const DEFAULT: Self = Self::new(0, 8);

    /// Creates a new [`ProtocolVersion`].
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Key under which a JSON-RPC entry carries its payload for this version.
    pub fn rpc_payload_key(self) -> &'static str {
        if self.major >= 2 {
            "result"
        } else {
            "data"
        }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ProtocolVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (major, minor) = s.trim().split_once('.').unwrap_or((s.trim(), "0"));
        let major = major
            .parse()
            .map_err(|_| format!("invalid protocol version '{s}'"))?;
        let minor = minor
            .parse()
            .map_err(|_| format!("invalid protocol version '{s}'"))?;
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for ProtocolVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProtocolVersion> for String {
    fn from(value: ProtocolVersion) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// HTTP method
// ---------------------------------------------------------------------------

/// HTTP verb of a REST call. RPC calls are always [`HttpMethod::Post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read.
    #[default]
    Get,
    /// Create.
    Post,
    /// Update.
    Put,
    /// Remove.
    Delete,
}

impl HttpMethod {
    /// Upper-case verb as sent on the wire and used in OAuth base strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
