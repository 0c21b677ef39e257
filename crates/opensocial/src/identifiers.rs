//! Newtype domain identifiers.
//!
//! Identity-bearing strings are wrapped in distinct newtypes so that a
//! [`CorrelationId`] cannot be passed where a [`ContainerName`] is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Links one batched sub-request to its sub-response.
    ///
    /// Chosen by the caller (the batch key) or generated with
    /// [`CorrelationId::new_random`] for single sends.
    CorrelationId
}

impl CorrelationId {
    /// Generates a fresh random correlation id.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

string_id! {
    /// Human-readable name of a container integration (e.g. `"orkut"`).
    ///
    /// Used for logging and diagnostics only; never sent over the wire.
    ContainerName
}

impl ContainerName {
    /// Wraps a name known to be non-empty (compiled-in presets).
    pub(crate) fn from_trusted(value: String) -> Self {
        debug_assert!(!value.is_empty());
        Self(value)
    }
}
