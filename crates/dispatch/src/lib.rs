//! OpenSocial client orchestrator.
//!
//! [`Client`] turns [`opensocial::Request`]s into signed HTTP calls against a
//! [`opensocial::Provider`], over REST or JSON-RPC, and parses the replies.
//!
//! ## Architectural Layer
//!
//! **Orchestration.** Composes the domain crate with injected
//! [`opensocial::AuthScheme`] and [`opensocial::HttpTransport`]
//! implementations. Holds no mutable state of its own.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`client`] | [`Client`]: single and batch send |
//! | [`config`] | [`ClientConfig`] and its environment variables |

pub mod client;
pub mod config;

pub use client::Client;
pub use config::ClientConfig;
