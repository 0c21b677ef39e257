//! Authentication schemes for OpenSocial containers.
//!
//! Implements the [`opensocial::AuthScheme`] port. Every scheme adds its
//! credentials to the request URL; headers and bodies are left untouched.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Signing and token exchange only. The three-legged
//! scheme reaches token endpoints through an injected
//! [`opensocial::HttpTransport`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | [`ConsumerCredentials`], [`TokenPair`], [`ConfigError`] |
//! | [`oauth`] | [`OAuthSigner`] (OAuth 1.0a HMAC-SHA1) and nonce sources |
//! | [`two_legged`] | [`TwoLeggedOAuth`] |
//! | [`three_legged`] | [`ThreeLeggedOAuth`] and its [`FlowState`] |
//! | [`security_token`] | [`SecurityToken`] (`st=`) |
//! | [`fc_auth`] | [`FcAuth`] (`fcauth=`) |

pub mod config;
pub mod fc_auth;
pub mod oauth;
mod params;
pub mod security_token;
pub mod three_legged;
pub mod two_legged;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{ConfigError, ConsumerCredentials, TokenPair};
pub use fc_auth::FcAuth;
pub use oauth::{FixedNonceSource, NonceSource, OAuthSigner, SystemNonceSource};
pub use security_token::SecurityToken;
pub use three_legged::{FlowState, ThreeLeggedOAuth};
pub use two_legged::TwoLeggedOAuth;
