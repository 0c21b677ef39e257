//! Core domain for the OpenSocial client.
//!
//! This crate holds every concept shared by the client stack: the URL builder,
//! the field model and its typed views, requests and responses, container
//! descriptors, response parsing, and the error taxonomy. Infrastructure
//! crates implement the port traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no network I/O.
//! It defines *what* a dispatch needs; `auth`, `transport`, and `dispatch`
//! define *how* it is signed, carried, and orchestrated.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`url`] | [`OpenSocialUrl`] builder |
//! | [`model`] | [`Field`], [`Object`], the [`Model`] trait and typed views |
//! | [`request`] | [`Request`] and its template resolution |
//! | [`response`] | [`Response`], [`BatchResponse`], metadata |
//! | [`provider`] | [`Provider`] descriptors, builder, presets, config |
//! | [`parser`] | [`Parser`] trait and the JSON implementation |
//! | [`services`] | Request factories for the standard services |
//! | [`http`] | Transport-neutral HTTP message types |
//! | [`ports`] | [`HttpTransport`] and [`AuthScheme`] traits |
//! | [`identifiers`] | Newtype identifiers |
//! | [`types`] | [`ProtocolVersion`], [`HttpMethod`] |
//! | [`errors`] | Error taxonomy and [`RetryPolicy`] |

pub mod errors;
pub mod http;
pub mod identifiers;
pub mod model;
pub mod parser;
pub mod ports;
pub mod provider;
pub mod request;
pub mod response;
pub mod services;
pub mod types;
pub mod url;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{
    AuthError, BuildError, ClientError, ModelError, PartialBatchError, ProtocolError, RetryPolicy,
    TransportError,
};
pub use http::{HttpMessage, HttpResponse, CONTENT_TYPE};
pub use identifiers::{ContainerName, CorrelationId};
pub use model::{
    Activity, Album, AppData, Comment, Field, FieldValue, MediaItem, Model, ModelKind,
    Notification, Object, Person, StatusMood,
};
pub use parser::{parser_for, JsonParser, Parser};
pub use ports::{AuthScheme, HttpTransport};
pub use provider::{Provider, ProviderBuilder, ProviderConfig, DEFAULT_CONTENT_TYPE};
pub use request::{Component, Request};
pub use response::{BatchResponse, Response, ResponseMetadata};
pub use types::{HttpMethod, ProtocolVersion};
pub use url::OpenSocialUrl;
