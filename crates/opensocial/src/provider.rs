//! Container descriptors.
//!
//! A [`Provider`] is immutable configuration plus two optional hooks. It is
//! shared behind an `Arc` by every client talking to the same container and
//! never performs I/O.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::BuildError;
use crate::identifiers::ContainerName;
use crate::request::Request;
use crate::response::Response;
use crate::services::{ALL, FRIENDS, ME};
use crate::types::ProtocolVersion;

/// Content type assumed when a provider does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Runs before a request is rendered; may rewrite its components or template.
pub type PreRequestHook = Arc<dyn Fn(&mut Request) + Send + Sync>;

/// Runs after a response is parsed. Advisory only.
pub type PostRequestHook = Arc<dyn Fn(&Request, &Response) + Send + Sync>;

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Static description of one OpenSocial container.
#[derive(Clone)]
pub struct Provider {
    name: ContainerName,
    version: ProtocolVersion,
    rest_endpoint: Option<String>,
    rpc_endpoint: Option<String>,
    content_type: String,
    sign_body_hash: bool,
    request_token_url: Option<String>,
    authorize_url: Option<String>,
    access_token_url: Option<String>,
    request_token_params: Vec<(String, String)>,
    pre_request: Option<PreRequestHook>,
    post_request: Option<PostRequestHook>,
}

impl Provider {
    /// Starts building a provider called `name`.
    pub fn builder(name: impl Into<String>) -> ProviderBuilder {
        ProviderBuilder::new(name)
    }

    pub fn name(&self) -> &ContainerName {
        &self.name
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn rest_endpoint(&self) -> Option<&str> {
        self.rest_endpoint.as_deref()
    }

    /// JSON-RPC endpoint. `None` disables RPC; every call goes over REST.
    pub fn rpc_endpoint(&self) -> Option<&str> {
        self.rpc_endpoint.as_deref()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Whether OAuth signing adds `oauth_body_hash` for bodies.
    pub fn sign_body_hash(&self) -> bool {
        self.sign_body_hash
    }

    pub fn request_token_url(&self) -> Option<&str> {
        self.request_token_url.as_deref()
    }

    pub fn authorize_url(&self) -> Option<&str> {
        self.authorize_url.as_deref()
    }

    pub fn access_token_url(&self) -> Option<&str> {
        self.access_token_url.as_deref()
    }

    /// Extra parameters sent with the request-token call (e.g. `scope`).
    pub fn request_token_params(&self) -> &[(String, String)] {
        &self.request_token_params
    }

    /// Applies the pre-request hook, if any.
    pub fn pre_request(&self, request: &mut Request) {
        if let Some(hook) = &self.pre_request {
            hook(request);
        }
    }

    /// Applies the post-request hook, if any.
    pub fn post_request(&self, request: &Request, response: &Response) {
        if let Some(hook) = &self.post_request {
            hook(request, response);
        }
    }

    // -- presets ------------------------------------------------------------

    /// orkut (JSON-RPC and REST).
    pub fn orkut() -> Self {
        Self::preset("orkut")
            .rpc_endpoint("http://www.orkut.com/social/rpc/")
            .rest_endpoint("http://www.orkut.com/social/rest/")
            .finish()
    }

    /// Google's OpenSocial API. `rest_only` disables the RPC endpoint.
    ///
    /// The `scope` request-token parameter always names both endpoints so a
    /// token stays valid whichever transport is used later.
    pub fn google(rest_only: bool) -> Self {
        const REST: &str = "http://www-opensocial.googleusercontent.com/api/";
        const RPC: &str = "http://www-opensocial.googleusercontent.com/api/rpc/";

        let mut builder = Self::preset("Google")
            .rest_endpoint(REST)
            .authorize_url("https://www.google.com/accounts/OAuthAuthorizeToken")
            .access_token_url("https://www.google.com/accounts/OAuthGetAccessToken")
            .request_token_url("https://www.google.com/accounts/OAuthGetRequestToken")
            .request_token_param("scope", format!("{REST} {RPC}"));
        if !rest_only {
            builder = builder.rpc_endpoint(RPC);
        }
        builder.finish()
    }

    /// MySpace (REST only, no body hash).
    pub fn myspace() -> Self {
        Self::preset("MySpace")
            .rest_endpoint("http://opensocial.myspace.com/roa/09")
            .request_token_url("http://api.myspace.com/request_token")
            .authorize_url("http://api.myspace.com/authorize")
            .access_token_url("http://api.myspace.com/access_token")
            .sign_body_hash(false)
            .finish()
    }

    /// Plaxo contacts API (REST only, Portable Contacts layout).
    ///
    /// The pre-request hook maps `people/{guid}/{selector}` calls onto Plaxo's
    /// `{guid}/{selector}/{pid}` layout: a non-`@me` guid becomes the `pid`
    /// under `@me/@all`, and `@friends` becomes `@all`.
    pub fn plaxo() -> Self {
        Self::preset("Plaxo")
            .rest_endpoint("http://www.plaxo.com/pdata/contacts/")
            .authorize_url("http://www.plaxo.com/oauth/authorize")
            .access_token_url("http://www.plaxo.com/oauth/activate")
            .request_token_url("http://www.plaxo.com/oauth/request")
            .pre_request(plaxo_pre_request)
            .finish()
    }

    /// An Apache Shindig server at the given endpoints.
    pub fn shindig(rest_endpoint: impl Into<String>, rpc_endpoint: impl Into<String>) -> Self {
        Self::preset("shindig")
            .rest_endpoint(rest_endpoint)
            .rpc_endpoint(rpc_endpoint)
            .finish()
    }

    /// A Shindig development server on localhost with its sample OAuth
    /// provider.
    pub fn shindig_local() -> Self {
        Self::preset("localhost")
            .rest_endpoint("http://localhost:8080/social/rest/")
            .rpc_endpoint("http://localhost:8080/social/rpc/")
            .request_token_url("http://localhost:9090/oauth-provider/request_token")
            .authorize_url("http://localhost:9090/oauth-provider/authorize")
            .access_token_url("http://localhost:9090/oauth-provider/access_token")
            .finish()
    }

    fn preset(name: &'static str) -> ProviderBuilder {
        ProviderBuilder::new(name)
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("rest_endpoint", &self.rest_endpoint)
            .field("rpc_endpoint", &self.rpc_endpoint)
            .field("content_type", &self.content_type)
            .field("sign_body_hash", &self.sign_body_hash)
            .field("pre_request", &self.pre_request.is_some())
            .field("post_request", &self.post_request.is_some())
            .finish_non_exhaustive()
    }
}

fn plaxo_pre_request(request: &mut Request) {
    request.set_rest_template("{guid}/{selector}/{pid}");

    if let Some(guid) = request.guid().filter(|g| *g != ME).map(str::to_owned) {
        request.set_pid(guid).set_guid(ME).set_selector(ALL);
    }
    if request.selector() == Some(FRIENDS) {
        request.set_selector(ALL);
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`Provider`]. Unset values take their defaults: version `0.8`,
/// content type `application/json`, body hash signing on.
#[derive(Clone)]
pub struct ProviderBuilder {
    name: String,
    version: ProtocolVersion,
    rest_endpoint: Option<String>,
    rpc_endpoint: Option<String>,
    content_type: String,
    sign_body_hash: bool,
    request_token_url: Option<String>,
    authorize_url: Option<String>,
    access_token_url: Option<String>,
    request_token_params: Vec<(String, String)>,
    pre_request: Option<PreRequestHook>,
    post_request: Option<PostRequestHook>,
}

impl ProviderBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: ProtocolVersion::DEFAULT,
            rest_endpoint: None,
            rpc_endpoint: None,
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            sign_body_hash: true,
            request_token_url: None,
            authorize_url: None,
            access_token_url: None,
            request_token_params: Vec::new(),
            pre_request: None,
            post_request: None,
        }
    }

    pub fn version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    pub fn rest_endpoint(mut self, url: impl Into<String>) -> Self {
        self.rest_endpoint = Some(url.into());
        self
    }

    pub fn rpc_endpoint(mut self, url: impl Into<String>) -> Self {
        self.rpc_endpoint = Some(url.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn sign_body_hash(mut self, enabled: bool) -> Self {
        self.sign_body_hash = enabled;
        self
    }

    pub fn request_token_url(mut self, url: impl Into<String>) -> Self {
        self.request_token_url = Some(url.into());
        self
    }

    pub fn authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = Some(url.into());
        self
    }

    pub fn access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token_url = Some(url.into());
        self
    }

    pub fn request_token_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_token_params.push((name.into(), value.into()));
        self
    }

    pub fn pre_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Request) + Send + Sync + 'static,
    {
        self.pre_request = Some(Arc::new(hook));
        self
    }

    pub fn post_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request, &Response) + Send + Sync + 'static,
    {
        self.post_request = Some(Arc::new(hook));
        self
    }

    /// Builds the provider. Fails only when the name is empty.
    pub fn build(self) -> Result<Provider, BuildError> {
        let name = ContainerName::new(self.name.as_str())
            .ok_or_else(|| BuildError::Invalid("provider name must not be empty".into()))?;
        Ok(self.into_provider(name))
    }

    /// Builds a preset; preset names are non-empty literals.
    fn finish(self) -> Provider {
        let name = ContainerName::from_trusted(self.name.clone());
        self.into_provider(name)
    }

    fn into_provider(self, name: ContainerName) -> Provider {
        Provider {
            name,
            version: self.version,
            rest_endpoint: self.rest_endpoint,
            rpc_endpoint: self.rpc_endpoint,
            content_type: self.content_type,
            sign_body_hash: self.sign_body_hash,
            request_token_url: self.request_token_url,
            authorize_url: self.authorize_url,
            access_token_url: self.access_token_url,
            request_token_params: self.request_token_params,
            pre_request: self.pre_request,
            post_request: self.post_request,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Serializable provider description, e.g. loaded from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(default)]
    pub version: ProtocolVersion,
    #[serde(default)]
    pub rest_endpoint: Option<String>,
    #[serde(default)]
    pub rpc_endpoint: Option<String>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default = "default_true")]
    pub sign_body_hash: bool,
    #[serde(default)]
    pub request_token_url: Option<String>,
    #[serde(default)]
    pub authorize_url: Option<String>,
    #[serde(default)]
    pub access_token_url: Option<String>,
    #[serde(default)]
    pub request_token_params: BTreeMap<String, String>,
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_owned()
}

fn default_true() -> bool {
    true
}

impl TryFrom<ProviderConfig> for Provider {
    type Error = BuildError;

    fn try_from(config: ProviderConfig) -> Result<Self, Self::Error> {
        let mut builder = ProviderBuilder::new(config.name)
            .version(config.version)
            .content_type(config.content_type)
            .sign_body_hash(config.sign_body_hash);
        builder.rest_endpoint = config.rest_endpoint;
        builder.rpc_endpoint = config.rpc_endpoint;
        builder.request_token_url = config.request_token_url;
        builder.authorize_url = config.authorize_url;
        builder.access_token_url = config.access_token_url;
        builder.request_token_params = config.request_token_params.into_iter().collect();
        builder.build()
    }
}
