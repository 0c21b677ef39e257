//! Dispatch orchestration.
//!
//! A single send runs: pre-request hook, route selection (JSON-RPC when the
//! provider has an RPC endpoint and the request an RPC method, REST
//! otherwise), message construction, signing, execution, parsing, and the
//! post-request hook.
//!
//! RPC bodies are always JSON arrays, a single send included. A batch send
//! routes each entry the same way. RPC entries travel together in a single
//! POST; REST entries fan out concurrently.
//! Every input key gets an output entry and a failure never aborts its
//! siblings.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use opensocial::{
    parser_for, AuthScheme, BatchResponse, BuildError, ClientError, CorrelationId, HttpMessage,
    HttpMethod, HttpResponse, HttpTransport, ModelKind, Parser, ProtocolError, Provider,
    Request, Response, TransportError, CONTENT_TYPE,
};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use transport::ReqwestTransport;

use crate::config::ClientConfig;

/// Where one request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route<'a> {
    Rpc(&'a str),
    Rest(&'a str),
}

/// Sends requests to one container.
///
/// Cheap to clone; the provider, auth scheme, and transport are shared.
#[derive(Clone)]
pub struct Client {
    provider: Arc<Provider>,
    auth: Arc<dyn AuthScheme>,
    transport: Arc<dyn HttpTransport>,
    config: ClientConfig,
}

impl Client {
    pub fn new(
        provider: impl Into<Arc<Provider>>,
        auth: Arc<dyn AuthScheme>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            provider: provider.into(),
            auth,
            transport,
            config: ClientConfig::default(),
        }
    }

    /// A client over a [`ReqwestTransport`] built from `config`.
    ///
    /// # Errors
    ///
    /// [`TransportError::Io`] if the HTTP client cannot be built.
    pub fn with_reqwest(
        provider: impl Into<Arc<Provider>>,
        auth: Arc<dyn AuthScheme>,
        config: ClientConfig,
    ) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config.transport_config())?;
        Ok(Self::new(provider, auth, Arc::new(transport)).with_config(config))
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Single send
    // -----------------------------------------------------------------------

    /// Sends one request and returns its parsed response.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Build`] for a malformed request or an unroutable
    ///   provider; nothing is sent.
    /// - [`ClientError::Auth`] when signing fails; nothing is sent.
    /// - [`ClientError::Transport`] for I/O failures and non-2xx statuses
    ///   without a container error body.
    /// - [`ClientError::Protocol`] for undecodable bodies.
    /// - [`ClientError::Remote`] when the container answers with an error.
    #[instrument(
        skip(self, request),
        fields(provider = %self.provider.name(), rpc = request.rpc_method())
    )]
    pub async fn send(&self, mut request: Request) -> Result<Response, ClientError> {
        self.provider.pre_request(&mut request);
        let parser = parser_for(self.provider.content_type())?;

        let response = match self.route(&request)? {
            Route::Rpc(url) => {
                let id = request
                    .id()
                    .cloned()
                    .unwrap_or_else(CorrelationId::new_random);
                let entry = request
                    .rpc_entry(id.as_str())
                    .ok_or_else(|| self.missing_rpc_method())?;
                let models = BTreeMap::from([(id.as_str().to_owned(), request.model())]);

                let payload = Value::Array(vec![entry]);
                let mut parsed = self.dispatch_rpc(url, &payload, &models, parser).await?;
                let response = parsed
                    .remove(id.as_str())
                    .ok_or_else(|| ProtocolError::MissingResponse {
                        id: id.as_str().to_owned(),
                    })?;
                self.provider.post_request(&request, &response);
                response
            }
            Route::Rest(endpoint) => self.dispatch_rest(&request, endpoint, parser).await?,
        };

        match response.error() {
            Some(error) => {
                warn!(error = %error, "Container reported an error");
                Err(error.clone())
            }
            None => {
                debug!(entries = response.objects().len(), "Request complete");
                Ok(response)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Batch send
    // -----------------------------------------------------------------------

    /// Sends every request and returns one response per key, failures
    /// included.
    ///
    /// Each key becomes its request's correlation id unless the request
    /// already carries one. With a batch timeout configured, entries still
    /// in flight at the deadline fail with [`TransportError::Timeout`].
    ///
    /// # Errors
    ///
    /// Only whole-batch problems are errors: an empty batch or a provider
    /// content type no parser understands. Everything else is attributed to
    /// its key.
    #[instrument(
        skip(self, requests),
        fields(provider = %self.provider.name(), size = requests.len())
    )]
    pub async fn send_batch(
        &self,
        requests: BTreeMap<String, Request>,
    ) -> Result<BatchResponse, ClientError> {
        if requests.is_empty() {
            return Err(BuildError::EmptyBatch.into());
        }
        let parser = parser_for(self.provider.content_type())?;
        let deadline = self.config.batch_timeout().map(|d| Instant::now() + d);

        let mut results = BatchResponse::new();
        let mut seen = HashSet::new();
        let mut rpc: Vec<(String, Request)> = Vec::new();
        let mut rpc_url = None;
        let mut rest: Vec<(String, Request, &str)> = Vec::new();

        for (key, mut request) in requests {
            self.provider.pre_request(&mut request);
            let id = request
                .id()
                .cloned()
                .or_else(|| CorrelationId::new(key.as_str()))
                .unwrap_or_else(CorrelationId::new_random);
            request.set_id(id.clone());

            if !seen.insert(id.clone()) {
                let error = BuildError::DuplicateCorrelationId(id.to_string());
                results.insert(key, Response::failure(Some(id), request.model(), error.into()));
                continue;
            }

            match self.route(&request) {
                Ok(Route::Rpc(url)) => {
                    rpc_url = Some(url);
                    rpc.push((key, request));
                }
                Ok(Route::Rest(endpoint)) => rest.push((key, request, endpoint)),
                Err(error) => {
                    results.insert(key, Response::failure(Some(id), request.model(), error.into()));
                }
            }
        }

        debug!(rpc = rpc.len(), rest = rest.len(), "Batch routed");

        let rpc_batch = async {
            let Some(url) = rpc_url else {
                return Vec::new();
            };
            match with_deadline(deadline, self.dispatch_rpc_batch(url, &rpc, parser)).await {
                Ok(responses) => responses,
                Err(error) => rpc
                    .iter()
                    .map(|(key, request)| {
                        let response =
                            Response::failure(request.id().cloned(), request.model(), error.clone());
                        (key.clone(), response)
                    })
                    .collect(),
            }
        };
        let rest_batch = join_all(rest.iter().map(|(key, request, endpoint)| async move {
            let outcome =
                with_deadline(deadline, self.dispatch_rest(request, endpoint, parser)).await;
            let response = outcome.unwrap_or_else(|error| {
                Response::failure(request.id().cloned(), request.model(), error)
            });
            (key.clone(), response)
        }));
        let (rpc_results, rest_results) = tokio::join!(rpc_batch, rest_batch);

        results.extend(rpc_results);
        results.extend(rest_results);

        match results.partial_failure() {
            Some(failure) => warn!(failed = failure.failed.len(), "{failure}"),
            None => info!("Batch complete"),
        }
        Ok(results)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn route<'a>(&'a self, request: &Request) -> Result<Route<'a>, BuildError> {
        if let (Some(rpc), Some(_)) = (self.provider.rpc_endpoint(), request.rpc_method()) {
            return Ok(Route::Rpc(rpc.trim_end_matches('/')));
        }
        match self.provider.rest_endpoint() {
            Some(rest) => Ok(Route::Rest(rest)),
            None if self.provider.rpc_endpoint().is_some() => Err(self.missing_rpc_method()),
            None => Err(BuildError::NoEndpoint {
                provider: self.provider.name().to_string(),
            }),
        }
    }

    fn missing_rpc_method(&self) -> BuildError {
        BuildError::MissingRpcMethod {
            provider: self.provider.name().to_string(),
        }
    }

    /// One REST call, parsed and passed through the post-request hook.
    async fn dispatch_rest(
        &self,
        request: &Request,
        endpoint: &str,
        parser: &dyn Parser,
    ) -> Result<Response, ClientError> {
        let url = request.build_rest_url(endpoint)?;
        let body = request.rest_body()?;
        let mut message = HttpMessage::new(request.rest_method(), url);
        if body.is_some() {
            let content_type = request
                .custom_content_type()
                .unwrap_or(self.provider.content_type());
            message = message.with_header(CONTENT_TYPE, content_type);
        }
        let message = message.with_body(body);

        let http = self.execute(message, parser).await?;
        let response = parser
            .parse(&http.body, request.model(), self.provider.version())?
            .with_id(request.id().cloned());
        self.provider.post_request(request, &response);
        Ok(response)
    }

    /// One JSON-RPC POST carrying `payload`, always an array of entries.
    async fn dispatch_rpc(
        &self,
        url: &str,
        payload: &Value,
        models: &BTreeMap<String, ModelKind>,
        parser: &dyn Parser,
    ) -> Result<BTreeMap<String, Response>, ClientError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| BuildError::Serialization(e.to_string()))?;
        let message = HttpMessage::new(HttpMethod::Post, url)
            .with_header(CONTENT_TYPE, self.provider.content_type())
            .with_body(Some(body));

        let http = self.execute(message, parser).await?;
        Ok(parser.parse_batch(&http.body, models, self.provider.version())?)
    }

    /// The RPC half of a batch, keyed by batch key. A failure of the shared
    /// call is attributed to every entry.
    async fn dispatch_rpc_batch(
        &self,
        url: &str,
        requests: &[(String, Request)],
        parser: &dyn Parser,
    ) -> Result<Vec<(String, Response)>, ClientError> {
        let mut entries = Vec::with_capacity(requests.len());
        let mut models = BTreeMap::new();
        for (_, request) in requests {
            let id = correlation_id(request);
            entries.extend(request.rpc_entry(id));
            models.insert(id.to_owned(), request.model());
        }

        let mut parsed = self
            .dispatch_rpc(url, &Value::Array(entries), &models, parser)
            .await?;

        Ok(requests
            .iter()
            .map(|(key, request)| {
                let id = correlation_id(request);
                let response = parsed.remove(id).unwrap_or_else(|| {
                    let error = ProtocolError::MissingResponse { id: id.to_owned() };
                    Response::failure(request.id().cloned(), request.model(), error.into())
                });
                self.provider.post_request(request, &response);
                (key.clone(), response)
            })
            .collect())
    }

    /// Signs and executes `message`. Non-2xx statuses become errors: the
    /// container's error entry when the body has one, the status otherwise.
    async fn execute(
        &self,
        message: HttpMessage,
        parser: &dyn Parser,
    ) -> Result<HttpResponse, ClientError> {
        let signed = self.auth.sign(&self.provider, message).await?;
        debug!(
            scheme = self.auth.name(),
            method = signed.method.as_str(),
            "Executing request"
        );

        let response = self.transport.execute(signed).await?;
        if response.is_success() {
            return Ok(response);
        }

        warn!(status = response.status, "Container returned an error status");
        let error = match parser.parse_error(&response.body) {
            Some(ClientError::Remote { code: 0, message }) => ClientError::Remote {
                code: i64::from(response.status),
                message,
            },
            Some(error) => error,
            None => TransportError::Status {
                status: response.status,
                body: response.body,
            }
            .into(),
        };
        Err(error)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("provider", &self.provider)
            .field("auth", &self.auth.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Batch entries always carry an id once routed.
fn correlation_id(request: &Request) -> &str {
    request.id().map(CorrelationId::as_str).unwrap_or_default()
}

/// Runs `future` until `deadline`, failing with a timeout once it passes.
async fn with_deadline<T>(
    deadline: Option<Instant>,
    future: impl std::future::Future<Output = Result<T, ClientError>>,
) -> Result<T, ClientError> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, future)
            .await
            .unwrap_or_else(|_| Err(TransportError::Timeout.into())),
        None => future.await,
    }
}
