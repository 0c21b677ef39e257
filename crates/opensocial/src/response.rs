//! Parsed results of single and batched dispatches.

use std::collections::BTreeMap;

use crate::errors::{ClientError, PartialBatchError};
use crate::identifiers::CorrelationId;
use crate::model::{Model, ModelKind, Object};

/// Paging and filtering metadata a container may attach to a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub start_index: Option<u64>,
    pub total_results: Option<u64>,
    pub items_per_page: Option<u64>,
    pub is_filtered: Option<bool>,
    pub status_link: Option<String>,
}

/// The outcome of one request: parsed entries on success, the error
/// otherwise. Read-only once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    id: Option<CorrelationId>,
    model: ModelKind,
    outcome: Result<Vec<Object>, ClientError>,
    metadata: ResponseMetadata,
}

impl Response {
    /// A successful response holding `entries`.
    pub fn success(id: Option<CorrelationId>, model: ModelKind, entries: Vec<Object>) -> Self {
        Self {
            id,
            model,
            outcome: Ok(entries),
            metadata: ResponseMetadata::default(),
        }
    }

    /// A failed response.
    pub fn failure(id: Option<CorrelationId>, model: ModelKind, error: ClientError) -> Self {
        Self {
            id,
            model,
            outcome: Err(error),
            metadata: ResponseMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ResponseMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attaches the correlation id this response answers.
    pub fn with_id(mut self, id: Option<CorrelationId>) -> Self {
        self.id = id;
        self
    }

    /// Correlation id this response answers.
    pub fn id(&self) -> Option<&CorrelationId> {
        self.id.as_ref()
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.outcome.as_ref().err()
    }

    /// HTTP-like status code of a failed response.
    pub fn status_code(&self) -> Option<i64> {
        self.error().and_then(ClientError::status_code)
    }

    /// Raw parsed entries; empty for failed responses.
    pub fn objects(&self) -> &[Object] {
        match &self.outcome {
            Ok(entries) => entries.as_slice(),
            Err(_) => &[],
        }
    }

    /// First entry viewed as `T`.
    pub fn entry<T: Model>(&self) -> Option<T> {
        self.objects().first().cloned().map(T::from_object)
    }

    /// All entries viewed as `T`, in response order.
    pub fn entries<T: Model>(&self) -> Vec<T> {
        self.objects().iter().cloned().map(T::from_object).collect()
    }

    pub fn metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }

    pub fn start_index(&self) -> Option<u64> {
        self.metadata.start_index
    }

    pub fn total_results(&self) -> Option<u64> {
        self.metadata.total_results
    }

    pub fn items_per_page(&self) -> Option<u64> {
        self.metadata.items_per_page
    }

    pub fn is_filtered(&self) -> Option<bool> {
        self.metadata.is_filtered
    }

    pub fn status_link(&self) -> Option<&str> {
        self.metadata.status_link.as_deref()
    }

    /// Converts to the entries or the error.
    pub fn into_result(self) -> Result<Vec<Object>, ClientError> {
        self.outcome
    }
}

/// Responses of a batch, one per input key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResponse {
    responses: BTreeMap<String, Response>,
}

impl BatchResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, response: Response) -> Option<Response> {
        self.responses.insert(key.into(), response)
    }

    pub fn get(&self, key: &str) -> Option<&Response> {
        self.responses.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Response> {
        self.responses.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.responses.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.responses.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Response)> {
        self.responses.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Summary of failed keys, or `None` when every entry succeeded.
    pub fn partial_failure(&self) -> Option<PartialBatchError> {
        let failed: Vec<(String, ClientError)> = self
            .responses
            .iter()
            .filter_map(|(key, response)| response.error().map(|e| (key.clone(), e.clone())))
            .collect();
        if failed.is_empty() {
            None
        } else {
            Some(PartialBatchError {
                failed,
                total: self.responses.len(),
            })
        }
    }
}

impl IntoIterator for BatchResponse {
    type Item = (String, Response);
    type IntoIter = std::collections::btree_map::IntoIter<String, Response>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.into_iter()
    }
}

impl Extend<(String, Response)> for BatchResponse {
    fn extend<I: IntoIterator<Item = (String, Response)>>(&mut self, iter: I) {
        self.responses.extend(iter);
    }
}

impl FromIterator<(String, Response)> for BatchResponse {
    fn from_iter<I: IntoIterator<Item = (String, Response)>>(iter: I) -> Self {
        Self {
            responses: iter.into_iter().collect(),
        }
    }
}
