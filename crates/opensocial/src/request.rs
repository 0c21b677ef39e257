//! Protocol-agnostic description of one API call.
//!
//! A [`Request`] carries everything needed to render either wire form:
//!
//! - REST: a path template whose `{placeholder}` segments are resolved from
//!   the request's components, plus query parameters and an optional body.
//! - JSON-RPC: a method name and a `params` object built from the same
//!   components plus explicit RPC parameters.
//!
//! Rendering never performs I/O; the dispatch crate decides which form to use.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::errors::BuildError;
use crate::identifiers::CorrelationId;
use crate::model::{Model, ModelKind, Object};
use crate::types::HttpMethod;
use crate::url::OpenSocialUrl;

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// A named path component that can fill a REST template placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    Guid,
    Selector,
    Pid,
    AppId,
    GroupId,
    AlbumId,
    ItemId,
    ActivityId,
    MoodId,
    FriendId,
}

impl Component {
    const ALL: [Self; 10] = [
        Self::Guid,
        Self::Selector,
        Self::Pid,
        Self::AppId,
        Self::GroupId,
        Self::AlbumId,
        Self::ItemId,
        Self::ActivityId,
        Self::MoodId,
        Self::FriendId,
    ];

    /// Placeholder name as written in templates, without braces.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Guid => "guid",
            Self::Selector => "selector",
            Self::Pid => "pid",
            Self::AppId => "appid",
            Self::GroupId => "groupId",
            Self::AlbumId => "albumId",
            Self::ItemId => "itemId",
            Self::ActivityId => "activityid",
            Self::MoodId => "moodId",
            Self::FriendId => "friendId",
        }
    }

    pub fn from_placeholder(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.placeholder() == name)
    }
}

/// Placeholder that renders as the literal segment `history` when the
/// request's history flag is set.
const HISTORY_PLACEHOLDER: &str = "history";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One API call, renderable as a REST call or a JSON-RPC entry.
///
/// Setters return `&mut Self` for chaining. Adders that take a parameter key
/// reject empty keys with [`BuildError::EmptyParameterKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    rest_template: String,
    rpc_method: Option<String>,
    rest_method: HttpMethod,
    components: BTreeMap<Component, String>,
    history: bool,
    rpc_params: Map<String, Value>,
    rest_payload: Map<String, Value>,
    raw_payload: Option<String>,
    custom_content_type: Option<String>,
    query: Vec<(String, String)>,
    model: ModelKind,
    id: Option<CorrelationId>,
}

impl Request {
    /// Creates a request that can be sent over REST or JSON-RPC.
    pub fn new(
        rest_template: impl Into<String>,
        rpc_method: impl Into<String>,
        rest_method: HttpMethod,
    ) -> Self {
        let mut request = Self::rest(rest_template, rest_method);
        request.rpc_method = Some(rpc_method.into());
        request
    }

    /// Creates a REST-only request (no JSON-RPC method).
    pub fn rest(rest_template: impl Into<String>, rest_method: HttpMethod) -> Self {
        Self {
            rest_template: rest_template.into(),
            rpc_method: None,
            rest_method,
            components: BTreeMap::new(),
            history: false,
            rpc_params: Map::new(),
            rest_payload: Map::new(),
            raw_payload: None,
            custom_content_type: None,
            query: Vec::new(),
            model: ModelKind::Generic,
            id: None,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn rest_template(&self) -> &str {
        &self.rest_template
    }

    pub fn rpc_method(&self) -> Option<&str> {
        self.rpc_method.as_deref()
    }

    pub fn rest_method(&self) -> HttpMethod {
        self.rest_method
    }

    pub fn component(&self, component: Component) -> Option<&str> {
        self.components.get(&component).map(String::as_str)
    }

    pub fn guid(&self) -> Option<&str> {
        self.component(Component::Guid)
    }

    pub fn selector(&self) -> Option<&str> {
        self.component(Component::Selector)
    }

    pub fn pid(&self) -> Option<&str> {
        self.component(Component::Pid)
    }

    pub fn app_id(&self) -> Option<&str> {
        self.component(Component::AppId)
    }

    pub fn group_id(&self) -> Option<&str> {
        self.component(Component::GroupId)
    }

    pub fn history(&self) -> bool {
        self.history
    }

    pub fn rpc_parameters(&self) -> &Map<String, Value> {
        &self.rpc_params
    }

    pub fn rest_payload_parameters(&self) -> &Map<String, Value> {
        &self.rest_payload
    }

    pub fn raw_payload(&self) -> Option<&str> {
        self.raw_payload.as_deref()
    }

    /// Content type overriding the provider's for this request's REST call.
    pub fn custom_content_type(&self) -> Option<&str> {
        self.custom_content_type.as_deref()
    }

    pub fn query_parameters(&self) -> &[(String, String)] {
        &self.query
    }

    /// Entity kind expected in the response.
    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn id(&self) -> Option<&CorrelationId> {
        self.id.as_ref()
    }

    // -- setters ------------------------------------------------------------

    /// Replaces the REST path template. Providers use this from their
    /// pre-request hook to apply a container-specific layout.
    pub fn set_rest_template(&mut self, template: impl Into<String>) -> &mut Self {
        self.rest_template = template.into();
        self
    }

    pub fn set_component(&mut self, component: Component, value: impl Into<String>) -> &mut Self {
        self.components.insert(component, value.into());
        self
    }

    pub fn clear_component(&mut self, component: Component) -> &mut Self {
        self.components.remove(&component);
        self
    }

    pub fn set_guid(&mut self, guid: impl Into<String>) -> &mut Self {
        self.set_component(Component::Guid, guid)
    }

    pub fn set_selector(&mut self, selector: impl Into<String>) -> &mut Self {
        self.set_component(Component::Selector, selector)
    }

    pub fn set_pid(&mut self, pid: impl Into<String>) -> &mut Self {
        self.set_component(Component::Pid, pid)
    }

    pub fn set_app_id(&mut self, app_id: impl Into<String>) -> &mut Self {
        self.set_component(Component::AppId, app_id)
    }

    pub fn set_group_id(&mut self, group_id: impl Into<String>) -> &mut Self {
        self.set_component(Component::GroupId, group_id)
    }

    pub fn set_album_id(&mut self, album_id: impl Into<String>) -> &mut Self {
        self.set_component(Component::AlbumId, album_id)
    }

    pub fn set_item_id(&mut self, item_id: impl Into<String>) -> &mut Self {
        self.set_component(Component::ItemId, item_id)
    }

    pub fn set_activity_id(&mut self, activity_id: impl Into<String>) -> &mut Self {
        self.set_component(Component::ActivityId, activity_id)
    }

    pub fn set_mood_id(&mut self, mood_id: impl Into<String>) -> &mut Self {
        self.set_component(Component::MoodId, mood_id)
    }

    pub fn set_friend_id(&mut self, friend_id: impl Into<String>) -> &mut Self {
        self.set_component(Component::FriendId, friend_id)
    }

    pub fn set_history(&mut self, history: bool) -> &mut Self {
        self.history = history;
        self
    }

    pub fn set_model(&mut self, model: ModelKind) -> &mut Self {
        self.model = model;
        self
    }

    /// Records `T` as the expected response entity.
    pub fn expect<T: Model>(&mut self) -> &mut Self {
        self.set_model(T::KIND)
    }

    pub fn set_id(&mut self, id: CorrelationId) -> &mut Self {
        self.id = Some(id);
        self
    }

    pub fn add_rpc_parameter(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, BuildError> {
        let key = non_empty(key.into())?;
        self.rpc_params.insert(key, value.into());
        Ok(self)
    }

    pub fn add_rest_payload_parameter(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, BuildError> {
        let key = non_empty(key.into())?;
        self.rest_payload.insert(key, value.into());
        Ok(self)
    }

    /// Replaces the REST body parameters with the fields of `object`.
    pub fn set_rest_payload_object(&mut self, object: &Object) -> &mut Self {
        self.rest_payload = match object.to_json() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Sends `body` verbatim as the REST body, with its own content type.
    pub fn set_raw_payload(
        &mut self,
        body: impl Into<String>,
        content_type: impl Into<String>,
    ) -> &mut Self {
        self.raw_payload = Some(body.into());
        self.custom_content_type = Some(content_type.into());
        self
    }

    pub fn add_query_parameter(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, BuildError> {
        let key = non_empty(key.into())?;
        self.query.push((key, value.into()));
        Ok(self)
    }

    // -- rendering ----------------------------------------------------------

    /// Resolves the REST template against `endpoint` and appends the query
    /// parameters.
    ///
    /// `{guid}` must resolve. Other known placeholders without a value are
    /// dropped from the path; unknown placeholders are rejected.
    pub fn build_rest_url(&self, endpoint: &str) -> Result<String, BuildError> {
        let mut url = OpenSocialUrl::new(endpoint);

        for segment in self.rest_template.split('/').filter(|s| !s.is_empty()) {
            let Some(tag) = segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            else {
                url.add_path_component(segment);
                continue;
            };

            if tag == HISTORY_PLACEHOLDER {
                if self.history {
                    url.add_path_component(HISTORY_PLACEHOLDER);
                }
                continue;
            }

            let component =
                Component::from_placeholder(tag).ok_or_else(|| BuildError::UnknownPlaceholder {
                    placeholder: tag.to_owned(),
                    template: self.rest_template.clone(),
                })?;

            match self.components.get(&component) {
                Some(value) => {
                    url.add_path_component(value.as_str());
                }
                None if component == Component::Guid => {
                    return Err(BuildError::UnresolvedPlaceholder {
                        placeholder: tag.to_owned(),
                        template: self.rest_template.clone(),
                    });
                }
                None => {}
            }
        }

        for (name, value) in &self.query {
            url.add_query_string_parameter(name.as_str(), value.as_str());
        }

        Ok(url.to_string())
    }

    /// REST body: the raw payload if set, otherwise the JSON object of REST
    /// payload parameters, or `None` when there are none.
    pub fn rest_body(&self) -> Result<Option<String>, BuildError> {
        if let Some(raw) = &self.raw_payload {
            return Ok(Some(raw.clone()));
        }
        if self.rest_payload.is_empty() {
            return Ok(None);
        }
        serde_json::to_string(&self.rest_payload)
            .map(Some)
            .map_err(|e| BuildError::Serialization(e.to_string()))
    }

    /// JSON-RPC `params` object: `appId`, `userId` (guid), `groupId`
    /// (selector, else group id), then the explicit RPC parameters.
    pub fn rpc_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        if let Some(app_id) = self.app_id() {
            params.insert("appId".into(), app_id.into());
        }
        if let Some(guid) = self.guid() {
            params.insert("userId".into(), guid.into());
        }
        if let Some(group) = self.selector().or(self.group_id()) {
            params.insert("groupId".into(), group.into());
        }
        for (key, value) in &self.rpc_params {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    /// JSON-RPC entry `{id, method, params}`, or `None` for REST-only
    /// requests.
    pub fn rpc_entry(&self, id: &str) -> Option<Value> {
        let method = self.rpc_method.as_deref()?;
        let mut entry = Map::new();
        entry.insert("id".into(), id.into());
        entry.insert("method".into(), method.into());
        entry.insert("params".into(), Value::Object(self.rpc_params()));
        Some(Value::Object(entry))
    }
}

fn non_empty(key: String) -> Result<String, BuildError> {
    if key.is_empty() {
        Err(BuildError::EmptyParameterKey)
    } else {
        Ok(key)
    }
}
