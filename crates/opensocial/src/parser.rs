//! Response body decoding.
//!
//! Two body shapes are understood:
//!
//! - REST: `{"entry": <object | [objects]>, "startIndex": .., ...}`, a bare
//!   array of entries, a bare entity object, or `{"error": {...}}`.
//! - JSON-RPC: an array of `{"id", "data" | "result" | "error"}` entries (or a
//!   single such object). A payload object with a `list` member is a
//!   collection; any other object is a single entry.
//!
//! An empty REST body (a `204 No Content` to a delete or update) is a success
//! with no entries. Per-entry errors become failed [`Response`]s; only a body
//! that cannot be decoded at all is a [`ProtocolError`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{ClientError, ProtocolError};
use crate::identifiers::CorrelationId;
use crate::model::{json_kind, ModelKind, Object};
use crate::response::{Response, ResponseMetadata};
use crate::types::ProtocolVersion;

/// Decodes response bodies into [`Response`]s.
pub trait Parser: Send + Sync {
    /// Parses a single REST response body.
    fn parse(
        &self,
        body: &str,
        model: ModelKind,
        version: ProtocolVersion,
    ) -> Result<Response, ProtocolError>;

    /// Parses a JSON-RPC reply and demultiplexes it by correlation id.
    ///
    /// Every key of `models` is present in the result; ids the reply does not
    /// answer carry [`ProtocolError::MissingResponse`].
    fn parse_batch(
        &self,
        body: &str,
        models: &BTreeMap<String, ModelKind>,
        version: ProtocolVersion,
    ) -> Result<BTreeMap<String, Response>, ProtocolError>;

    /// Extracts a container error from a non-2xx body, if it has one.
    fn parse_error(&self, body: &str) -> Option<ClientError>;
}

/// Returns the parser for a provider's declared content type.
pub fn parser_for(content_type: &str) -> Result<&'static dyn Parser, ProtocolError> {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if media_type == "application/json" || media_type == "text/json" || media_type.ends_with("+json")
    {
        Ok(&JsonParser)
    } else {
        Err(ProtocolError::UnsupportedContentType(content_type.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Parser for `application/json` containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(
        &self,
        body: &str,
        model: ModelKind,
        _version: ProtocolVersion,
    ) -> Result<Response, ProtocolError> {
        if body.trim().is_empty() {
            return Ok(Response::success(None, model, Vec::new()));
        }
        match decode(body)? {
            Value::Array(items) => Ok(Response::success(None, model, objects_from_list(&items)?)),
            Value::Object(map) => {
                if let Some(error) = map.get("error") {
                    return Ok(Response::failure(None, model, remote_error(error)));
                }
                match map.get("entry") {
                    Some(entry) => Ok(Response::success(None, model, objects_from(entry)?)
                        .with_metadata(metadata_from(&map))),
                    None => Ok(Response::success(
                        None,
                        model,
                        vec![Object::from_json_map(&map)?],
                    )),
                }
            }
            other => Err(ProtocolError::UnexpectedShape(format!(
                "REST body is a JSON {}",
                json_kind(&other)
            ))),
        }
    }

    fn parse_batch(
        &self,
        body: &str,
        models: &BTreeMap<String, ModelKind>,
        version: ProtocolVersion,
    ) -> Result<BTreeMap<String, Response>, ProtocolError> {
        let value = decode(body)?;
        let entries: Vec<&Value> = match &value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) if map.contains_key("id") => vec![&value],
            Value::Object(map) if map.contains_key("error") => {
                // The container rejected the whole batch.
                let error = remote_error(&map["error"]);
                return Ok(models
                    .iter()
                    .map(|(key, model)| {
                        (key.clone(), failed(key, *model, error.clone()))
                    })
                    .collect());
            }
            other => {
                return Err(ProtocolError::UnexpectedShape(format!(
                    "RPC body is a JSON {} without an id",
                    json_kind(other)
                )))
            }
        };

        let mut responses = BTreeMap::new();
        for entry in entries {
            let Some(entry) = entry.as_object() else {
                warn!(kind = json_kind(entry), "Skipping non-object RPC entry");
                continue;
            };
            let Some(id) = entry.get("id").and_then(id_text) else {
                warn!("Skipping RPC entry without an id");
                continue;
            };
            let Some(model) = models.get(&id) else {
                debug!(correlation_id = %id, "Ignoring RPC entry for unknown id");
                continue;
            };
            if responses.contains_key(&id) {
                warn!(correlation_id = %id, "Ignoring duplicate RPC entry for id");
                continue;
            }
            let response = rpc_entry(entry, &id, *model, version);
            responses.insert(id, response);
        }

        for (key, model) in models {
            if !responses.contains_key(key) {
                warn!(correlation_id = %key, "RPC reply has no entry for id");
                let error = ProtocolError::MissingResponse { id: key.clone() };
                responses.insert(key.clone(), failed(key, *model, error.into()));
            }
        }
        Ok(responses)
    }

    fn parse_error(&self, body: &str) -> Option<ClientError> {
        let value: Value = serde_json::from_str(body).ok()?;
        value.get("error").map(remote_error)
    }
}

fn decode(body: &str) -> Result<Value, ProtocolError> {
    serde_json::from_str(body).map_err(|e| ProtocolError::InvalidJson(e.to_string()))
}

fn failed(key: &str, model: ModelKind, error: ClientError) -> Response {
    Response::failure(CorrelationId::new(key), model, error)
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes one `{id, data|result|error}` entry.
fn rpc_entry(
    entry: &Map<String, Value>,
    id: &str,
    model: ModelKind,
    version: ProtocolVersion,
) -> Response {
    let correlation_id = CorrelationId::new(id);
    if let Some(error) = entry.get("error") {
        return Response::failure(correlation_id, model, remote_error(error));
    }

    let preferred = version.rpc_payload_key();
    let fallback = if preferred == "data" { "result" } else { "data" };
    let payload = entry.get(preferred).or_else(|| entry.get(fallback));

    let decoded = match payload {
        None | Some(Value::Null) => Ok((Vec::new(), ResponseMetadata::default())),
        Some(Value::Array(items)) => {
            objects_from_list(items).map(|objects| (objects, ResponseMetadata::default()))
        }
        Some(Value::Object(map)) => match map.get("list") {
            Some(list) => objects_from(list).map(|objects| (objects, metadata_from(map))),
            None => Object::from_json_map(map).map(|o| (vec![o], ResponseMetadata::default())),
        },
        Some(other) => Err(ProtocolError::UnexpectedShape(format!(
            "RPC payload is a JSON {}",
            json_kind(other)
        ))),
    };

    match decoded {
        Ok((objects, metadata)) => {
            Response::success(correlation_id, model, objects).with_metadata(metadata)
        }
        Err(error) => Response::failure(correlation_id, model, error.into()),
    }
}

fn objects_from(value: &Value) -> Result<Vec<Object>, ProtocolError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(vec![Object::from_json_map(map)?]),
        Value::Array(items) => objects_from_list(items),
        other => Err(ProtocolError::UnexpectedShape(format!(
            "entry is a JSON {}",
            json_kind(other)
        ))),
    }
}

fn objects_from_list(items: &[Value]) -> Result<Vec<Object>, ProtocolError> {
    items
        .iter()
        .filter(|item| !item.is_null())
        .map(Object::from_json)
        .collect()
}

/// Maps a container error value to [`ClientError::Remote`].
///
/// Accepts `{"code": 404, "message": ".."}` (code as number or numeric
/// string) or a bare message string. A missing code is reported as `0`.
fn remote_error(value: &Value) -> ClientError {
    match value {
        Value::Object(map) => ClientError::Remote {
            code: map.get("code").and_then(number).unwrap_or(0),
            message: map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
        },
        Value::String(message) => ClientError::Remote {
            code: 0,
            message: message.clone(),
        },
        other => ClientError::Remote {
            code: 0,
            message: other.to_string(),
        },
    }
}

fn number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn metadata_from(map: &Map<String, Value>) -> ResponseMetadata {
    let unsigned = |key: &str| {
        map.get(key)
            .and_then(number)
            .and_then(|n| u64::try_from(n).ok())
    };
    ResponseMetadata {
        start_index: unsigned("startIndex"),
        total_results: unsigned("totalResults"),
        items_per_page: unsigned("itemsPerPage"),
        is_filtered: map.get("isFiltered").and_then(|v| match v {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }),
        status_link: map
            .get("statusLink")
            .and_then(Value::as_str)
            .map(str::to_owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Person;

    const V08: ProtocolVersion = ProtocolVersion::new(0, 8);

    fn models(keys: &[&str]) -> BTreeMap<String, ModelKind> {
        keys.iter()
            .map(|k| ((*k).to_owned(), ModelKind::Person))
            .collect()
    }

    // ── REST ──

    #[test]
    fn rest_single_entry() {
        let body = r#"{"entry": {"id": "1", "displayName": "Ada"}}"#;
        let response = JsonParser.parse(body, ModelKind::Person, V08).unwrap();
        assert_eq!(response.entry::<Person>().unwrap().display_name(), "Ada");
    }

    #[test]
    fn rest_collection_with_metadata() {
        let body = r#"{
            "startIndex": 0, "totalResults": "2", "itemsPerPage": 20,
            "isFiltered": "false",
            "entry": [{"id": "1"}, {"id": "2"}]
        }"#;
        let response = JsonParser.parse(body, ModelKind::Person, V08).unwrap();
        assert_eq!(response.objects().len(), 2);
        assert_eq!(response.start_index(), Some(0));
        assert_eq!(response.total_results(), Some(2));
        assert_eq!(response.items_per_page(), Some(20));
        assert_eq!(response.is_filtered(), Some(false));
    }

    #[test]
    fn rest_bare_array_is_a_collection() {
        let response = JsonParser
            .parse(r#"[{"id": "1"}, {"id": "2"}]"#, ModelKind::Generic, V08)
            .unwrap();
        assert_eq!(response.objects().len(), 2);
    }

    #[test]
    fn rest_bare_object_is_a_single_entry() {
        let response = JsonParser
            .parse(r#"{"status": "away"}"#, ModelKind::StatusMood, V08)
            .unwrap();
        assert_eq!(response.objects()[0].string("status"), Some("away"));
    }

    #[test]
    fn rest_error_body_is_a_failed_response() {
        let response = JsonParser
            .parse(
                r#"{"error": {"code": 401, "message": "unauthorized"}}"#,
                ModelKind::Person,
                V08,
            )
            .unwrap();
        assert_eq!(
            response.error(),
            Some(&ClientError::Remote {
                code: 401,
                message: "unauthorized".into()
            })
        );
    }

    #[test]
    fn empty_rest_body_is_success_without_entries() {
        for body in ["", "  \r\n"] {
            let response = JsonParser.parse(body, ModelKind::AppData, V08).unwrap();
            assert!(response.is_success());
            assert!(response.objects().is_empty());
        }
    }

    #[test]
    fn invalid_json_is_a_protocol_error() {
        assert!(matches!(
            JsonParser.parse("<html>", ModelKind::Person, V08),
            Err(ProtocolError::InvalidJson(_))
        ));
    }

    // ── RPC ──

    #[test]
    fn rpc_batch_demultiplexes_by_id() {
        let body = r#"[
            {"id": "friends", "data": {"list": [{"id": "2"}, {"id": "3"}], "totalResults": 2}},
            {"id": "viewer", "data": {"id": "1", "displayName": "Ada"}}
        ]"#;
        let responses = JsonParser
            .parse_batch(body, &models(&["viewer", "friends"]), V08)
            .unwrap();

        let viewer = &responses["viewer"];
        assert_eq!(viewer.id().map(CorrelationId::as_str), Some("viewer"));
        assert_eq!(viewer.entry::<Person>().unwrap().display_name(), "Ada");

        let friends = &responses["friends"];
        assert_eq!(friends.objects().len(), 2);
        assert_eq!(friends.total_results(), Some(2));
    }

    #[test]
    fn rpc_error_entry_fails_only_its_key() {
        let body = r#"[
            {"id": "viewer", "data": {"id": "1"}},
            {"id": "friends", "error": {"code": 403, "message": "forbidden"}}
        ]"#;
        let responses = JsonParser
            .parse_batch(body, &models(&["viewer", "friends"]), V08)
            .unwrap();
        assert!(responses["viewer"].is_success());
        assert_eq!(responses["friends"].status_code(), Some(403));
    }

    #[test]
    fn missing_ids_become_missing_response_errors() {
        let body = r#"[{"id": "viewer", "data": {"id": "1"}}]"#;
        let responses = JsonParser
            .parse_batch(body, &models(&["viewer", "friends"]), V08)
            .unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(
            responses["friends"].error(),
            Some(&ClientError::Protocol(ProtocolError::MissingResponse {
                id: "friends".into()
            }))
        );
    }

    #[test]
    fn duplicate_rpc_id_keeps_first_entry() {
        let body = r#"[
            {"id": "viewer", "data": {"id": "1"}},
            {"id": "viewer", "data": {"id": "2"}}
        ]"#;
        let responses = JsonParser
            .parse_batch(body, &models(&["viewer"]), V08)
            .unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses["viewer"].objects()[0].string("id"), Some("1"));
    }

    #[test]
    fn single_object_reply_is_accepted() {
        let body = r#"{"id": "viewer", "data": {"id": "1"}}"#;
        let responses = JsonParser
            .parse_batch(body, &models(&["viewer"]), V08)
            .unwrap();
        assert!(responses["viewer"].is_success());
    }

    #[test]
    fn whole_batch_error_fails_every_key() {
        let body = r#"{"error": {"code": 500, "message": "boom"}}"#;
        let responses = JsonParser
            .parse_batch(body, &models(&["a", "b"]), V08)
            .unwrap();
        assert!(responses.values().all(|r| r.status_code() == Some(500)));
    }

    #[test]
    fn newer_versions_read_result_key() {
        let body = r#"[{"id": "viewer", "result": {"id": "1"}}]"#;
        let responses = JsonParser
            .parse_batch(body, &models(&["viewer"]), ProtocolVersion::new(2, 0))
            .unwrap();
        assert_eq!(responses["viewer"].objects()[0].string("id"), Some("1"));
    }

    #[test]
    fn payload_key_falls_back_to_other_version() {
        let body = r#"[{"id": "viewer", "result": {"id": "1"}}]"#;
        let responses = JsonParser
            .parse_batch(body, &models(&["viewer"]), V08)
            .unwrap();
        assert!(responses["viewer"].entry::<Person>().is_some());
    }

    #[test]
    fn entries_without_id_are_skipped() {
        let body = r#"[{"data": {"id": "x"}}, {"id": "viewer", "data": {}}]"#;
        let responses = JsonParser
            .parse_batch(body, &models(&["viewer"]), V08)
            .unwrap();
        assert_eq!(responses.len(), 1);
        assert!(responses["viewer"].is_success());
    }

    #[test]
    fn error_body_extraction() {
        let error = JsonParser
            .parse_error(r#"{"error": {"code": "404", "message": "not found"}}"#)
            .unwrap();
        assert_eq!(error.status_code(), Some(404));
        assert!(JsonParser.parse_error("Service Unavailable").is_none());
    }

    #[test]
    fn parser_selection_by_content_type() {
        assert!(parser_for("application/json; charset=UTF-8").is_ok());
        assert!(parser_for("application/atom+json").is_ok());
        assert!(matches!(
            parser_for("application/atom+xml"),
            Err(ProtocolError::UnsupportedContentType(_))
        ));
    }
}
