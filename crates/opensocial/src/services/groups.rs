//! Groups service. Read only; containers accept no group mutations.

use crate::request::Request;
use crate::services::{ME, SELF};
use crate::types::HttpMethod;

const TEMPLATE: &str = "groups/{guid}";

/// User id that asks for the field list instead of a user's groups.
pub const SUPPORTED_FIELDS: &str = "@supportedFields";

/// The authenticated user's groups.
pub fn get() -> Request {
    get_for(ME)
}

/// The groups `guid` belongs to.
pub fn get_for(guid: &str) -> Request {
    let mut request = Request::new(TEMPLATE, "groups.get", HttpMethod::Get);
    request.set_guid(guid).set_group_id(SELF);
    request
}

/// The group fields the container supports.
pub fn get_supported_fields() -> Request {
    let mut request = Request::new(TEMPLATE, "groups.getSupportedFields", HttpMethod::Get);
    request.set_guid(SUPPORTED_FIELDS);
    request
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::ModelKind;

    #[test]
    fn get_defaults_to_own_groups() {
        let request = get();
        assert_eq!(request.rpc_method(), Some("groups.get"));
        assert_eq!(request.model(), ModelKind::Generic);
        assert_eq!(
            request.build_rest_url("http://x.org/rest/").unwrap(),
            "http://x.org/rest/groups/@me"
        );
        assert_eq!(
            serde_json::Value::Object(request.rpc_params()),
            json!({"userId": "@me", "groupId": "@self"})
        );
    }

    #[test]
    fn get_for_other_user() {
        assert_eq!(
            get_for("42").build_rest_url("http://x.org/rest").unwrap(),
            "http://x.org/rest/groups/42"
        );
    }

    #[test]
    fn supported_fields_uses_marker_user() {
        let request = get_supported_fields();
        assert_eq!(request.rpc_method(), Some("groups.getSupportedFields"));
        assert_eq!(
            request.build_rest_url("http://x.org/rest/").unwrap(),
            "http://x.org/rest/groups/@supportedFields"
        );
        assert_eq!(
            request.rpc_entry("fields").unwrap(),
            json!({
                "id": "fields",
                "method": "groups.getSupportedFields",
                "params": {"userId": "@supportedFields"}
            })
        );
    }
}
