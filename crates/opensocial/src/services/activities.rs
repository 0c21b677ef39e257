//! Activities service.

use serde_json::{Map, Value};

use crate::errors::BuildError;
use crate::model::Activity;
use crate::request::Request;
use crate::services::{APP, ME, SELF};
use crate::types::HttpMethod;

const TEMPLATE: &str = "activities/{guid}/{selector}/{appid}/{activityid}";

/// The authenticated user's activities.
pub fn retrieve() -> Request {
    retrieve_for(ME, SELF)
}

/// Activities of `selector` relative to `guid`.
pub fn retrieve_for(guid: &str, selector: &str) -> Request {
    let mut request = Request::new(TEMPLATE, "activities.get", HttpMethod::Get);
    request.set_guid(guid).set_selector(selector).expect::<Activity>();
    request
}

/// Posts `activity` to the authenticated user's stream.
///
/// JSON-RPC sends `{"activity": {"title", "body"}}`; REST sends title, body
/// and title id as top-level body fields. Unset fields are omitted.
pub fn create(activity: &Activity) -> Result<Request, BuildError> {
    let mut request = Request::new(TEMPLATE, "activities.create", HttpMethod::Post);
    request.set_guid(ME).set_selector(SELF).set_app_id(APP);

    let mut rpc = Map::new();
    for (key, value) in [("body", activity.body()), ("title", activity.title())] {
        if let Some(value) = value {
            rpc.insert(key.to_owned(), Value::from(value));
        }
    }
    request.add_rpc_parameter("activity", rpc)?;

    for (key, value) in [
        ("body", activity.body()),
        ("title", activity.title()),
        ("titleId", activity.title_id()),
    ] {
        if let Some(value) = value {
            request.add_rest_payload_parameter(key, value)?;
        }
    }
    Ok(request)
}
