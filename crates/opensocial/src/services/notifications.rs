//! Notifications service (MySpace, REST only).

use serde_json::Value;

use crate::errors::BuildError;
use crate::model::{Model, Notification};
use crate::request::Request;
use crate::services::{ME, SELF};
use crate::types::HttpMethod;

const TEMPLATE: &str = "notifications/{guid}/{groupId}";

/// Sends `notification` to its recipients.
pub fn create(notification: &Notification) -> Result<Request, BuildError> {
    let mut request = Request::rest(TEMPLATE, HttpMethod::Post);
    request.set_guid(ME).set_group_id(SELF).expect::<Notification>();

    if let Value::Object(fields) = notification.as_object().to_json() {
        for key in ["templateParameters", "recipientIds", "mediaItems"] {
            if let Some(value) = fields.get(key) {
                request.add_rest_payload_parameter(key, value.clone())?;
            }
        }
    }
    Ok(request)
}
