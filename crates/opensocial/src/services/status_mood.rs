//! Status and mood service (MySpace, REST only).

use serde_json::Value;

use crate::errors::BuildError;
use crate::model::StatusMood;
use crate::request::Request;
use crate::services::{FRIENDS, ME, SELF, SUPPORTED_MOOD};
use crate::types::HttpMethod;

const TEMPLATE: &str = "statusmood/{guid}/{groupId}/{friendId}/{moodId}/{history}";

fn base(rest_method: HttpMethod, guid: &str, group_id: &str) -> Request {
    let mut request = Request::rest(TEMPLATE, rest_method);
    request
        .set_guid(guid)
        .set_group_id(group_id)
        .expect::<StatusMood>();
    request
}

/// The authenticated user's current status and mood.
pub fn retrieve() -> Request {
    retrieve_for(ME)
}

pub fn retrieve_for(guid: &str) -> Request {
    base(HttpMethod::Get, guid, SELF)
}

/// One mood from the container's supported set.
pub fn retrieve_mood(mood_id: u64) -> Request {
    let mut request = base(HttpMethod::Get, ME, SUPPORTED_MOOD);
    request.set_mood_id(mood_id.to_string());
    request
}

/// Every mood the container supports.
pub fn retrieve_supported_moods() -> Request {
    base(HttpMethod::Get, ME, SUPPORTED_MOOD)
}

/// Status history of the user (`@self`) or their friends (`@friends`),
/// optionally narrowed to one friend.
pub fn retrieve_history(group_id: &str, friend_id: Option<&str>) -> Request {
    let mut request = base(HttpMethod::Get, ME, group_id);
    request.set_history(true);
    if let Some(friend_id) = friend_id {
        request.set_friend_id(friend_id);
    }
    request
}

pub fn retrieve_friends_history() -> Request {
    retrieve_history(FRIENDS, None)
}

/// Updates the authenticated user's status and mood.
pub fn update(status: &StatusMood) -> Result<Request, BuildError> {
    update_for(ME, status)
}

/// Updates `guid`'s status and mood. A numeric mood id is sent as a JSON
/// number.
pub fn update_for(guid: &str, status: &StatusMood) -> Result<Request, BuildError> {
    let mut request = base(HttpMethod::Put, guid, SELF);
    if let Some(mood_id) = status.mood_id() {
        let value = mood_id
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(mood_id));
        request.add_rest_payload_parameter("moodId", value)?;
    }
    if let Some(text) = status.status() {
        request.add_rest_payload_parameter("status", text)?;
    }
    Ok(request)
}
