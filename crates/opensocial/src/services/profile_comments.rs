//! Profile comments service (MySpace, REST only).

use crate::model::Comment;
use crate::request::Request;
use crate::services::{ME, SELF};
use crate::types::HttpMethod;

const TEMPLATE: &str = "profilecomments/{guid}/{groupId}";

/// Comments left on the authenticated user's profile.
pub fn retrieve() -> Request {
    let mut request = Request::rest(TEMPLATE, HttpMethod::Get);
    request.set_guid(ME).set_group_id(SELF).expect::<Comment>();
    request
}
