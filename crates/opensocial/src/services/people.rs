//! People service.

use crate::model::Person;
use crate::request::Request;
use crate::services::{SELF, VIEWER};
use crate::types::HttpMethod;

const TEMPLATE: &str = "people/{guid}/{selector}/{pid}";

/// The viewer's own profile.
pub fn get() -> Request {
    get_group(VIEWER, SELF)
}

/// The profile of `guid`.
pub fn get_for(guid: &str) -> Request {
    get_group(guid, SELF)
}

/// The people in `selector` relative to `guid` (e.g. `@viewer`, `@friends`).
pub fn get_group(guid: &str, selector: &str) -> Request {
    let mut request = Request::new(TEMPLATE, "people.get", HttpMethod::Get);
    request.set_guid(guid).set_selector(selector).expect::<Person>();
    request
}
