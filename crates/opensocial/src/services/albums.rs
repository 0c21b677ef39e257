//! Albums service.

use crate::errors::BuildError;
use crate::model::{Album, Model};
use crate::request::Request;
use crate::services::{ME, SELF};
use crate::types::HttpMethod;

const TEMPLATE: &str = "albums/{guid}/{groupId}/{albumId}";

fn base(rpc_method: &str, rest_method: HttpMethod) -> Request {
    let mut request = Request::new(TEMPLATE, rpc_method, rest_method);
    request.set_guid(ME).set_group_id(SELF);
    request
}

/// All of the authenticated user's albums.
pub fn retrieve() -> Request {
    let mut request = base("albums.get", HttpMethod::Get);
    request.expect::<Album>();
    request
}

/// One album.
pub fn retrieve_one(album_id: &str) -> Request {
    let mut request = retrieve();
    request.set_album_id(album_id);
    request
}

pub fn create(album: &Album) -> Result<Request, BuildError> {
    let mut request = base("albums.create", HttpMethod::Post);
    request
        .set_rest_payload_object(album.as_object())
        .add_rpc_parameter("album", album.as_object().to_json())?;
    Ok(request)
}

pub fn update(album_id: &str, album: &Album) -> Result<Request, BuildError> {
    let mut request = base("albums.update", HttpMethod::Put);
    request
        .set_album_id(album_id)
        .set_rest_payload_object(album.as_object())
        .add_rpc_parameter("album", album.as_object().to_json())?;
    Ok(request)
}

pub fn delete(album_id: &str) -> Request {
    let mut request = base("albums.delete", HttpMethod::Delete);
    request.set_album_id(album_id);
    request
}
