//! Media items service.

use crate::errors::BuildError;
use crate::model::{MediaItem, Model};
use crate::request::Request;
use crate::services::{ME, SELF};
use crate::types::HttpMethod;

const TEMPLATE: &str = "mediaitems/{guid}/{groupId}/{albumId}/{itemId}";

fn base(rpc_method: &str, rest_method: HttpMethod, album_id: &str) -> Request {
    let mut request = Request::new(TEMPLATE, rpc_method, rest_method);
    request.set_guid(ME).set_group_id(SELF).set_album_id(album_id);
    request
}

fn required<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str, BuildError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BuildError::Invalid(format!("media item has no {what}")))
}

/// Every item in `album_id`.
pub fn retrieve(album_id: &str) -> Request {
    let mut request = base("mediaItems.get", HttpMethod::Get, album_id);
    request.expect::<MediaItem>();
    request
}

/// One item.
pub fn retrieve_one(album_id: &str, item_id: &str) -> Request {
    let mut request = retrieve(album_id);
    request.set_item_id(item_id);
    request
}

/// Adds `item` to the album named by its `album_id`.
pub fn create(item: &MediaItem) -> Result<Request, BuildError> {
    let album_id = required(item.album_id(), "album_id")?;
    let mut request = base("mediaItems.create", HttpMethod::Post, album_id);
    request
        .set_rest_payload_object(item.as_object())
        .add_rpc_parameter("mediaItem", item.as_object().to_json())?;
    Ok(request)
}

/// Replaces the item identified by `item`'s `id` and `album_id`.
pub fn update(item: &MediaItem) -> Result<Request, BuildError> {
    let item_id = required(item.id(), "id")?;
    let album_id = required(item.album_id(), "album_id")?;
    let mut request = base("mediaItems.update", HttpMethod::Put, album_id);
    request
        .set_item_id(item_id)
        .set_rest_payload_object(item.as_object())
        .add_rpc_parameter("mediaItem", item.as_object().to_json())?;
    Ok(request)
}

pub fn delete(album_id: &str, item_id: &str) -> Request {
    let mut request = base("mediaItems.delete", HttpMethod::Delete, album_id);
    request.set_item_id(item_id);
    request
}
