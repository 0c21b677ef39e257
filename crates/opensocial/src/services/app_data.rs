//! Application data service.

use serde_json::{Map, Value};

use crate::errors::BuildError;
use crate::model::AppData;
use crate::request::Request;
use crate::services::{APP, SELF, VIEWER};
use crate::types::HttpMethod;

const TEMPLATE: &str = "appdata/{guid}/{selector}/{appid}";

fn base(rpc_method: &str, rest_method: HttpMethod) -> Request {
    let mut request = Request::new(TEMPLATE, rpc_method, rest_method);
    request.set_guid(VIEWER).set_selector(SELF).set_app_id(APP);
    request
}

/// The viewer's data for this application.
pub fn retrieve() -> Request {
    let mut request = base("appdata.get", HttpMethod::Get);
    request.expect::<AppData>();
    request
}

/// Stores one key.
pub fn update_one(key: &str, value: &str) -> Result<Request, BuildError> {
    update([(key, value)])
}

/// Stores every `(key, value)` pair of `data`.
///
/// The key list travels as `fields` (an array over JSON-RPC, a comma-joined
/// query parameter over REST).
pub fn update<K, V, I>(data: I) -> Result<Request, BuildError>
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut request = base("appdata.update", HttpMethod::Put);
    let mut values = Map::new();
    let mut keys = Vec::new();
    for (key, value) in data {
        let key: String = key.into();
        let value: String = value.into();
        request.add_rest_payload_parameter(key.as_str(), value.as_str())?;
        keys.push(key.clone());
        values.insert(key, Value::String(value));
    }

    request
        .add_rpc_parameter("data", values)?
        .add_rpc_parameter("fields", keys.clone())?
        .add_query_parameter("fields", keys.join(","))?;
    Ok(request)
}

/// Removes `keys`.
pub fn delete<K, I>(keys: I) -> Result<Request, BuildError>
where
    K: Into<String>,
    I: IntoIterator<Item = K>,
{
    let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
    let mut request = base("appdata.delete", HttpMethod::Delete);
    request
        .add_rpc_parameter("fields", keys.clone())?
        .add_query_parameter("fields", keys.join(","))?;
    Ok(request)
}
