//! The [`Response`] value and its per-version wire encoding (§3, §6).

use crate::version::Version;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Either a successful result or an error; never both (§3).
#[derive(Debug, Clone)]
pub enum ResponsePayload {
    Result(Value),
    Error { code: i32, message: String },
}

/// A JSON-RPC response. One struct with a version discriminant, per the
/// design note in §9: the encoder branches on `version` rather than the
/// crate defining separate V1/V2 response types.
#[derive(Debug, Clone)]
pub struct Response {
    pub version: Version,
    pub id: Value,
    pub payload: ResponsePayload,
}

impl Response {
    pub fn success(version: Version, id: Value, result: Value) -> Self {
        Response {
            version,
            id,
            payload: ResponsePayload::Result(result),
        }
    }

    pub fn error(version: Version, id: Value, code: i32, message: String) -> Self {
        Response {
            version,
            id,
            payload: ResponsePayload::Error { code, message },
        }
    }
}

impl Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        match (self.version, &self.payload) {
            (Version::V2, ResponsePayload::Result(result)) => {
                map.serialize_entry("jsonrpc", "2.0")?;
                map.serialize_entry("id", &self.id)?;
                map.serialize_entry("result", result)?;
            }
            (Version::V2, ResponsePayload::Error { code, message }) => {
                map.serialize_entry("jsonrpc", "2.0")?;
                map.serialize_entry("id", &self.id)?;
                map.serialize_entry("error", &ErrorObject { code: *code, message })?;
            }
            (Version::V1, ResponsePayload::Result(result)) => {
                map.serialize_entry("id", &self.id)?;
                map.serialize_entry("result", result)?;
                map.serialize_entry("error", &Value::Null)?;
            }
            (Version::V1, ResponsePayload::Error { code, message }) => {
                map.serialize_entry("id", &self.id)?;
                map.serialize_entry("result", &Value::Null)?;
                map.serialize_entry("error", &ErrorObject { code: *code, message })?;
            }
        }
        map.end()
    }
}

#[derive(Serialize)]
struct ErrorObject<'a> {
    code: i32,
    message: &'a str,
}
