//! Parsing raw bytes into [`Request`]s and serializing responses back to
//! bytes (§4.1).
//!
//! Requests are parsed by hand off a raw [`serde_json::Map`] rather than via
//! `#[derive(Deserialize)]`, because the protocol needs to distinguish an
//! absent `id` member from an `id` that is explicitly `null` — a distinction
//! `serde`'s usual `Option<T>` derive collapses. This mirrors how the Python
//! reference implementation builds requests off a plain `dict`.

use crate::error::{CodecError, InvalidRequest};
use crate::logging::log;
use crate::request::{DecodeError, Request};
use crate::version::Version;
use serde::Serialize;
use serde_json::Value;

/// The result of decoding one payload: either a single request (or its
/// decode failure), or a non-empty batch of the same.
#[derive(Debug)]
pub enum Decoded {
    Single(Result<Request, DecodeError>),
    Batch(Vec<Result<Request, DecodeError>>),
}

/// Parses `bytes` into one or more requests (§4.1).
///
/// `accepted` pins the server to a single protocol version; requests whose
/// `jsonrpc` field names a different version are rejected with
/// `InvalidRequest("Refusing to handle version ...")`. Pass `None` to accept
/// both V1 and V2.
pub fn decode(bytes: &[u8], accepted: Option<Version>) -> Result<Decoded, CodecError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        log(&format!("codec: rejected non-UTF-8 payload: {e}"));
        CodecError::ParseError(e.to_string())
    })?;
    let value: Value = serde_json::from_str(text).map_err(|e| {
        log(&format!("codec: rejected malformed JSON payload: {e}"));
        CodecError::ParseError(e.to_string())
    })?;

    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(CodecError::EmptyBatch);
            }
            let decoded = items
                .into_iter()
                .map(|item| process_one(item, accepted))
                .collect();
            Ok(Decoded::Batch(decoded))
        }
        other => Ok(Decoded::Single(process_one(other, accepted))),
    }
}

/// Constructs a single [`Request`] from one decoded JSON value (§4.1 step 3).
fn process_one(value: Value, accepted: Option<Version>) -> Result<Request, DecodeError> {
    let map = match value {
        Value::Object(map) => map,
        _ => {
            return Err(DecodeError {
                reason: InvalidRequest("Request must be a JSON object".to_string()),
                id: None,
                version: accepted.unwrap_or(Version::V1),
            });
        }
    };

    let raw_version = map
        .get("jsonrpc")
        .and_then(|v| v.as_str())
        .unwrap_or("1.0")
        .to_string();
    let shell_id = map.get("id").cloned();

    if let Some(accepted_version) = accepted {
        if raw_version != accepted_version.wire_str() {
            return Err(DecodeError {
                reason: InvalidRequest(format!("Refusing to handle version {}", raw_version)),
                id: shell_id,
                version: accepted_version,
            });
        }
    }

    // Unrecognized `jsonrpc` values still produce a constructible Request,
    // defaulted to V1, so `validate()` can reject them uniformly (§4.2).
    let version = Version::from_wire_str(Some(raw_version.as_str())).unwrap_or(Version::V1);

    let method_value = match map.get("method") {
        Some(v) => v.clone(),
        None => {
            return Err(DecodeError {
                reason: InvalidRequest("Missing member \"method\"".to_string()),
                id: shell_id,
                version,
            });
        }
    };

    if raw_version == "1.0" && !map.contains_key("id") {
        return Err(DecodeError {
            reason: InvalidRequest("Missing member \"id\"".to_string()),
            id: None,
            version: Version::V1,
        });
    }

    let params_value = map.get("params").cloned();
    let id = map.get("id").cloned();

    Ok(Request {
        raw_version,
        version,
        method_value,
        params_value,
        id,
    })
}

/// Serializes a value to bytes, rewriting `</` to `<\/` per the
/// HTML-embedding hardening rule (§4.1, §6).
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    Ok(html_harden(&json).into_bytes())
}

fn html_harden(json: &str) -> String {
    json.replace("</", "<\\/")
}
