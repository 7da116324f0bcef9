//! The [`Request`] value and its version-specific validation rules (§3, §4.2).

use crate::error::InvalidRequest;
use crate::params::Params;
use crate::version::Version;
use serde_json::Value;

/// A decoded JSON-RPC request.
///
/// Construction (see [`crate::codec::decode`]) only enforces *structural*
/// rules that must hold before a `Request` value can exist at all (the
/// `method` member must be present; V1 requires an `id` member). Type
/// correctness of `method` and `params` is deferred to [`Request::validate`],
/// matching the reference implementation's split between constructor-time
/// `KeyError`s and an explicit `validate()` call.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) raw_version: String,
    /// Version to use when shaping the eventual response. Defaults to `V1`
    /// when `raw_version` doesn't name a recognized version; in that case
    /// [`Request::validate`] will reject the request before this default
    /// is ever observed by a handler.
    pub version: Version,
    pub(crate) method_value: Value,
    pub(crate) params_value: Option<Value>,
    /// `None` means the `id` member was absent from the wire object;
    /// `Some(Value::Null)` means it was present and explicitly `null`.
    pub id: Option<Value>,
}

impl Request {
    pub(crate) fn version_recognized(&self) -> bool {
        self.raw_version == "1.0" || self.raw_version == "2.0"
    }

    /// Whether this request is a notification under its version's rules
    /// (§4.2). Only meaningful once [`Request::validate`] has succeeded.
    pub fn is_notification(&self) -> bool {
        match self.version {
            Version::V1 => matches!(self.id, Some(Value::Null)),
            Version::V2 => self.id.is_none(),
        }
    }

    /// The method name. Safe to call unconditionally after `validate()`
    /// has returned `Ok`.
    pub fn method_name(&self) -> &str {
        self.method_value.as_str().unwrap_or_default()
    }

    /// The request's params, normalized into the tagged [`Params`] shape.
    pub fn params(&self) -> Params {
        Params::from_value(self.params_value.clone()).unwrap_or(Params::None)
    }

    /// Structural + type validation (§4.2). Must be called, and must
    /// succeed, before a request is dispatched.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if !self.version_recognized() {
            return Err(InvalidRequest("Unsupported JSONRPC version!".to_string()));
        }
        if !self.method_value.is_string() {
            return Err(InvalidRequest("\"method\" must be a string!".to_string()));
        }
        match self.version {
            Version::V1 => {
                if !matches!(self.params_value, None | Some(Value::Array(_))) {
                    return Err(InvalidRequest("Invalid type for \"params\"!".to_string()));
                }
            }
            Version::V2 => {
                if let Some(params) = &self.params_value {
                    if !matches!(params, Value::Array(_) | Value::Object(_)) {
                        return Err(InvalidRequest("Invalid type for \"params\"!".to_string()));
                    }
                }
            }
        }
        Ok(())
    }
}

/// A request that failed to decode, carrying whatever shell could be
/// recovered so the id (and a version to shape the response with) can still
/// be echoed back (§3, §7).
#[derive(Debug, Clone)]
pub struct DecodeError {
    pub reason: InvalidRequest,
    pub id: Option<Value>,
    pub version: Version,
}
