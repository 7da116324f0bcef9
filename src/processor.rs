//! The decode → validate → dispatch → encode pipeline (§4.4).
//!
//! This is the one entry point a transport needs: hand it raw bytes and a
//! [`TransportHandle`] identifying the caller, get back the bytes to write
//! in response (or nothing, for a pure notification).

use serde_json::Value;

use crate::codec::{self, Decoded};
use crate::dispatcher::Dispatcher;
use crate::error::codes;
use crate::logging::log_warn;
use crate::request::{DecodeError, Request};
use crate::response::Response;
use crate::transport::TransportHandle;
use crate::version::Version;

/// Drives one payload through the full pipeline (§4.4).
///
/// Returns `Ok(None)` when nothing should be written back — either the
/// payload was a single notification that dispatched cleanly, or a batch
/// made up entirely of such notifications. A batch that mixes notifications
/// with ordinary calls returns only the responses for the latter, in
/// request order (§4.4, §8).
pub struct Processor {
    dispatcher: Dispatcher,
    accepted_version: Option<Version>,
}

impl Processor {
    /// `accepted_version` pins the server to V1-only or V2-only request
    /// handling; `None` accepts either on a per-request basis (§4.1, §4.4).
    pub fn new(dispatcher: Dispatcher, accepted_version: Option<Version>) -> Self {
        Processor {
            dispatcher,
            accepted_version,
        }
    }

    pub fn process(&self, bytes: &[u8], transport: &TransportHandle) -> Option<Vec<u8>> {
        let decoded = match codec::decode(bytes, self.accepted_version) {
            Ok(decoded) => decoded,
            Err(err) => {
                log_warn!("processor: codec error: {err}", err = err.to_string());
                let version = self.accepted_version.unwrap_or(Version::V1);
                let response = Response::error(version, Value::Null, err.code(), err.to_string());
                return Some(codec::encode(&response).expect("Response serialization cannot fail"));
            }
        };

        match decoded {
            Decoded::Single(result) => {
                let response = self.process_one(result, transport)?;
                Some(codec::encode(&response).expect("Response serialization cannot fail"))
            }
            Decoded::Batch(results) => {
                let responses: Vec<Response> = results
                    .into_iter()
                    .filter_map(|result| self.process_one(result, transport))
                    .collect();
                if responses.is_empty() {
                    None
                } else {
                    Some(codec::encode(&responses).expect("Response serialization cannot fail"))
                }
            }
        }
    }

    /// Processes one already-decoded element of a request or batch (§4.4).
    ///
    /// A decode or validation failure always yields a response, even inside
    /// what would otherwise be a notification — there is no reliable way to
    /// know a malformed request was meant as one. Only a *successfully
    /// validated* notification has its result or error suppressed.
    fn process_one(
        &self,
        result: Result<Request, DecodeError>,
        transport: &TransportHandle,
    ) -> Option<Response> {
        let request = match result {
            Ok(request) => request,
            Err(DecodeError { reason, id, version }) => {
                return Some(Response::error(
                    version,
                    id.unwrap_or(Value::Null),
                    reason.code(),
                    reason.to_string(),
                ));
            }
        };

        if let Err(reason) = request.validate() {
            return Some(Response::error(
                request.version,
                request.id.clone().unwrap_or(Value::Null),
                reason.code(),
                reason.to_string(),
            ));
        }

        let is_notification = request.is_notification();
        let id = request.id.clone().unwrap_or(Value::Null);

        match self.dispatcher.dispatch(transport, &request) {
            Ok(result) => {
                if is_notification {
                    None
                } else {
                    Some(Response::success(request.version, id, result))
                }
            }
            Err(err) => {
                if is_notification {
                    log_warn!(
                        "processor: notification '{method}' failed: {err}",
                        method = request.method_name(),
                        err = err.to_string()
                    );
                    None
                } else {
                    let code = match &err {
                        crate::error::DispatchError::Internal(_) => codes::INTERNAL_ERROR,
                        other => other.code(),
                    };
                    Some(Response::error(request.version, id, code, err.to_string()))
                }
            }
        }
    }
}
