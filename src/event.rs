//! The [`Event`] value pushed to subscribed transports (§3, §6).

use crate::params::Params;
use serde::Serialize;
use serde_json::Value;

/// A server-to-transport notification delivered outside the request/response
/// cycle, via [`crate::dispatcher::Dispatcher::emit`].
///
/// The wire shape `{"jsonrpc":"2.0","notification":...,"params":...}` is a
/// deliberate, documented project-local convention rather than a standard
/// JSON-RPC 2.0 notification (which would be indistinguishable from a
/// notification-shaped request on the wire) — see REDESIGN FLAGS in
/// `SPEC_FULL.md`.
#[derive(Debug, Clone)]
pub struct Event {
    pub notification: String,
    pub params: Params,
}

impl Event {
    pub fn new(notification: impl Into<String>, params: Params) -> Self {
        Event {
            notification: notification.into(),
            params,
        }
    }
}

impl Serialize for Event {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let params_value: Option<Value> = (&self.params).into();
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("jsonrpc", "2.0")?;
        map.serialize_entry("notification", &self.notification)?;
        map.serialize_entry("params", &params_value)?;
        map.end()
    }
}
