//! Protocol version handling.
//!
//! JSON-RPC 1.0 and 2.0 share a request/response shape but diverge on a few
//! structural rules (see [`crate::request::Request::validate`]). [`Version`]
//! is the discriminant the rest of the crate branches on instead of
//! subclassing per-version request/response types.

use std::fmt;

/// The JSON-RPC protocol version a request was sent with, or a server is
/// pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// JSON-RPC 1.0: `id` is a required field (possibly `null`); `params`
    /// must be an ordered sequence.
    V1,
    /// JSON-RPC 2.0: `id` may be absent (marking a notification); `params`
    /// may be an ordered sequence or a named mapping.
    V2,
}

impl Version {
    /// Parses the `jsonrpc` wire field. Absent ⇒ `"1.0"` per §3.
    pub(crate) fn from_wire_str(s: Option<&str>) -> Option<Version> {
        match s {
            None => Some(Version::V1),
            Some("1.0") => Some(Version::V1),
            Some("2.0") => Some(Version::V2),
            Some(_) => None,
        }
    }

    pub(crate) fn wire_str(self) -> &'static str {
        match self {
            Version::V1 => "1.0",
            Version::V2 => "2.0",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_str())
    }
}
