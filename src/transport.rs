//! The [`Transport`] contract the core consumes (§6, §9).
//!
//! Everything about HTTP, WebSocket framing, routing, and authentication is
//! out of scope (§1); a transport is just an opaque handle this crate can
//! push event notifications to, and whose identity it can track in a
//! subscriber set.

use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::event::Event;

/// Error returned by [`Transport::emit_message`] when delivery fails (e.g.
/// the underlying connection is gone). The dispatcher treats this as "dead
/// subscriber" and unsubscribes the transport from everything (§5).
#[derive(Debug, thiserror::Error)]
#[error("transport send failed: {0}")]
pub struct TransportError(pub String);

/// A handle to one client connection or request context.
///
/// Implementations are owned by the embedding application's transport layer
/// (an HTTP handler, a WebSocket connection actor, ...) and handed to the
/// [`crate::dispatcher::Dispatcher`] explicitly — there is no ambient
/// "current transport" lookup (§9 REDESIGN FLAGS).
pub trait Transport: Send + Sync + Debug {
    /// Pushes a server-initiated [`Event`] to this transport, if it supports
    /// receiving them. Request/response-only transports (e.g. a bare HTTP
    /// POST handler) can return `Ok(())` unconditionally, since there is
    /// nowhere for an event to go; duplex transports serialize this onto
    /// their outbound message stream (§5).
    fn emit_message(&self, event: &Event) -> Result<(), TransportError>;
}

/// An `Arc<dyn Transport>` with identity-based `Eq`/`Hash`, so the same
/// transport can be stored in an event's subscriber set without requiring
/// `Transport` itself to implement those traits structurally.
#[derive(Clone, Debug)]
pub struct TransportHandle(pub Arc<dyn Transport>);

impl TransportHandle {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        TransportHandle(transport)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for TransportHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for TransportHandle {}

impl Hash for TransportHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}
