//! Method registry, event registry, and invocation (§4.3).
//!
//! The `Dispatcher` is an owned, `Clone`-able, `Arc`-backed value —
//! constructed once by the embedding application and passed to each
//! transport handler — rather than the module-level singleton the source
//! implementation uses (§9 "Global dispatcher state").

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::error::DispatchError;
use crate::event::Event;
use crate::logging::{log_info, log_warn};
use crate::params::Params;
use crate::request::Request;
use crate::transport::TransportHandle;

/// A registered, callable method.
///
/// Handlers are responsible for extracting their own arguments out of
/// [`Params`] and returning [`crate::error::MethodError::InvalidParams`] on
/// an arity or name mismatch — Rust has no runtime signature introspection
/// to bind against, unlike the Python reference implementation's use of
/// `inspect.signature(...).bind(...)` (§9).
pub trait Method: Send + Sync {
    fn call(&self, params: Params) -> Result<serde_json::Value, crate::error::MethodError>;

    /// Whether this handler suspends (does meaningful blocking work) rather
    /// than returning immediately. Suspending methods are run to completion
    /// on a dedicated thread rather than the calling thread (§4.3, §5,
    /// §10.2) — this crate has no async runtime dependency, so "await" is
    /// modeled as a blocking join rather than a `Future` poll.
    fn is_suspending(&self) -> bool {
        false
    }
}

type BoxedFn = Box<dyn Fn(Params) -> Result<serde_json::Value, crate::error::MethodError> + Send + Sync>;

struct FnMethod {
    f: BoxedFn,
    suspending: bool,
}

impl Method for FnMethod {
    fn call(&self, params: Params) -> Result<serde_json::Value, crate::error::MethodError> {
        (self.f)(params)
    }

    fn is_suspending(&self) -> bool {
        self.suspending
    }
}

struct Inner {
    methods: RwLock<HashMap<String, Arc<dyn Method>>>,
    events: RwLock<HashMap<String, HashSet<TransportHandle>>>,
    events_enabled: bool,
}

/// Registry of callable methods and named events; resolves methods by name,
/// binds params, invokes, and routes event emissions to subscribed
/// transports (§4.3).
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    /// Creates an empty dispatcher. `events_enabled` controls whether
    /// `rpc.on`/`rpc.off` are recognized as built-in methods (§6).
    pub fn new(events_enabled: bool) -> Self {
        Dispatcher {
            inner: Arc::new(Inner {
                methods: RwLock::new(HashMap::new()),
                events: RwLock::new(HashMap::new()),
                events_enabled,
            }),
        }
    }

    /// Binds `method` under `name`. Collisions overwrite silently in
    /// registration order (§3, §4.3).
    pub fn register_method(&self, name: impl Into<String>, method: Arc<dyn Method>) {
        self.inner.methods.write().unwrap().insert(name.into(), method);
    }

    /// Registers a plain synchronous closure as a method.
    pub fn register_fn<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Params) -> Result<serde_json::Value, crate::error::MethodError> + Send + Sync + 'static,
    {
        self.register_method(
            name,
            Arc::new(FnMethod {
                f: Box::new(f),
                suspending: false,
            }),
        );
    }

    /// Registers a closure as a suspending method: `dispatch` will run it to
    /// completion on a dedicated thread rather than the calling thread.
    pub fn register_suspending_fn<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Params) -> Result<serde_json::Value, crate::error::MethodError> + Send + Sync + 'static,
    {
        self.register_method(
            name,
            Arc::new(FnMethod {
                f: Box::new(f),
                suspending: true,
            }),
        );
    }

    /// Binds each `(member, method)` pair as `"<ns>.<member>"`.
    ///
    /// The source reflects over an arbitrary object's public members at
    /// registration time; Rust has no equivalent runtime enumeration, so
    /// the caller supplies the member list explicitly (§9 REDESIGN FLAGS).
    pub fn register_namespace<I>(&self, ns: &str, members: I)
    where
        I: IntoIterator<Item = (String, Arc<dyn Method>)>,
    {
        let mut table = self.inner.methods.write().unwrap();
        for (member, method) in members {
            table.insert(format!("{ns}.{member}"), method);
        }
    }

    /// Idempotently creates empty subscriber sets for each name in `names`.
    /// Re-registering an existing event name preserves its subscribers
    /// (§9 open question, resolved as "preserve").
    pub fn register_events<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut events = self.inner.events.write().unwrap();
        for name in names {
            events.entry(name.into()).or_insert_with(HashSet::new);
        }
    }

    /// Convenience for registering a single event name.
    pub fn register_event(&self, name: impl Into<String>) {
        self.register_events([name.into()]);
    }

    pub fn get_method(&self, name: &str) -> Result<Arc<dyn Method>, DispatchError> {
        self.inner
            .methods
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| DispatchError::MethodNotFound(name.to_string()))
    }

    /// Adds `transport` to `event_name`'s subscriber set.
    pub fn method_subscribe(
        &self,
        transport: TransportHandle,
        event_name: &str,
    ) -> Result<serde_json::Value, DispatchError> {
        let mut events = self.inner.events.write().unwrap();
        let set = events
            .get_mut(event_name)
            .ok_or_else(|| DispatchError::InvalidEvent(format!("Event '{event_name}' not found!")))?;
        set.insert(transport);
        log_info!("dispatcher: subscribed to {event}", event = event_name);
        Ok(serde_json::json!({ event_name: "ok" }))
    }

    /// Removes `transport` from `event_name`'s subscriber set. Removing a
    /// transport that was never subscribed is a no-op (§4.3).
    pub fn method_unsubscribe(
        &self,
        transport: TransportHandle,
        event_name: &str,
    ) -> Result<serde_json::Value, DispatchError> {
        let mut events = self.inner.events.write().unwrap();
        let set = events
            .get_mut(event_name)
            .ok_or_else(|| DispatchError::InvalidEvent(format!("Event '{event_name}' not found or not subscribed!")))?;
        set.remove(&transport);
        log_info!("dispatcher: unsubscribed from {event}", event = event_name);
        Ok(serde_json::json!({ event_name: "ok" }))
    }

    /// Removes `transport` from every event's subscriber set. Called when a
    /// transport signals close (§3, §5).
    pub fn unsubscribe_all(&self, transport: &TransportHandle) {
        let mut events = self.inner.events.write().unwrap();
        for set in events.values_mut() {
            set.remove(transport);
        }
    }

    /// Delivers an event to every transport subscribed to `event_name` at
    /// the moment this call begins (§4.3, §5). A transport whose
    /// `emit_message` fails is treated as dead: it is unsubscribed from
    /// everything, and delivery continues to the remaining subscribers.
    pub fn emit(&self, event_name: &str, params: Params) -> Result<(), DispatchError> {
        if event_name.is_empty() {
            return Err(DispatchError::InvalidEvent("event name must not be empty".to_string()));
        }
        let subscribers: Vec<TransportHandle> = {
            let events = self.inner.events.read().unwrap();
            let set = events
                .get(event_name)
                .ok_or_else(|| DispatchError::InvalidEvent(format!("Event '{event_name}' not found!")))?;
            set.iter().cloned().collect()
        };

        let event = Event::new(event_name, params);
        for transport in subscribers {
            if let Err(err) = transport.0.emit_message(&event) {
                log_warn!(
                    "dispatcher: dead subscriber on {event}, unsubscribing: {err}",
                    event = event_name,
                    err = err.to_string()
                );
                self.unsubscribe_all(&transport);
            }
        }
        Ok(())
    }

    /// Resolves and invokes `request.method` (§4.3).
    ///
    /// `rpc.on`/`rpc.off` shadow any user-registered method of the same
    /// name while events are enabled.
    pub fn dispatch(&self, transport: &TransportHandle, request: &Request) -> Result<serde_json::Value, DispatchError> {
        let method_name = request.method_name();
        if self.inner.events_enabled && (method_name == "rpc.on" || method_name == "rpc.off") {
            let params = request.params();
            // Event name is addressed by position only, never by name — a
            // mapping here is a caller error, not just a missing argument.
            if !params.is_positional_or_none() {
                return Err(DispatchError::InvalidParams(format!(
                    "{method_name} takes a positional event name, not named params"
                )));
            }
            if params.is_empty() {
                return Err(DispatchError::InvalidParams(format!(
                    "{method_name} requires an event name, got {} params",
                    params.len()
                )));
            }
            let event_name = params
                .positional(0)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .ok_or_else(|| DispatchError::InvalidParams(format!("{method_name} requires a string event name")))?;
            return if method_name == "rpc.on" {
                self.method_subscribe(transport.clone(), &event_name)
            } else {
                self.method_unsubscribe(transport.clone(), &event_name)
            };
        }

        let method = self.get_method(method_name)?;
        let params = request.params();

        if method.is_suspending() {
            let handle = std::thread::Builder::new()
                .name("jrpc_runtime::dispatch".to_string())
                .spawn(move || method.call(params))
                .map_err(|e| DispatchError::Internal(e.to_string()))?;
            handle
                .join()
                .map_err(|_| DispatchError::Internal("suspending method panicked".to_string()))?
                .map_err(DispatchError::from)
        } else {
            method.call(params).map_err(DispatchError::from)
        }
    }
}
