//! Tagged representation of JSON-RPC `params`.
//!
//! Per the design notes, params are untyped at the protocol layer: a method
//! handler receives one of these and is responsible for extracting its own
//! arguments, returning [`crate::error::MethodError::InvalidParams`] on a
//! mismatch.

use serde_json::{Map, Value};

/// The three legal shapes of a JSON-RPC `params` member.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// `params` was absent, or present as `null` on V2.
    None,
    /// `params` was a JSON array.
    Positional(Vec<Value>),
    /// `params` was a JSON object (V2 only).
    Named(Map<String, Value>),
}

impl Params {
    /// Builds a `Params` from a decoded JSON value (or its absence).
    pub(crate) fn from_value(value: Option<Value>) -> Option<Params> {
        match value {
            None => Some(Params::None),
            Some(Value::Null) => Some(Params::None),
            Some(Value::Array(items)) => Some(Params::Positional(items)),
            Some(Value::Object(map)) => Some(Params::Named(map)),
            Some(_) => None,
        }
    }

    /// True if `params` was an array (the only shape V1 accepts).
    pub fn is_positional_or_none(&self) -> bool {
        matches!(self, Params::None | Params::Positional(_))
    }

    /// Returns the positional argument at `index`, if this is a
    /// [`Params::Positional`] with enough elements.
    pub fn positional(&self, index: usize) -> Option<&Value> {
        match self {
            Params::Positional(items) => items.get(index),
            _ => None,
        }
    }

    /// Returns the named argument `key`, if this is [`Params::Named`].
    pub fn named(&self, key: &str) -> Option<&Value> {
        match self {
            Params::Named(map) => map.get(key),
            _ => None,
        }
    }

    /// Number of positional arguments, or named entries; `0` for `None`.
    pub fn len(&self) -> usize {
        match self {
            Params::None => 0,
            Params::Positional(items) => items.len(),
            Params::Named(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&Params> for Option<Value> {
    fn from(params: &Params) -> Self {
        match params {
            Params::None => None,
            Params::Positional(items) => Some(Value::Array(items.clone())),
            Params::Named(map) => Some(Value::Object(map.clone())),
        }
    }
}
