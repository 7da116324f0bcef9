//! Error taxonomy for the codec, dispatcher, and processor.
//!
//! Each concern gets its own `thiserror` enum rather than one monolithic
//! error type, following the teacher's practice of scoping error enums to
//! the module that raises them (compare `jrpc::Error` and
//! `internal_proxy::Error` in the reference crate). [`ErrorCode`] is the
//! numeric wire contract shared by all of them (§6/§7 of the spec).

/// Standard JSON-RPC 2.0 error codes, plus the domain-specific `InvalidEvent`
/// code this runtime defines.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const INVALID_EVENT: i32 = -32000;
}

/// Errors raised while decoding a raw payload into requests, before any
/// single request has been validated (§4.1, §7).
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload was not valid UTF-8, or not valid JSON.
    #[error("Parse error: {0}")]
    ParseError(String),
    /// A top-level JSON array had no elements.
    #[error("Empty batch request")]
    EmptyBatch,
}

impl CodecError {
    pub fn code(&self) -> i32 {
        match self {
            CodecError::ParseError(_) => codes::PARSE_ERROR,
            CodecError::EmptyBatch => codes::INVALID_REQUEST,
        }
    }
}

/// Raised by [`crate::request::Request::validate`] and by request
/// construction when a required member is missing (§4.2).
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid Request: {0}")]
pub struct InvalidRequest(pub String);

impl InvalidRequest {
    pub fn code(&self) -> i32 {
        codes::INVALID_REQUEST
    }
}

/// Errors a [`crate::dispatcher::Method`] handler may return (§4.3).
#[derive(Debug, thiserror::Error)]
pub enum MethodError {
    /// The supplied params didn't match what the method expects: wrong
    /// arity, missing named argument, wrong JSON type, and so on.
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    /// Any other failure raised by handler code. Carries only a message;
    /// the processor wraps it as `InternalError` (§4.4, §7).
    #[error("{0}")]
    Failed(String),
}

impl MethodError {
    /// Convenience constructor for wrapping an arbitrary `std::error::Error`.
    pub fn failed<E: std::fmt::Display>(err: E) -> Self {
        MethodError::Failed(err.to_string())
    }
}

/// Errors raised by [`crate::dispatcher::Dispatcher::dispatch`] and the
/// event-table operations (§4.3).
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("MethodNotFound: method: '{0}' not found")]
    MethodNotFound(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("InvalidEvent: {0}")]
    InvalidEvent(String),
    #[error("InternalError: {0}")]
    Internal(String),
}

impl DispatchError {
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            DispatchError::InvalidParams(_) => codes::INVALID_PARAMS,
            DispatchError::InvalidEvent(_) => codes::INVALID_EVENT,
            DispatchError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }
}

impl From<MethodError> for DispatchError {
    fn from(err: MethodError) -> Self {
        match err {
            MethodError::InvalidParams(msg) => DispatchError::InvalidParams(msg),
            MethodError::Failed(msg) => DispatchError::Internal(msg),
        }
    }
}
