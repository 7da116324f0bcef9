//! Diagnostic logging for the runtime.
//!
//! Mirrors the teacher crate's two-tier approach: a minimal `eprintln!`-based
//! [`log`] for unconditional diagnostics, and `logwise`'s structured macros
//! (feature `logwise`, on by default) at the protocol boundaries — decode
//! failures, dispatch errors, subscribe/unsubscribe, emit delivery failures.
//! The [`log_info`], [`log_warn`], and [`log_error`] macros compile to a
//! no-op when the feature is disabled, so call sites don't need `#[cfg]`.

/// Unconditional fallback logger for diagnostics that don't warrant pulling
/// in `logwise`'s structured-record machinery.
pub fn log(str: &str) {
    eprintln!("{}", str);
}

#[cfg(feature = "logwise")]
macro_rules! log_info {
    ($($arg:tt)*) => {
        logwise::info_sync!($($arg)*)
    };
}

#[cfg(not(feature = "logwise"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logwise")]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        logwise::warn_sync!($($arg)*)
    };
}

#[cfg(not(feature = "logwise"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logwise")]
macro_rules! log_error {
    ($($arg:tt)*) => {
        logwise::error_sync!($($arg)*)
    };
}

#[cfg(not(feature = "logwise"))]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

pub(crate) use log_error;
pub(crate) use log_info;
pub(crate) use log_warn;
