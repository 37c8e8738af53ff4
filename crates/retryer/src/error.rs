//! Error types.
//!
//! The controller itself never fails: it only answers "try again?" with a
//! `bool`. The types here are the synthetic failure the HTTP path feeds into
//! the state machine, and the error returned when loading configuration.

use thiserror::Error;

/// Synthetic failure for a response that carried a server-side status code.
///
/// [`Retry::http_next`](crate::retry::Retry::http_next) builds one of these
/// when the caller reports no transport error but the response status is
/// 5xx, so the response counts as a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("server error: HTTP {status}")]
pub struct ServerError {
    /// The status code that triggered the failure (>= 500).
    pub status: u16,
}

/// Errors raised while loading a [`RetryConfig`](crate::config::RetryConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but could not be parsed.
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidEnv {
        /// Name of the offending variable
        var: &'static str,
        /// The raw value that failed to parse
        value: String,
        /// Parser message
        reason: String,
    },
}
