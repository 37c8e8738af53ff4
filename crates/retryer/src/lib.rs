#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Loop-driven retry controller.
//!
//! This crate decides, after each attempt of a fallible operation, whether the
//! caller should try again and how long to wait first. It does not run the
//! operation itself: the caller owns the loop and reports each outcome back.
//!
//! - **Backoff functions** via [`DurationFunc`](retry::DurationFunc)
//!   - Exponential growth from a base delay ([`exp_duration`](retry::exp_duration))
//!   - Any closure mapping an attempt index to a `Duration`
//! - **Retry controller** via the [`Retry`](retry::Retry) trait and its
//!   implementation [`Retryer`](retry::Retryer)
//!   - Plain error outcomes with [`Retry::next`](retry::Retry::next)
//!   - HTTP outcomes with [`Retry::http_next`](retry::Retry::http_next), which
//!     also retries on 5xx responses
//! - **Factories** that capture a policy once and mint fresh controllers
//! - **Configuration** via [`RetryConfig`](config::RetryConfig)
//!
//! # Examples
//!
//! ```rust
//! use retryer::prelude::*;
//! use std::time::Duration;
//!
//! let mut attempts = 0;
//! let mut result: Result<&str, std::io::Error> = Ok("");
//! let mut retry = exp(3, Duration::ZERO);
//!
//! while retry.next_result(&result) {
//!     attempts += 1;
//!     result = if attempts < 2 {
//!         Err(std::io::Error::other("connection error"))
//!     } else {
//!         Ok("payload")
//!     };
//! }
//!
//! assert_eq!(attempts, 2);
//! assert_eq!(result.unwrap(), "payload");
//! ```

pub mod config;
pub mod error;
pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use retryer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{RetryConfig, RetryConfigBuilder};
    pub use crate::error::{ConfigError, ServerError};
    pub use crate::retry::{
        DurationFunc, HttpStatus, Retry, Retryer, RetryerFactory, constant_duration, exp,
        exp_duration, factory, no_delay,
    };
}
