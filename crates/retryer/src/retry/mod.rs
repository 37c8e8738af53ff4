//! Retry controller and backoff functions.
//!
//! # Key Types
//!
//! - [`Retry`] - Core trait: "given the last outcome, try again?"
//! - [`Retryer`] - Counting implementation with pluggable backoff
//! - [`DurationFunc`] - Maps a failed attempt index to a wait duration
//! - [`HttpStatus`] - Status-code seam used by [`Retry::http_next`]
//!
//! # Examples
//!
//! ```rust
//! use retryer::retry::{Retry, exp};
//! use std::time::Duration;
//!
//! let mut status = 0u16;
//! let mut attempts = 0;
//! let mut retryer = exp(3, Duration::from_millis(1));
//!
//! while retryer.http_next(Some(&status), None) {
//!     attempts += 1;
//!     status = if attempts < 3 { 503 } else { 200 };
//! }
//!
//! assert_eq!(attempts, 3);
//! assert_eq!(status, 200);
//! ```

mod duration;
mod status;
mod retryer;

pub use duration::{DurationFunc, constant_duration, exp_duration, no_delay};
pub use status::HttpStatus;
pub use retryer::{Retry, Retryer, RetryerFactory, Sleeper, exp, factory};
