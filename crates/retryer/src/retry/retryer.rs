//! The retry controller state machine.

use super::duration::{DurationFunc, exp_duration};
use super::status::{HttpStatus, server_failure};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Blocks the calling thread for the backoff delay.
pub type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Zero-argument constructor producing fresh, independent [`Retryer`]s.
pub type RetryerFactory = Arc<dyn Fn() -> Retryer + Send + Sync>;

/// Decides, after each attempt, whether the caller should try again.
///
/// The trait is built to sit in a loop condition. The first call always
/// returns `true` so the loop body runs at least once. Every later call
/// receives the outcome of the attempt that just ran and returns `false` on
/// success or once the attempt budget is spent. When it returns `true` after
/// a failure, it has already slept for the backoff delay.
///
/// # Examples
///
/// ```rust
/// use retryer::retry::{Retry, Retryer, no_delay};
/// use std::io;
///
/// let mut retryer = Retryer::new(3, no_delay());
/// let mut err: Option<io::Error> = None;
/// let mut attempts = 0;
///
/// while retryer.next(err.as_ref().map(|e| e as &dyn std::error::Error)) {
///     attempts += 1;
///     err = Some(io::Error::other("connection error"));
/// }
///
/// assert_eq!(attempts, 3);
/// assert_eq!(err.unwrap().to_string(), "connection error");
/// ```
pub trait Retry {
    /// Report the previous attempt's error (`None` for success) and ask
    /// whether to attempt again.
    fn next(&mut self, err: Option<&dyn Error>) -> bool;

    /// Like [`next`](Retry::next), but also treats a 5xx response as a
    /// failure when no error was reported.
    ///
    /// A caller-supplied error always passes through unchanged. A missing
    /// response, or one with a status below 500, leaves the decision to
    /// `err` alone.
    fn http_next(&mut self, response: Option<&dyn HttpStatus>, err: Option<&dyn Error>) -> bool {
        match server_failure(response, err.is_some()) {
            Some(server_err) => {
                debug!(status = server_err.status, "treating server error response as failure");
                self.next(Some(&server_err))
            }
            None => self.next(err),
        }
    }

    /// [`next`](Retry::next) for callers holding a `Result`.
    fn next_result<T, E: Error>(&mut self, result: &Result<T, E>) -> bool
    where
        Self: Sized,
    {
        self.next(result.as_ref().err().map(|e| e as &dyn Error))
    }

    /// [`http_next`](Retry::http_next) for callers holding a `Result` whose
    /// success value is the response.
    fn http_next_result<R: HttpStatus, E: Error>(&mut self, result: &Result<R, E>) -> bool
    where
        Self: Sized,
    {
        match result {
            Ok(response) => self.http_next(Some(response), None),
            Err(err) => self.http_next(None, Some(err)),
        }
    }
}

/// Counting retry controller.
///
/// Holds the attempt count, the attempt limit and the backoff function. Only
/// the count changes after construction. Build a new `Retryer` for every
/// logical operation (a [`factory`] makes that cheap); reusing one carries
/// the old count over.
///
/// Once a `Retryer` has returned `false` it stays terminal: further calls
/// return `false` without sleeping.
pub struct Retryer {
    attempt: u32,
    max_attempts: u32,
    terminal: bool,
    duration_fn: DurationFunc,
    sleeper: Sleeper,
}

impl Retryer {
    /// Create a `Retryer` allowing up to `max_attempts` attempts, waiting
    /// between them according to `duration_fn`.
    ///
    /// A `max_attempts` of 0 is treated as 1: the operation always runs at
    /// least once.
    pub fn new(max_attempts: u32, duration_fn: DurationFunc) -> Self {
        Self {
            attempt: 0,
            max_attempts: max_attempts.max(1),
            terminal: false,
            duration_fn,
            sleeper: Arc::new(std::thread::sleep),
        }
    }

    /// Replace the blocking sleep with `sleeper`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use retryer::retry::{Retry, exp};
    /// use std::sync::{Arc, Mutex};
    /// use std::time::Duration;
    ///
    /// let waited = Arc::new(Mutex::new(Vec::new()));
    /// let log = Arc::clone(&waited);
    /// let mut retryer = exp(2, Duration::from_secs(5))
    ///     .with_sleeper(move |d| log.lock().unwrap().push(d));
    ///
    /// let failure = std::io::Error::other("boom");
    /// assert!(retryer.next(None));
    /// assert!(retryer.next(Some(&failure)));
    /// assert!(!retryer.next(Some(&failure)));
    ///
    /// assert_eq!(*waited.lock().unwrap(), vec![Duration::from_secs(5)]);
    /// ```
    pub fn with_sleeper(mut self, sleeper: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Number of attempts permitted so far.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    /// The attempt limit (always >= 1).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn stop(&mut self) -> bool {
        self.terminal = true;
        false
    }
}

impl Retry for Retryer {
    fn next(&mut self, err: Option<&dyn Error>) -> bool {
        // Always run the first attempt
        if self.attempt == 0 {
            self.attempt = 1;
            return true;
        }

        if self.terminal {
            return false;
        }

        let Some(err) = err else {
            trace!(attempt = self.attempt, "attempt succeeded");
            return self.stop();
        };

        if self.attempt >= self.max_attempts {
            debug!(
                attempt = self.attempt,
                max_attempts = self.max_attempts,
                error = %err,
                "retry budget exhausted"
            );
            return self.stop();
        }

        let delay = (self.duration_fn)(self.attempt);
        debug!(
            attempt = self.attempt,
            max_attempts = self.max_attempts,
            delay = ?delay,
            error = %err,
            "attempt failed, backing off"
        );
        (self.sleeper)(delay);
        self.attempt += 1;
        true
    }
}

impl fmt::Debug for Retryer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retryer")
            .field("attempt", &self.attempt)
            .field("max_attempts", &self.max_attempts)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

/// Shorthand for [`Retryer::new`] with [`exp_duration`]`(base)` backoff.
pub fn exp(max_attempts: u32, base: Duration) -> Retryer {
    Retryer::new(max_attempts, exp_duration(base))
}

/// Capture a retry policy once and mint independent `Retryer`s from it.
///
/// # Examples
///
/// ```rust
/// use retryer::retry::{exp_duration, factory};
/// use std::time::Duration;
///
/// let make = factory(5, exp_duration(Duration::from_millis(100)));
///
/// let first = make();
/// let second = make();
/// assert_eq!(first.max_attempts(), 5);
/// assert_eq!(second.attempts(), 0);
/// ```
pub fn factory(max_attempts: u32, duration_fn: DurationFunc) -> RetryerFactory {
    Arc::new(move || Retryer::new(max_attempts, Arc::clone(&duration_fn)))
}
