//! Backoff functions.

use std::sync::Arc;
use std::time::Duration;

/// How long to wait between attempts.
///
/// The function receives the 1-based index of the attempt that just failed
/// and returns the delay before the next one. It must be pure: calling it
/// twice with the same index yields the same `Duration`.
///
/// The function is shared (`Arc`) so a single policy can back any number of
/// independent [`Retryer`](super::Retryer)s.
///
/// # Examples
///
/// ```rust
/// use retryer::retry::DurationFunc;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// // Linear backoff: 100ms, 200ms, 300ms, ...
/// let linear: DurationFunc = Arc::new(|attempt: u32| Duration::from_millis(100) * attempt);
/// assert_eq!(linear(3), Duration::from_millis(300));
/// ```
pub type DurationFunc = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Exponential backoff starting from `base`.
///
/// # Mathematical Formula
///
/// ```text
/// delay(i) = base * e^(i - 1)
/// ```
///
/// The first delay is exactly `base`. Growth is continuous, so successive
/// delays are not integer multiples of each other; fractional nanoseconds
/// are truncated. There is no upper cap: wrap the function if you need one.
/// Results too large for `Duration` saturate to `Duration::MAX`.
///
/// # Examples
///
/// ```rust
/// use retryer::retry::exp_duration;
/// use std::time::Duration;
///
/// let df = exp_duration(Duration::from_millis(1));
/// assert_eq!(df(1), Duration::from_millis(1));
/// assert!(df(2) > Duration::from_micros(2_718));
/// assert!(df(2) < Duration::from_micros(2_719));
/// ```
pub fn exp_duration(base: Duration) -> DurationFunc {
    Arc::new(move |attempt: u32| exp_delay(base, attempt))
}

/// Fixed delay between every pair of attempts.
pub fn constant_duration(delay: Duration) -> DurationFunc {
    Arc::new(move |_: u32| delay)
}

/// Never wait. Handy for tests that exercise the decision logic only.
pub fn no_delay() -> DurationFunc {
    constant_duration(Duration::ZERO)
}

fn exp_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = f64::from(attempt.saturating_sub(1));
    let nanos = base.as_nanos() as f64 * exponent.exp();

    if nanos >= u64::MAX as f64 {
        return Duration::MAX;
    }
    // `as` truncates toward zero, dropping the fractional nanosecond.
    Duration::from_nanos(nanos as u64)
}
