//! Integration tests driving the controller the way callers do: as a loop
//! condition around a fallible operation.

use proptest::prelude::*;
use retryer::prelude::*;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct ConnectionError(u32);

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection error on attempt {}", self.0)
    }
}

impl std::error::Error for ConnectionError {}

/// Run a retry loop whose attempt `n` (1-based) fails when `fails(n)` is true.
/// Returns the number of attempts and the final outcome.
fn drive(
    mut retryer: impl Retry,
    fails: impl Fn(u32) -> bool,
) -> (u32, Result<(), ConnectionError>) {
    let mut attempts = 0;
    let mut result: Result<(), ConnectionError> = Ok(());

    while retryer.next_result(&result) {
        attempts += 1;
        result = if fails(attempts) {
            Err(ConnectionError(attempts))
        } else {
            Ok(())
        };
    }

    (attempts, result)
}

#[test]
fn test_happy_path_stops_after_success() {
    let (attempts, result) = drive(Retryer::new(3, no_delay()), |n| n < 2);

    assert_eq!(attempts, 2);
    assert!(result.is_ok());
}

#[test]
fn test_unhappy_path_reports_last_failure() {
    let retryer = exp(3, Duration::from_millis(1)).with_sleeper(|_| {});
    let (attempts, result) = drive(retryer, |_| true);

    assert_eq!(attempts, 3);
    assert_eq!(result, Err(ConnectionError(3)));
}

#[test]
fn test_decision_sequence_all_failures() {
    let mut retryer = exp(3, Duration::from_millis(1)).with_sleeper(|_| {});
    let err = ConnectionError(0);

    let decisions: Vec<bool> = (0..4).map(|_| retryer.next(Some(&err))).collect();

    assert_eq!(decisions, vec![true, true, true, false]);
}

#[test]
fn test_decision_sequence_fail_then_succeed() {
    let mut retryer = Retryer::new(3, no_delay());
    let err = ConnectionError(1);

    assert!(retryer.next(None));
    assert!(retryer.next(Some(&err)));
    assert!(!retryer.next(None));
    assert_eq!(retryer.attempts(), 2);
}

#[test]
fn test_real_sleep_is_observable() {
    let base = Duration::from_millis(5);
    let retryer = exp(2, base);
    let started = std::time::Instant::now();

    let (attempts, _) = drive(retryer, |_| true);

    assert_eq!(attempts, 2);
    assert!(started.elapsed() >= base);
}

#[test]
fn test_http_loop_retries_until_healthy() {
    let make = factory(5, no_delay());
    let mut retryer = make();
    let statuses = [503u16, 502, 200];
    let mut seen = Vec::new();
    let mut response: Option<http::Response<()>> = None;

    while retryer.http_next(response.as_ref().map(|r| r as &dyn HttpStatus), None) {
        let status = statuses[seen.len()];
        seen.push(status);
        response = Some(
            http::Response::builder()
                .status(status)
                .body(())
                .unwrap(),
        );
    }

    assert_eq!(seen, vec![503, 502, 200]);
    assert_eq!(retryer.attempts(), 3);
}

#[test]
fn test_http_client_errors_are_not_retried() {
    let mut retryer = Retryer::new(5, no_delay());
    let mut attempts = 0;
    let mut status = 0u16;

    while retryer.http_next(Some(&status), None) {
        attempts += 1;
        status = 404;
    }

    assert_eq!(attempts, 1);
}

#[test]
fn test_factory_shared_across_operations() {
    let make = RetryConfig::builder()
        .max_attempts(2)
        .base_delay(Duration::ZERO)
        .build()
        .factory();

    let (first, _) = drive(make(), |_| true);
    let (second, _) = drive(make(), |_| true);
    let (third, _) = drive(make(), |_| false);

    assert_eq!((first, second, third), (2, 2, 1));
}

proptest! {
    #[test]
    fn prop_attempts_bounded_by_limit(limit in 1u32..20, fail_until in 0u32..30) {
        let (attempts, _) = drive(Retryer::new(limit, no_delay()), |n| n <= fail_until);

        prop_assert!(attempts >= 1);
        prop_assert!(attempts <= limit);
        prop_assert_eq!(attempts, limit.min(fail_until + 1));
    }

    #[test]
    fn prop_all_failures_continue_exactly_limit_times(limit in 1u32..50) {
        let mut retryer = Retryer::new(limit, no_delay());
        let err = ConnectionError(0);

        let mut continues = 0;
        while retryer.next(Some(&err)) {
            continues += 1;
        }

        prop_assert_eq!(continues, limit);
        prop_assert_eq!(retryer.attempts(), limit);
    }

    #[test]
    fn prop_success_ends_after_one_attempt(limit in 0u32..100) {
        let mut retryer = Retryer::new(limit, no_delay());

        prop_assert!(retryer.next(None));
        prop_assert!(!retryer.next(None));
        prop_assert_eq!(retryer.attempts(), 1);
    }

    #[test]
    fn prop_first_call_always_true(limit in 0u32..100, failed in any::<bool>(), status in 100u16..600) {
        let err = ConnectionError(0);
        let outcome = failed.then_some(&err as &dyn std::error::Error);

        prop_assert!(Retryer::new(limit, no_delay()).next(outcome));
        prop_assert!(Retryer::new(limit, no_delay()).http_next(Some(&status), outcome));
    }

    #[test]
    fn prop_http_next_matches_next(limit in 1u32..10, statuses in prop::collection::vec(100u16..600, 1..12)) {
        let mut plain = Retryer::new(limit, no_delay());
        let mut via_http = Retryer::new(limit, no_delay());
        let err = ConnectionError(0);

        prop_assert!(plain.next(None));
        prop_assert!(via_http.http_next(None, None));

        for status in statuses {
            let outcome = (status >= 500).then_some(&err as &dyn std::error::Error);
            prop_assert_eq!(plain.next(outcome), via_http.http_next(Some(&status), None));
        }
    }

    #[test]
    fn prop_exp_duration_strictly_increasing(base_ms in 1u64..1_000, attempt in 1u32..20) {
        let df = exp_duration(Duration::from_millis(base_ms));

        prop_assert_eq!(df(1), Duration::from_millis(base_ms));
        prop_assert!(df(attempt + 1) > df(attempt));
    }
}
