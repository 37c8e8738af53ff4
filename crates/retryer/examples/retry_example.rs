//! Example: driving a retry loop with `Retryer`
//!
//! This example demonstrates:
//! 1. The happy and unhappy paths of a plain error loop
//! 2. Retrying HTTP responses on 5xx status codes
//! 3. The exponential backoff schedule
//! 4. A policy loaded from the environment and shared through a factory
//!
//! Run with:
//! ```bash
//! RUST_LOG=retryer=debug cargo run -p retryer --example retry_example
//! ```

use retryer::prelude::*;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// A simulated service that fails the first few calls
struct UnreliableApi {
    calls: u32,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Self {
        Self {
            calls: 0,
            fail_count,
        }
    }

    fn call(&mut self) -> Result<String, std::io::Error> {
        self.calls += 1;
        if self.calls <= self.fail_count {
            println!("  Attempt {}: FAILED", self.calls);
            Err(std::io::Error::other("connection error"))
        } else {
            println!("  Attempt {}: SUCCESS", self.calls);
            Ok("payload".to_string())
        }
    }

    fn status(&mut self) -> u16 {
        self.calls += 1;
        let status = if self.calls <= self.fail_count { 503 } else { 200 };
        println!("  Attempt {}: HTTP {}", self.calls, status);
        status
    }
}

fn example_error_loop() {
    println!("\n=== Example 1: Plain Error Loop ===\n");

    for (label, fail_count) in [("Happy path", 1), ("Unhappy path", 10)] {
        println!("> {}", label);
        let mut api = UnreliableApi::new(fail_count);
        let mut result: Result<String, std::io::Error> = Ok(String::new());

        let mut retryer = Retryer::new(3, no_delay());
        while retryer.next_result(&result) {
            result = api.call();
        }

        match result {
            Ok(body) => println!("  Result: {}", body),
            Err(err) => println!("  Err: {}", err),
        }
    }
}

fn example_http_loop() {
    println!("\n=== Example 2: HTTP Status Loop ===\n");

    let mut api = UnreliableApi::new(2);
    let mut status = 0u16;
    let mut retryer = exp(5, Duration::from_millis(10));
    let start = Instant::now();

    while retryer.http_next(Some(&status), None) {
        status = api.status();
    }

    println!("\nFinal status: {}", status);
    println!("Total attempts: {}", retryer.attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 10ms + 27ms = ~37ms");
}

fn example_schedule() {
    println!("\n=== Example 3: Exponential Schedule ===\n");

    let df = exp_duration(Duration::from_millis(1));
    for attempt in 1..=5 {
        println!("  After attempt {}: wait {:?}", attempt, df(attempt));
    }
}

fn example_factory() -> anyhow::Result<()> {
    println!("\n=== Example 4: Policy From Environment ===\n");

    let config = RetryConfig::from_env()?;
    println!("  Config: {:?}", config);

    let make = config.factory();
    for operation in ["fetch-user", "fetch-orders"] {
        let mut api = UnreliableApi::new(1);
        let mut result: Result<String, std::io::Error> = Ok(String::new());
        let mut retryer = make();

        while retryer.next_result(&result) {
            result = api.call();
        }
        println!("  {}: {} attempt(s)", operation, retryer.attempts());
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("==============================================");
    println!("   Retryer Examples");
    println!("==============================================");

    example_error_loop();
    example_http_loop();
    example_schedule();
    example_factory()?;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
