//! Retry policy configuration.

use crate::error::ConfigError;
use crate::retry::{DurationFunc, Retryer, RetryerFactory, exp_duration, factory};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

/// Environment variable holding the attempt limit.
pub const ENV_MAX_ATTEMPTS: &str = "RETRYER_MAX_ATTEMPTS";
/// Environment variable holding the base delay in milliseconds.
pub const ENV_BASE_DELAY_MS: &str = "RETRYER_BASE_DELAY_MS";

/// Exponential retry policy: an attempt limit and a base delay.
///
/// Serializes with the delay as integer milliseconds:
///
/// ```toml
/// max_attempts = 5
/// base_delay_ms = 250
/// ```
///
/// Missing fields fall back to the defaults.
///
/// # Examples
///
/// ```rust
/// use retryer::config::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::builder()
///     .max_attempts(5)
///     .base_delay(Duration::from_millis(250))
///     .build();
///
/// let make = config.factory();
/// assert_eq!(make().max_attempts(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first. Values below 1
    /// behave as 1.
    pub max_attempts: u32,

    /// Delay after the first failed attempt; later delays grow by `e`.
    #[serde(rename = "base_delay_ms", with = "millis")]
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    /// Defaults:
    /// - `max_attempts`: 3
    /// - `base_delay`: 100ms
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryConfig {
    /// Create a new builder for configuring a retry policy.
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `RETRYER_MAX_ATTEMPTS` for the attempt limit
    /// - `RETRYER_BASE_DELAY_MS` for the base delay in milliseconds
    ///
    /// Unset variables keep their defaults. A variable that is set but does
    /// not parse as an unsigned integer is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(max_attempts) = parse_env::<u32>(ENV_MAX_ATTEMPTS)? {
            config.max_attempts = max_attempts;
        }

        if let Some(millis) = parse_env::<u64>(ENV_BASE_DELAY_MS)? {
            config.base_delay = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// The exponential backoff function for this policy.
    pub fn duration_fn(&self) -> DurationFunc {
        exp_duration(self.base_delay)
    }

    /// A fresh controller for one logical operation.
    pub fn retryer(&self) -> Retryer {
        Retryer::new(self.max_attempts, self.duration_fn())
    }

    /// A factory minting controllers with this policy.
    pub fn factory(&self) -> RetryerFactory {
        factory(self.max_attempts, self.duration_fn())
    }
}

fn parse_env<T>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(value) = std::env::var(var) else {
        return Ok(None);
    };

    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => Err(ConfigError::InvalidEnv {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

/// Builder for configuring [`RetryConfig`].
///
/// Unset parameters use the defaults.
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    max_attempts: Option<u32>,
    base_delay: Option<Duration>,
}

impl RetryConfigBuilder {
    /// Set the maximum number of attempts.
    ///
    /// Default: 3
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the delay after the first failed attempt.
    ///
    /// Default: 100ms
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    /// Build the `RetryConfig` instance.
    pub fn build(self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            base_delay: self.base_delay.unwrap_or(DEFAULT_BASE_DELAY),
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
