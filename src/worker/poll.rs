//! Poll interval configuration.
//!
//! CI runs take tens of minutes, so the scheduler sleeps a long, fixed interval
//! between evaluation passes: 30 minutes by default, configurable via
//! `GERRIT_RECHECK_POLL_INTERVAL_MINS`.

use std::time::Duration;

use crate::config::ConfigError;

/// Environment variable overriding the poll interval, in whole minutes.
pub const POLL_INTERVAL_ENV: &str = "GERRIT_RECHECK_POLL_INTERVAL_MINS";

/// Default poll interval (30 minutes).
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30 * 60;

/// Configuration for the wait between evaluation passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between the end of one pass and the start of the next.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PollConfig {
    pub fn new() -> Self {
        PollConfig {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    pub fn with_interval(interval: Duration) -> Self {
        PollConfig { interval }
    }

    /// Reads `GERRIT_RECHECK_POLL_INTERVAL_MINS` through `lookup`.
    ///
    /// Unset means the default; a value that is not a positive integer is an
    /// error rather than being silently ignored.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let Some(raw) = lookup(POLL_INTERVAL_ENV) else {
            return Ok(Self::new());
        };
        let secs = raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|&m| m > 0)
            .and_then(|m| m.checked_mul(60))
            .ok_or_else(|| ConfigError::InvalidEnv {
                var: POLL_INTERVAL_ENV,
                expected: "a positive number of minutes",
                value: raw.clone(),
            })?;
        Ok(Self::with_interval(Duration::from_secs(secs)))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// The interval in whole minutes, for log lines.
    pub fn interval_minutes(&self) -> u64 {
        self.interval.as_secs() / 60
    }
}
