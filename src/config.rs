//! Run configuration.
//!
//! Everything the scheduler needs to know about the process (which CI voter to
//! trust, how long to wait between cycles, whether to post at all) is carried
//! in an explicit `RecheckConfig` rather than read from globals.

use std::time::Duration;

use thiserror::Error;

use crate::gerrit::RetryConfig;
use crate::worker::PollConfig;

/// Review service used when neither `--gerrit-url` nor `GERRIT_URL` is set.
pub const DEFAULT_GERRIT_URL: &str = "https://review.opendev.org";

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Environment variable read by `--gerrit-url`.
pub const GERRIT_URL_ENV: &str = "GERRIT_URL";

/// Errors in configuration supplied through the environment or flags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    InvalidEnv {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// How to reach the review service.
#[derive(Debug, Clone, PartialEq)]
pub struct GerritConfig {
    /// Base URL of the instance, e.g. `https://review.opendev.org`.
    pub url: String,
    pub request_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for GerritConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_GERRIT_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryConfig::DEFAULT,
        }
    }
}

/// Identity and conventions of the CI system whose votes are authoritative.
///
/// The reset rule in the timeline reconciler depends on the CI system tagging
/// its status messages with `status_tag_prefix`; if the service changes that
/// convention, the prefix must change with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiIdentity {
    /// Display name of the CI account on the verification label.
    pub voter_name: String,
    /// The verification label.
    pub label: String,
    /// The vote value meaning "approved".
    pub approve_value: i32,
    /// Tag prefix on the CI system's own status messages.
    pub status_tag_prefix: String,
    /// Line prefix in a status message reporting a failed build.
    pub failure_marker: String,
    /// Token a human starts a line with to request a re-run (case-insensitive).
    pub recheck_token: String,
}

impl CiIdentity {
    /// Zuul on the Verified label, as deployed on OpenDev.
    pub fn zuul() -> Self {
        Self {
            voter_name: "Zuul".to_string(),
            label: "Verified".to_string(),
            approve_value: 2,
            status_tag_prefix: "autogenerated:zuul:".to_string(),
            failure_marker: "Build failed".to_string(),
            recheck_token: "recheck".to_string(),
        }
    }

    /// Returns a copy voting under a different display name.
    pub fn with_voter_name(mut self, name: impl Into<String>) -> Self {
        self.voter_name = name.into();
        self
    }
}

impl Default for CiIdentity {
    fn default() -> Self {
        Self::zuul()
    }
}

/// Everything the poll scheduler needs, passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct RecheckConfig {
    pub ci: CiIdentity,
    pub poll: PollConfig,
    /// Evaluate and log, but never post, and stop after one pass.
    pub dry_run: bool,
    /// Body of the review posted to request a re-run.
    pub review_message: String,
}

impl Default for RecheckConfig {
    fn default() -> Self {
        Self {
            ci: CiIdentity::zuul(),
            poll: PollConfig::default(),
            dry_run: false,
            review_message: "recheck".to_string(),
        }
    }
}

impl RecheckConfig {
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
