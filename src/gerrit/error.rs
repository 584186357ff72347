//! Review-service API error types.
//!
//! Errors are split into two kinds because the retry layer treats them
//! differently:
//!
//! - **Transient** errors are retriable (5xx, 429, connection failures, timeouts)
//! - **Permanent** errors are returned immediately (other 4xx, undecodable bodies)
//!
//! Neither kind is fatal to a poll cycle on its own: the scheduler logs the
//! error and tries the change again on the next cycle.

use std::fmt;
use thiserror::Error;

/// The kind of API error, categorized for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GerritErrorKind {
    /// Safe to retry with backoff.
    ///
    /// Examples:
    /// - HTTP 5xx (server errors)
    /// - HTTP 429 (rate limited)
    /// - Connection refused, DNS failure, request timeout
    Transient,

    /// Retrying will not help.
    ///
    /// Examples:
    /// - HTTP 401/403 (bad credentials or missing permission)
    /// - HTTP 404 (unknown change)
    /// - HTTP 409 (change is closed, review not allowed)
    /// - A response body that is not the JSON we expect
    Permanent,
}

impl GerritErrorKind {
    /// Returns true if this error is retriable.
    pub fn is_retriable(&self) -> bool {
        matches!(self, GerritErrorKind::Transient)
    }

    /// Categorizes an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => GerritErrorKind::Transient,
            code if (500..600).contains(&code) => GerritErrorKind::Transient,
            _ => GerritErrorKind::Permanent,
        }
    }
}

/// A review-service API error with categorization for retry decisions.
#[derive(Debug, Error)]
pub struct GerritApiError {
    pub kind: GerritErrorKind,

    /// The HTTP status code, if the server answered.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying transport error, if any.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for GerritApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "Gerrit API error (HTTP {}): {}", code, self.message),
            None => write!(f, "Gerrit API error: {}", self.message),
        }
    }
}

/// Longest response body excerpt carried in an error message.
const MAX_BODY_EXCERPT: usize = 400;

impl GerritApiError {
    /// Creates an error for a non-success HTTP response.
    pub fn from_status(operation: &str, status: u16, body: &str) -> Self {
        let excerpt = truncate(body.trim(), MAX_BODY_EXCERPT);
        let message = if excerpt.is_empty() {
            format!("{} failed", operation)
        } else {
            format!("{} failed: {}", operation, excerpt)
        };
        Self {
            kind: GerritErrorKind::from_status(status),
            status_code: Some(status),
            message,
            source: None,
        }
    }

    /// Categorizes a reqwest error.
    ///
    /// Connection-level failures and timeouts are transient. A body that
    /// fails to decode is permanent: the same request will return the same
    /// body.
    pub fn from_reqwest(operation: &str, err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let kind = match status_code {
            Some(code) => GerritErrorKind::from_status(code),
            None if err.is_timeout() || err.is_connect() || err.is_request() => {
                GerritErrorKind::Transient
            }
            None => GerritErrorKind::Permanent,
        };
        Self {
            kind,
            status_code,
            message: format!("{} failed: {}", operation, err),
            source: Some(err),
        }
    }

    /// Creates an error for a response body that could not be decoded.
    pub fn decode(operation: &str, err: impl fmt::Display) -> Self {
        Self::permanent_without_source(format!("{}: invalid response body: {}", operation, err))
    }

    /// Creates a permanent error without a transport source.
    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: GerritErrorKind::Permanent,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transient error without a transport source.
    pub fn transient_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: GerritErrorKind::Transient,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
