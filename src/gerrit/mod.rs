//! Gerrit REST client and effect interpreter.
//!
//! This module executes `GerritEffect`s against a real Gerrit instance over
//! HTTPS with basic authentication.
//!
//! Key features:
//! - Anti-XSSI prefix stripping on every JSON response
//! - Percent-encoded change references in URLs
//! - Exponential backoff retry for transient failures
//! - Distinguishes transient vs permanent errors

mod client;
mod error;
mod interpreter;
mod retry;
mod wire;

pub use client::GerritClient;
pub use error::{GerritApiError, GerritErrorKind};
pub use interpreter::interpret_gerrit_effect;
pub use retry::{RetryConfig, RetryResult, retry_with_backoff};
pub use wire::{XSSI_PREFIX, strip_xssi};

#[cfg(test)]
mod http_tests;
