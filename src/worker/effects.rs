//! Effect execution with cancellation support.
//!
//! `EffectExecutor` runs `GerritEffect`s through an injected interpreter and
//! races each one against a `CancellationToken`, so Ctrl-C interrupts an
//! in-flight request instead of waiting for it (and its retries) to finish.
//!
//! The typed helpers (`fetch_change`, `fetch_detail`, ...) unwrap the expected
//! `GerritResponse` variant so callers never match on responses themselves.

use std::fmt;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::effects::{GerritEffect, GerritInterpreter, GerritResponse};
use crate::types::{ChangeDetail, ChangeRef, ChangeSummary, RelatedChange, RevisionNumber};

/// Errors from effect execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    /// Operation was cancelled via CancellationToken.
    #[error("operation cancelled")]
    Cancelled,

    /// The review service call failed.
    #[error("{0}")]
    Gerrit(String),

    /// The interpreter answered with the wrong response variant.
    #[error("expected {expected} response, got {actual}")]
    UnexpectedResponse {
        expected: &'static str,
        actual: &'static str,
    },
}

impl EffectError {
    /// Returns true if this is a cancellation error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EffectError::Cancelled)
    }
}

/// Executes effects with cancellation support.
///
/// ```ignore
/// let executor = EffectExecutor::new(gerrit_client, cancel_token);
/// let detail = executor.fetch_detail(&change).await?;
/// ```
pub struct EffectExecutor<G> {
    gerrit: G,
    cancel: CancellationToken,
}

impl<G> EffectExecutor<G>
where
    G: GerritInterpreter,
    G::Error: fmt::Display,
{
    pub fn new(gerrit: G, cancel: CancellationToken) -> Self {
        EffectExecutor { gerrit, cancel }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Executes an effect, racing it against cancellation.
    ///
    /// Returns `Err(EffectError::Cancelled)` if the token was triggered before
    /// or during execution.
    #[instrument(skip(self))]
    pub async fn execute(&self, effect: GerritEffect) -> Result<GerritResponse, EffectError> {
        if self.cancel.is_cancelled() {
            debug!("Cancellation detected before effect execution");
            return Err(EffectError::Cancelled);
        }

        trace!("Executing Gerrit effect");
        tokio::select! {
            biased;

            _ = self.cancel.cancelled() => {
                debug!("Gerrit effect cancelled");
                Err(EffectError::Cancelled)
            }
            result = self.gerrit.interpret(effect) => {
                result.map_err(|e| EffectError::Gerrit(e.to_string()))
            }
        }
    }

    pub async fn fetch_change(&self, change: &ChangeRef) -> Result<ChangeSummary, EffectError> {
        let effect = GerritEffect::GetChange {
            change: change.clone(),
        };
        match self.execute(effect).await? {
            GerritResponse::Change(summary) => Ok(summary),
            other => Err(unexpected("change", &other)),
        }
    }

    pub async fn fetch_related(
        &self,
        change: &ChangeRef,
        revision: RevisionNumber,
    ) -> Result<Vec<RelatedChange>, EffectError> {
        let effect = GerritEffect::GetRelatedChanges {
            change: change.clone(),
            revision,
        };
        match self.execute(effect).await? {
            GerritResponse::RelatedChanges(related) => Ok(related),
            other => Err(unexpected("related_changes", &other)),
        }
    }

    pub async fn fetch_detail(&self, change: &ChangeRef) -> Result<ChangeDetail, EffectError> {
        let effect = GerritEffect::GetChangeDetail {
            change: change.clone(),
        };
        match self.execute(effect).await? {
            GerritResponse::ChangeDetail(detail) => Ok(detail),
            other => Err(unexpected("change_detail", &other)),
        }
    }

    pub async fn post_review(&self, change: &ChangeRef, message: &str) -> Result<(), EffectError> {
        let effect = GerritEffect::PostReview {
            change: change.clone(),
            message: message.to_string(),
        };
        match self.execute(effect).await? {
            GerritResponse::ReviewPosted => Ok(()),
            other => Err(unexpected("review_posted", &other)),
        }
    }
}

fn unexpected(expected: &'static str, actual: &GerritResponse) -> EffectError {
    EffectError::UnexpectedResponse {
        expected,
        actual: actual.kind(),
    }
}
