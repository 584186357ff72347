//! Evaluates one tracked change: fetch, classify the vote, reconcile the
//! timeline, and post a re-run request when the failure is stale.

use std::fmt;

use thiserror::Error;
use tracing::{info, instrument};

use crate::config::RecheckConfig;
use crate::effects::GerritInterpreter;
use crate::recheck::{Decision, PendingReason, RecheckRequest, VoteError, VoteStatus};
use crate::recheck::{evaluate_vote, reconcile};
use crate::types::{TrackedChange, pretty};

use super::effects::{EffectError, EffectExecutor};
use super::poster::{PostOutcome, ReviewPoster};

/// Result of evaluating one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Approved,
    Pending(PendingReason),
    /// A human recheck newer than the failure is already in flight.
    Skipped(RecheckRequest),
    /// The failure was stale and a re-run was requested.
    Rechecked(PostOutcome),
}

/// A per-change failure. Never fatal; the change stays pending.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("error fetching change details: {0}")]
    Fetch(#[source] EffectError),

    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error("error adding comment: {0}")]
    Post(#[source] EffectError),
}

impl CheckError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            CheckError::Fetch(e) | CheckError::Post(e) => e.is_cancelled(),
            CheckError::Vote(_) => false,
        }
    }
}

/// Runs the vote evaluator and, for a negative vote, the timeline reconciler.
#[instrument(skip_all, fields(change = %change.target))]
pub async fn check_change<G>(
    executor: &EffectExecutor<G>,
    poster: &ReviewPoster,
    change: &TrackedChange,
    config: &RecheckConfig,
) -> Result<CheckOutcome, CheckError>
where
    G: GerritInterpreter,
    G::Error: fmt::Display,
{
    let detail = executor
        .fetch_detail(&change.target)
        .await
        .map_err(CheckError::Fetch)?;
    info!(
        "Fetched change {} details: {}: {}",
        change.target, detail.id, detail.subject
    );

    let (value, voted_at) = match evaluate_vote(&detail.labels, &config.ci)? {
        VoteStatus::Approved => {
            info!("CI approved");
            return Ok(CheckOutcome::Approved);
        }
        VoteStatus::Pending(reason) => {
            info!("{}", reason);
            return Ok(CheckOutcome::Pending(reason));
        }
        VoteStatus::NeedsTimelineCheck { value, voted_at } => (value, voted_at),
    };
    info!("CI voted {:+} at {}", value, pretty(voted_at));

    let reconciliation = reconcile(&detail.messages, voted_at, &config.ci);
    if reconciliation.ci_vote_date != voted_at {
        info!(
            "CI reported another failure at {}",
            pretty(reconciliation.ci_vote_date)
        );
    }

    match (reconciliation.decision, reconciliation.recheck) {
        (Decision::Skip, Some(request)) => {
            info!(
                "Skipping comment: Rechecked by {} at {}",
                request.author,
                pretty(request.date)
            );
            Ok(CheckOutcome::Skipped(request))
        }
        _ => {
            let outcome = poster
                .post(executor, &change.target)
                .await
                .map_err(CheckError::Post)?;
            Ok(CheckOutcome::Rechecked(outcome))
        }
    }
}
