//! The poll scheduler: resolve once, then evaluate and wait until done.
//!
//! ```text
//! Resolving ──ok──▶ Evaluating ──pass──▶ Waiting ──interval──▶ Evaluating
//!     │                  │                  │
//!     └─err─▶ Failed     └─all approved─▶ Done ◀─cancel─┘
//!                          or dry run
//! ```
//!
//! Evaluation within a pass is sequential in tracked-set order. Per-change
//! errors are logged and leave the change pending; only resolution errors end
//! the run with an error.

use std::fmt;

use tracing::{error, info, warn};

use crate::config::RecheckConfig;
use crate::effects::GerritInterpreter;
use crate::recheck::{ResolveError, resolve_all};
use crate::types::{ChangeNumber, TrackedChangeSet};

use super::check::{CheckOutcome, check_change};
use super::effects::EffectExecutor;
use super::poster::{PostOutcome, ReviewPoster};

/// Why the scheduler stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    AllApproved,
    /// Dry-run mode stops after a single pass.
    DryRun,
    Cancelled,
}

/// Scheduler states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerState {
    Resolving,
    Evaluating(TrackedChangeSet),
    Waiting(TrackedChangeSet),
    Done {
        reason: DoneReason,
        tracked: TrackedChangeSet,
    },
    Failed(ResolveError),
}

/// State after an evaluation pass that was not cancelled.
pub fn after_pass(tracked: TrackedChangeSet, dry_run: bool) -> SchedulerState {
    if tracked.all_approved() {
        SchedulerState::Done {
            reason: DoneReason::AllApproved,
            tracked,
        }
    } else if dry_run {
        SchedulerState::Done {
            reason: DoneReason::DryRun,
            tracked,
        }
    } else {
        SchedulerState::Waiting(tracked)
    }
}

/// Counts from one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub evaluated: usize,
    pub newly_approved: usize,
    pub rechecks_posted: usize,
    pub errors: usize,
    pub cancelled: bool,
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: DoneReason,
    pub passes: usize,
    pub rechecks_posted: usize,
    pub tracked: TrackedChangeSet,
}

/// Drives repeated evaluation of the tracked set.
pub struct PollScheduler<G> {
    executor: EffectExecutor<G>,
    poster: ReviewPoster,
    config: RecheckConfig,
}

impl<G> PollScheduler<G>
where
    G: GerritInterpreter,
    G::Error: fmt::Display,
{
    pub fn new(executor: EffectExecutor<G>, config: RecheckConfig) -> Self {
        let poster = ReviewPoster::new(config.review_message.clone(), config.dry_run);
        Self {
            executor,
            poster,
            config,
        }
    }

    /// Runs from `Resolving` until a terminal state.
    pub async fn run(&self, roots: &[ChangeNumber]) -> Result<RunSummary, ResolveError> {
        let mut state = SchedulerState::Resolving;
        let mut passes = 0;
        let mut rechecks_posted = 0;

        loop {
            state = match state {
                SchedulerState::Resolving => self.resolve(roots).await,
                SchedulerState::Evaluating(mut tracked) => {
                    let report = self.evaluate_pass(&mut tracked).await;
                    passes += 1;
                    rechecks_posted += report.rechecks_posted;
                    if report.cancelled {
                        SchedulerState::Done {
                            reason: DoneReason::Cancelled,
                            tracked,
                        }
                    } else {
                        after_pass(tracked, self.config.dry_run)
                    }
                }
                SchedulerState::Waiting(tracked) => self.wait(tracked).await,
                SchedulerState::Done { reason, tracked } => {
                    match reason {
                        DoneReason::AllApproved => info!("All changes have merged. Exiting..."),
                        DoneReason::DryRun => info!("Running in dry-run mode. Exiting..."),
                        DoneReason::Cancelled => warn!("Cancelled. Exiting..."),
                    }
                    return Ok(RunSummary {
                        reason,
                        passes,
                        rechecks_posted,
                        tracked,
                    });
                }
                SchedulerState::Failed(err) => return Err(err),
            };
        }
    }

    async fn resolve(&self, roots: &[ChangeNumber]) -> SchedulerState {
        match resolve_all(&self.executor, roots).await {
            Ok(tracked) => {
                info!(count = tracked.len(), "Resolved tracked changes");
                SchedulerState::Evaluating(tracked)
            }
            Err(err) if err.is_cancelled() => SchedulerState::Done {
                reason: DoneReason::Cancelled,
                tracked: TrackedChangeSet::new(),
            },
            Err(err) => SchedulerState::Failed(err),
        }
    }

    /// Evaluates every unapproved change once, in insertion order.
    pub async fn evaluate_pass(&self, tracked: &mut TrackedChangeSet) -> PassReport {
        let mut report = PassReport::default();
        let pending: Vec<_> = tracked.pending().cloned().collect();

        for change in pending {
            report.evaluated += 1;
            match check_change(&self.executor, &self.poster, &change, &self.config).await {
                Ok(CheckOutcome::Approved) => {
                    tracked.mark_approved(&change.id);
                    report.newly_approved += 1;
                }
                Ok(CheckOutcome::Rechecked(PostOutcome::Posted)) => report.rechecks_posted += 1,
                Ok(_) => {}
                Err(err) if err.is_cancelled() => {
                    report.cancelled = true;
                    break;
                }
                Err(err) => {
                    error!(change = %change.target, "{}", err);
                    report.errors += 1;
                }
            }
        }

        info!(
            evaluated = report.evaluated,
            approved = report.newly_approved,
            posted = report.rechecks_posted,
            errors = report.errors,
            pending = tracked.pending_count(),
            "Pass complete"
        );
        report
    }

    async fn wait(&self, tracked: TrackedChangeSet) -> SchedulerState {
        info!("Waiting for {} minutes", self.config.poll.interval_minutes());
        let cancel = self.executor.cancel_token();
        tokio::select! {
            biased;

            _ = cancel.cancelled() => SchedulerState::Done {
                reason: DoneReason::Cancelled,
                tracked,
            },
            _ = tokio::time::sleep(self.config.poll.interval) => SchedulerState::Evaluating(tracked),
        }
    }
}
