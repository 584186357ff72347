//! Reconciles a negative CI vote against the change's message timeline.
//!
//! A single forward pass over the messages newer than the vote:
//!
//! - an untagged message with a line starting with the recheck token (after
//!   trimming, case-insensitively) becomes the current recheck request
//! - a CI status message newer than the current request whose body reports a
//!   failed build moves the effective vote date forward and drops the request
//!
//! If a request survives and is newer than the effective vote, CI is already
//! re-running and nothing is posted.

use chrono::{DateTime, Utc};

use crate::config::CiIdentity;
use crate::types::Message;

/// A human request for a CI re-run found on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecheckRequest {
    pub author: String,
    pub date: DateTime<Utc>,
}

/// What to do about a change whose CI vote is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// A recheck newer than the vote is already pending.
    Skip,
    /// The negative vote is the latest word; ask for a re-run.
    Stale,
}

/// Outcome of reconciling one change's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The vote date after applying every failed-build reset.
    pub ci_vote_date: DateTime<Utc>,
    /// The surviving recheck request, if any.
    pub recheck: Option<RecheckRequest>,
    pub decision: Decision,
}

impl Reconciliation {
    pub fn should_post(&self) -> bool {
        self.decision == Decision::Stale
    }
}

/// Scans `messages` (oldest first) forward from `ci_vote_date`.
pub fn reconcile(
    messages: &[Message],
    ci_vote_date: DateTime<Utc>,
    ci: &CiIdentity,
) -> Reconciliation {
    let mut vote_date = ci_vote_date;
    let mut recheck: Option<RecheckRequest> = None;

    for message in messages {
        if message.date <= vote_date {
            continue;
        }

        if message.is_untagged() {
            if requests_recheck(&message.body, &ci.recheck_token) {
                recheck = Some(RecheckRequest {
                    author: message.author_name().to_string(),
                    date: message.date,
                });
            }
            continue;
        }

        let newer_than_request = recheck.as_ref().is_none_or(|r| message.date > r.date);
        if newer_than_request
            && message.has_tag_prefix(&ci.status_tag_prefix)
            && reports_failure(&message.body, &ci.failure_marker)
        {
            vote_date = message.date;
            recheck = None;
        }
    }

    let decision = match &recheck {
        Some(request) if request.date > vote_date => Decision::Skip,
        _ => Decision::Stale,
    };

    Reconciliation {
        ci_vote_date: vote_date,
        recheck,
        decision,
    }
}

fn requests_recheck(body: &str, token: &str) -> bool {
    let token = token.to_lowercase();
    body.lines()
        .any(|line| line.trim().to_lowercase().starts_with(&token))
}

// Status lines are matched as sent, without trimming or case folding.
fn reports_failure(body: &str, marker: &str) -> bool {
    body.lines().any(|line| line.starts_with(marker))
}
