//! CI vote classification.
//!
//! Pure function of a change's label snapshot: decides whether CI has
//! approved the change, is still making up its mind, or has voted against it
//! (in which case the message timeline decides whether to ask for a re-run).

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::CiIdentity;
use crate::types::{Label, TimestampError, parse_timestamp};

/// Why a change is neither approved nor eligible for a re-run request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingReason {
    /// The verification label is missing entirely.
    NoVerificationVotes,
    /// The label exists but the CI voter is not listed on it.
    CiNotVoted,
    /// CI voted zero or a partial positive value.
    WaitingForApproval { value: i32 },
}

impl fmt::Display for PendingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingReason::NoVerificationVotes => write!(f, "No verification votes"),
            PendingReason::CiNotVoted => write!(f, "CI has not voted"),
            PendingReason::WaitingForApproval { value } => {
                write!(f, "CI voted {:+}, waiting for approval", value)
            }
        }
    }
}

/// Classification of the CI vote on a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteStatus {
    Approved,
    Pending(PendingReason),
    /// CI voted negative at `voted_at`.
    NeedsTimelineCheck { value: i32, voted_at: DateTime<Utc> },
}

/// A negative vote whose timestamp cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("CI vote {value:+} by {voter} has no date")]
    MissingDate { voter: String, value: i32 },

    #[error("error parsing CI vote date: {0}")]
    InvalidDate(#[from] TimestampError),
}

/// Classifies the CI vote in `labels`.
///
/// Only the first vote by `ci.voter_name` on `ci.label` counts. A vote's date
/// is only parsed when the vote is negative.
pub fn evaluate_vote(
    labels: &BTreeMap<String, Label>,
    ci: &CiIdentity,
) -> Result<VoteStatus, VoteError> {
    let Some(label) = labels.get(&ci.label) else {
        return Ok(VoteStatus::Pending(PendingReason::NoVerificationVotes));
    };
    let Some(vote) = label.vote_by(&ci.voter_name) else {
        return Ok(VoteStatus::Pending(PendingReason::CiNotVoted));
    };

    if vote.value == ci.approve_value {
        return Ok(VoteStatus::Approved);
    }
    if vote.value >= 0 {
        return Ok(VoteStatus::Pending(PendingReason::WaitingForApproval {
            value: vote.value,
        }));
    }

    let raw = vote.date.as_deref().ok_or_else(|| VoteError::MissingDate {
        voter: ci.voter_name.clone(),
        value: vote.value,
    })?;
    Ok(VoteStatus::NeedsTimelineCheck {
        value: vote.value,
        voted_at: parse_timestamp(raw)?,
    })
}
