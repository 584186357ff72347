//! Snapshots of change state as returned by the review service.
//!
//! These are owned transiently per fetch. Nothing here is persisted or cached
//! between poll cycles, because new votes and messages can arrive at any time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ChangeId, ChangeNumber, RevisionNumber};
use super::timestamp::serde_timestamp;

/// Lifecycle status of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeStatus {
    New,
    Merged,
    Abandoned,
}

impl ChangeStatus {
    pub fn is_merged(&self) -> bool {
        matches!(self, ChangeStatus::Merged)
    }
}

/// The minimal view of a change needed to resolve its dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// The stable Change-Id.
    pub id: ChangeId,
    /// The numeric change number, when the service reports it.
    pub number: Option<ChangeNumber>,
    /// The current patch set.
    pub current_revision: RevisionNumber,
    pub subject: String,
}

/// One entry of a change's related-changes list.
///
/// The service orders the list from the tip of the series down to its base:
/// entries before the queried change depend on it, entries after it are its
/// dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedChange {
    pub id: ChangeId,
    pub number: Option<ChangeNumber>,
    pub status: Option<ChangeStatus>,
}

/// A single vote on a label.
///
/// `date` is kept as the raw service string: it is only parsed when the vote
/// is negative, and a malformed date then surfaces as a per-change error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalVote {
    /// Display name of the voter. Absent for accounts without a name.
    pub voter: Option<String>,
    /// Vote value; zero when the voter is listed but has not voted.
    pub value: i32,
    pub date: Option<String>,
}

/// All votes cast on one label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub all: Vec<ApprovalVote>,
}

impl Label {
    /// Returns the first vote cast by the named voter.
    pub fn vote_by(&self, voter: &str) -> Option<&ApprovalVote> {
        self.all.iter().find(|v| v.voter.as_deref() == Some(voter))
    }
}

/// A message on the change timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the author; absent for messages posted by the service itself.
    pub author: Option<String>,
    #[serde(with = "serde_timestamp")]
    pub date: DateTime<Utc>,
    /// Machine tag. Non-empty only for structured, bot-authored messages.
    pub tag: Option<String>,
    pub body: String,
}

impl Message {
    /// Returns true if the message carries no machine tag.
    pub fn is_untagged(&self) -> bool {
        self.tag.as_deref().is_none_or(str::is_empty)
    }

    /// Returns true if the message's tag starts with `prefix`.
    pub fn has_tag_prefix(&self, prefix: &str) -> bool {
        self.tag.as_deref().is_some_and(|tag| tag.starts_with(prefix))
    }

    pub fn author_name(&self) -> &str {
        self.author.as_deref().unwrap_or("<unknown>")
    }
}

/// A change with its labels and message timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDetail {
    pub id: ChangeId,
    pub subject: String,
    pub labels: BTreeMap<String, Label>,
    /// Chronological, oldest first.
    pub messages: Vec<Message>,
}
