//! JSON shapes returned by the Gerrit REST API.
//!
//! Only the fields the decision engine reads are modelled. Everything is
//! converted into the domain types in `crate::types` before it leaves this
//! module.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::types::{
    ApprovalVote, ChangeDetail, ChangeId, ChangeNumber, ChangeStatus, ChangeSummary, Label,
    Message, RelatedChange, RevisionNumber, TimestampError, parse_timestamp,
};

/// Gerrit prefixes every JSON response with this line to defeat XSSI.
pub const XSSI_PREFIX: &str = ")]}'";

/// Removes the anti-XSSI prefix, if present.
pub fn strip_xssi(body: &str) -> &str {
    body.strip_prefix(XSSI_PREFIX).unwrap_or(body).trim_start()
}

/// Errors converting a decoded response into domain types.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("change {0} has no current revision")]
    MissingCurrentRevision(String),

    #[error("message {id}: {source}")]
    MessageDate {
        id: String,
        #[source]
        source: TimestampError,
    },
}

// ─── ChangeInfo ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChangeInfo {
    pub change_id: String,
    #[serde(rename = "_number")]
    pub number: Option<u64>,
    #[serde(default)]
    pub subject: String,
    /// Present on Gerrit 3.x without extra options.
    pub current_revision_number: Option<u32>,
    /// Present when the request asked for `o=CURRENT_REVISION`.
    pub current_revision: Option<String>,
    #[serde(default)]
    pub revisions: HashMap<String, RevisionInfo>,
    #[serde(default)]
    pub labels: HashMap<String, LabelInfo>,
    #[serde(default)]
    pub messages: Vec<ChangeMessageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct RevisionInfo {
    #[serde(rename = "_number")]
    pub number: u32,
}

#[derive(Debug, Deserialize)]
pub struct LabelInfo {
    #[serde(default)]
    pub all: Vec<ApprovalInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ApprovalInfo {
    pub name: Option<String>,
    pub value: Option<i32>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountInfo {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeMessageInfo {
    #[serde(default)]
    pub id: String,
    pub author: Option<AccountInfo>,
    pub date: String,
    pub tag: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ChangeInfo {
    fn revision_number(&self) -> Option<RevisionNumber> {
        if let Some(n) = self.current_revision_number {
            return Some(RevisionNumber(n));
        }
        let sha = self.current_revision.as_ref()?;
        self.revisions.get(sha).map(|r| RevisionNumber(r.number))
    }

    pub fn into_summary(self) -> Result<ChangeSummary, WireError> {
        let current_revision = self
            .revision_number()
            .ok_or_else(|| WireError::MissingCurrentRevision(self.change_id.clone()))?;
        Ok(ChangeSummary {
            id: ChangeId(self.change_id),
            number: self.number.map(ChangeNumber),
            current_revision,
            subject: self.subject,
        })
    }

    pub fn into_detail(self) -> Result<ChangeDetail, WireError> {
        let labels: BTreeMap<String, Label> = self
            .labels
            .into_iter()
            .map(|(name, info)| (name, info.into_label()))
            .collect();
        let messages = self
            .messages
            .into_iter()
            .map(ChangeMessageInfo::into_message)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ChangeDetail {
            id: ChangeId(self.change_id),
            subject: self.subject,
            labels,
            messages,
        })
    }
}

impl LabelInfo {
    fn into_label(self) -> Label {
        Label {
            all: self
                .all
                .into_iter()
                .map(|a| ApprovalVote {
                    voter: a.name,
                    value: a.value.unwrap_or(0),
                    date: a.date,
                })
                .collect(),
        }
    }
}

impl ChangeMessageInfo {
    fn into_message(self) -> Result<Message, WireError> {
        let date = parse_timestamp(&self.date).map_err(|source| WireError::MessageDate {
            id: self.id.clone(),
            source,
        })?;
        Ok(Message {
            author: self.author.and_then(|a| a.name),
            date,
            tag: self.tag,
            body: self.message,
        })
    }
}

// ─── Related changes ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RelatedChangesInfo {
    #[serde(default)]
    pub changes: Vec<RelatedChangeAndCommitInfo>,
}

#[derive(Debug, Deserialize)]
pub struct RelatedChangeAndCommitInfo {
    /// Absent for commits that are not associated with a change.
    pub change_id: Option<String>,
    #[serde(rename = "_change_number")]
    pub change_number: Option<u64>,
    pub status: Option<String>,
}

impl RelatedChangesInfo {
    /// Converts to domain entries, dropping commits without a Change-Id.
    pub fn into_related(self) -> Vec<RelatedChange> {
        self.changes
            .into_iter()
            .filter_map(|c| {
                Some(RelatedChange {
                    id: ChangeId(c.change_id?),
                    number: c.change_number.map(ChangeNumber),
                    status: c.status.as_deref().and_then(parse_status),
                })
            })
            .collect()
    }
}

fn parse_status(s: &str) -> Option<ChangeStatus> {
    match s {
        "NEW" => Some(ChangeStatus::New),
        "MERGED" => Some(ChangeStatus::Merged),
        "ABANDONED" => Some(ChangeStatus::Abandoned),
        _ => None,
    }
}

// ─── Review input ─────────────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize)]
pub struct ReviewInput<'a> {
    pub message: &'a str,
}
