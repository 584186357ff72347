//! Review-service effect types.
//!
//! These types describe the four review-service operations the decision engine
//! needs, as data. The interpreter in `crate::gerrit` executes them over HTTP;
//! tests execute them against an in-memory fake.

use serde::{Deserialize, Serialize};

use crate::types::{ChangeDetail, ChangeRef, ChangeSummary, RelatedChange, RevisionNumber};

/// A review-service effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GerritEffect {
    // ─── Queries ──────────────────────────────────────────────────────────────
    /// Resolve a change reference to its Change-Id and current revision.
    GetChange { change: ChangeRef },

    /// List the changes related to one revision of a change.
    GetRelatedChanges {
        change: ChangeRef,
        revision: RevisionNumber,
    },

    /// Fetch a change with its labels and message timeline.
    GetChangeDetail { change: ChangeRef },

    // ─── Mutations ────────────────────────────────────────────────────────────
    /// Post a review message (no votes) on whatever revision is current
    /// when the request lands.
    PostReview { change: ChangeRef, message: String },
}

impl GerritEffect {
    /// Returns true if executing this effect changes state on the service.
    pub fn is_mutation(&self) -> bool {
        matches!(self, GerritEffect::PostReview { .. })
    }
}

/// Response from a review-service effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum GerritResponse {
    /// Response to `GetChange`.
    Change(ChangeSummary),

    /// Response to `GetRelatedChanges`, in service order.
    RelatedChanges(Vec<RelatedChange>),

    /// Response to `GetChangeDetail`.
    ChangeDetail(ChangeDetail),

    /// Response to `PostReview`.
    ReviewPosted,
}

impl GerritResponse {
    /// Name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            GerritResponse::Change(_) => "change",
            GerritResponse::RelatedChanges(_) => "related_changes",
            GerritResponse::ChangeDetail(_) => "change_detail",
            GerritResponse::ReviewPosted => "review_posted",
        }
    }
}
