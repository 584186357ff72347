//! Shared test utilities: an in-memory review service and snapshot builders.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use thiserror::Error;

use crate::effects::{GerritEffect, GerritInterpreter, GerritResponse};
use crate::types::{
    ApprovalVote, ChangeDetail, ChangeId, ChangeNumber, ChangeRef, ChangeStatus, ChangeSummary,
    Label, Message, RelatedChange, RevisionNumber,
};

/// Error returned by `MockGerrit` for unknown changes and injected failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mock gerrit: {0}")]
pub struct MockError(pub String);

/// A review posted through the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedReview {
    pub change: ChangeRef,
    pub message: String,
}

#[derive(Default)]
struct MockState {
    changes: HashMap<ChangeRef, ChangeSummary>,
    related: HashMap<ChangeRef, Vec<RelatedChange>>,
    /// Scripted details per change; the last entry repeats forever.
    details: HashMap<ChangeRef, VecDeque<ChangeDetail>>,
    detail_failures: HashMap<ChangeRef, usize>,
    failing_related: HashSet<ChangeRef>,
    failing_posts: HashSet<ChangeRef>,
    posts: Vec<PostedReview>,
    effects: Vec<GerritEffect>,
}

/// In-memory `GerritInterpreter`.
///
/// Changes without a related list are treated as standalone (empty list).
#[derive(Default)]
pub struct MockGerrit {
    state: Mutex<MockState>,
}

impl MockGerrit {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn add_change(&self, number: u64, summary: ChangeSummary) {
        self.with_state(|s| {
            s.changes.insert(ChangeRef::from(ChangeNumber(number)), summary);
        });
    }

    pub fn set_related(&self, number: u64, related: Vec<RelatedChange>) {
        self.with_state(|s| {
            s.related
                .insert(ChangeRef::from(ChangeNumber(number)), related);
        });
    }

    /// Scripts the details returned for `change`, one per fetch.
    pub fn script_details(&self, change: impl Into<ChangeRef>, details: Vec<ChangeDetail>) {
        self.with_state(|s| {
            s.details.insert(change.into(), details.into());
        });
    }

    pub fn set_detail(&self, change: impl Into<ChangeRef>, detail: ChangeDetail) {
        self.script_details(change, vec![detail]);
    }

    /// Makes the next `times` detail fetches for `change` fail.
    pub fn fail_details(&self, change: impl Into<ChangeRef>, times: usize) {
        self.with_state(|s| {
            s.detail_failures.insert(change.into(), times);
        });
    }

    pub fn fail_related(&self, number: u64) {
        self.with_state(|s| {
            s.failing_related
                .insert(ChangeRef::from(ChangeNumber(number)));
        });
    }

    pub fn fail_posts(&self, change: impl Into<ChangeRef>) {
        self.with_state(|s| {
            s.failing_posts.insert(change.into());
        });
    }

    pub fn posts(&self) -> Vec<PostedReview> {
        self.with_state(|s| s.posts.clone())
    }

    pub fn effects(&self) -> Vec<GerritEffect> {
        self.with_state(|s| s.effects.clone())
    }

    /// Number of detail fetches made for `change`.
    pub fn detail_fetches(&self, change: impl Into<ChangeRef>) -> usize {
        let change = change.into();
        self.with_state(|s| {
            s.effects
                .iter()
                .filter(|e| matches!(e, GerritEffect::GetChangeDetail { change: c } if *c == change))
                .count()
        })
    }

    fn respond(&self, effect: GerritEffect) -> Result<GerritResponse, MockError> {
        self.with_state(|s| {
            s.effects.push(effect.clone());
            match effect {
                GerritEffect::GetChange { change } => s
                    .changes
                    .get(&change)
                    .cloned()
                    .map(GerritResponse::Change)
                    .ok_or_else(|| MockError(format!("change {} not found", change))),
                GerritEffect::GetRelatedChanges { change, .. } => {
                    if s.failing_related.contains(&change) {
                        return Err(MockError(format!("related changes of {} failed", change)));
                    }
                    let related = s.related.get(&change).cloned().unwrap_or_default();
                    Ok(GerritResponse::RelatedChanges(related))
                }
                GerritEffect::GetChangeDetail { change } => {
                    if let Some(remaining) = s.detail_failures.get_mut(&change)
                        && *remaining > 0
                    {
                        *remaining -= 1;
                        return Err(MockError(format!("detail of {} failed", change)));
                    }
                    let script = s
                        .details
                        .get_mut(&change)
                        .ok_or_else(|| MockError(format!("no detail for {}", change)))?;
                    let detail = if script.len() > 1 {
                        script.pop_front()
                    } else {
                        script.front().cloned()
                    };
                    detail
                        .map(GerritResponse::ChangeDetail)
                        .ok_or_else(|| MockError(format!("empty detail script for {}", change)))
                }
                GerritEffect::PostReview { change, message } => {
                    if s.failing_posts.contains(&change) {
                        return Err(MockError(format!("post to {} failed", change)));
                    }
                    s.posts.push(PostedReview { change, message });
                    Ok(GerritResponse::ReviewPosted)
                }
            }
        })
    }
}

impl GerritInterpreter for MockGerrit {
    type Error = MockError;

    fn interpret(
        &self,
        effect: GerritEffect,
    ) -> impl Future<Output = Result<GerritResponse, Self::Error>> + Send {
        let result = self.respond(effect);
        async move { result }
    }
}

// ─── Builders ───

/// A fixed reference instant; `at(n)` is `n` minutes after it.
pub fn at(minutes: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::minutes(minutes)
}

/// Formats `at(minutes)` the way the service does.
pub fn service_date(minutes: i64) -> String {
    crate::types::timestamp::format_timestamp(at(minutes))
}

pub fn summary(id: &str, number: u64, revision: u32) -> ChangeSummary {
    ChangeSummary {
        id: ChangeId::new(id),
        number: Some(ChangeNumber(number)),
        current_revision: RevisionNumber(revision),
        subject: format!("Change {}", id),
    }
}

pub fn related(id: &str, number: u64, status: ChangeStatus) -> RelatedChange {
    RelatedChange {
        id: ChangeId::new(id),
        number: Some(ChangeNumber(number)),
        status: Some(status),
    }
}

/// A detail whose only label is the CI vote (`None` for no vote at all).
pub fn detail_with_vote(id: &str, vote: Option<(i32, i64)>, messages: Vec<Message>) -> ChangeDetail {
    let mut labels = BTreeMap::new();
    if let Some((value, minutes)) = vote {
        labels.insert(
            "Verified".to_string(),
            Label {
                all: vec![ApprovalVote {
                    voter: Some("Zuul".to_string()),
                    value,
                    date: Some(service_date(minutes)),
                }],
            },
        );
    }
    ChangeDetail {
        id: ChangeId::new(id),
        subject: format!("Change {}", id),
        labels,
        messages,
    }
}

pub fn approved(id: &str) -> ChangeDetail {
    detail_with_vote(id, Some((2, 0)), Vec::new())
}

pub fn human_message(minutes: i64, author: &str, body: &str) -> Message {
    Message {
        author: Some(author.to_string()),
        date: at(minutes),
        tag: None,
        body: body.to_string(),
    }
}

pub fn ci_failure_message(minutes: i64) -> Message {
    Message {
        author: Some("Zuul".to_string()),
        date: at(minutes),
        tag: Some("autogenerated:zuul:check".to_string()),
        body: "Build failed (check pipeline).".to_string(),
    }
}

// ─── Arbitraries ───

pub fn arb_change_number() -> impl Strategy<Value = ChangeNumber> {
    (1u64..1_000_000).prop_map(ChangeNumber)
}
