//! Core domain types for the recheck bot.
//!
//! Identifiers are newtypes so a Change-Id, a change number, and a wire
//! reference cannot be mixed up; change snapshots mirror what one fetch of the
//! review service returns.

pub mod change;
pub mod ids;
pub mod timestamp;
pub mod tracked;

pub use change::{
    ApprovalVote, ChangeDetail, ChangeStatus, ChangeSummary, Label, Message, RelatedChange,
};
pub use ids::{ChangeId, ChangeNumber, ChangeRef, InvalidChangeNumber, RevisionNumber};
pub use timestamp::{TimestampError, parse_timestamp, pretty};
pub use tracked::{TrackedChange, TrackedChangeSet};
