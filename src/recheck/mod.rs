//! The decision engine.
//!
//! - [`vote`]: classifies the CI vote on a change
//! - [`timeline`]: decides whether a negative vote still needs a re-run request
//! - [`resolver`]: expands root changes into the tracked set
//!
//! `vote` and `timeline` are pure functions of one fetched snapshot; only the
//! resolver talks to the review service.

pub mod resolver;
pub mod timeline;
pub mod vote;

pub use resolver::{RelatedSplit, ResolveError, resolve_all, resolve_root, split_related};
pub use timeline::{Decision, RecheckRequest, Reconciliation, reconcile};
pub use vote::{PendingReason, VoteError, VoteStatus, evaluate_vote};
