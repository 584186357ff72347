//! Posts the re-run request.
//!
//! The only mutation the bot ever makes. In dry-run mode nothing is sent, but
//! the intended action is still logged so the operator can see what a real
//! run would have done.

use std::fmt;

use tracing::info;

use crate::effects::GerritInterpreter;
use crate::types::ChangeRef;

use super::effects::{EffectError, EffectExecutor};

/// What the poster did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    Posted,
    /// Dry run: the post was logged but not sent.
    Suppressed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPoster {
    message: String,
    dry_run: bool,
}

impl ReviewPoster {
    pub fn new(message: impl Into<String>, dry_run: bool) -> Self {
        Self {
            message: message.into(),
            dry_run,
        }
    }

    /// Posts the review message on the current revision of `change`.
    pub async fn post<G>(
        &self,
        executor: &EffectExecutor<G>,
        change: &ChangeRef,
    ) -> Result<PostOutcome, EffectError>
    where
        G: GerritInterpreter,
        G::Error: fmt::Display,
    {
        if self.dry_run {
            info!("Skipping comment: Dry run mode enabled");
            return Ok(PostOutcome::Suppressed);
        }

        executor.post_review(change, &self.message).await?;
        info!("Added {}", self.message);
        Ok(PostOutcome::Posted)
    }
}
