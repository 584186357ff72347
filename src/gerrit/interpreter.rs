//! Review-service effect interpreter backed by `GerritClient`.

use crate::effects::{GerritEffect, GerritInterpreter, GerritResponse};

use super::client::GerritClient;
use super::error::GerritApiError;
use super::retry::{RetryConfig, retry_with_backoff};

impl GerritInterpreter for GerritClient {
    type Error = GerritApiError;

    async fn interpret(&self, effect: GerritEffect) -> Result<GerritResponse, Self::Error> {
        let retry_config = retry_config_for(&effect, self.retry_config());
        interpret_gerrit_effect(self, effect, retry_config).await
    }
}

/// Mutations get a single attempt: a review that timed out may already have
/// been recorded, and a second post would duplicate the comment.
fn retry_config_for(effect: &GerritEffect, configured: RetryConfig) -> RetryConfig {
    if effect.is_mutation() {
        RetryConfig::NONE
    } else {
        configured
    }
}

/// Executes `effect`, retrying transient failures per `retry_config`.
pub async fn interpret_gerrit_effect(
    client: &GerritClient,
    effect: GerritEffect,
    retry_config: RetryConfig,
) -> Result<GerritResponse, GerritApiError> {
    retry_with_backoff(retry_config, || execute_effect(client, &effect))
        .await
        .into_result()
}

/// Executes a single effect without retry logic.
async fn execute_effect(
    client: &GerritClient,
    effect: &GerritEffect,
) -> Result<GerritResponse, GerritApiError> {
    match effect {
        GerritEffect::GetChange { change } => {
            client.get_change(change).await.map(GerritResponse::Change)
        }
        GerritEffect::GetRelatedChanges { change, revision } => client
            .get_related_changes(change, *revision)
            .await
            .map(GerritResponse::RelatedChanges),
        GerritEffect::GetChangeDetail { change } => client
            .get_change_detail(change)
            .await
            .map(GerritResponse::ChangeDetail),
        GerritEffect::PostReview { change, message } => client
            .post_review(change, message)
            .await
            .map(|()| GerritResponse::ReviewPosted),
    }
}
