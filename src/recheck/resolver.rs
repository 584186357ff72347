//! Expands root changes into the set of changes to watch.
//!
//! The related-changes list runs from the tip of a series down to its base.
//! Everything above the root depends on it and is left alone; everything
//! below it is a dependency whose CI result gates the root, so it is tracked
//! too. Dependencies that have already merged are dropped.
//!
//! Resolution happens once, before the first poll cycle. Any failure here is
//! fatal to the run.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::effects::GerritInterpreter;
use crate::types::{ChangeId, ChangeNumber, ChangeRef, RelatedChange, TrackedChangeSet};
use crate::worker::{EffectError, EffectExecutor};

/// Errors resolving the tracked set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("error fetching change {change}: {source}")]
    Change {
        change: ChangeRef,
        #[source]
        source: EffectError,
    },

    #[error("error fetching related changes for {change}: {source}")]
    Related {
        change: ChangeRef,
        #[source]
        source: EffectError,
    },
}

impl ResolveError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            ResolveError::Change { source, .. } | ResolveError::Related { source, .. } => {
                source.is_cancelled()
            }
        }
    }
}

/// A related-changes list split around the root's own entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedSplit<'a> {
    /// Entries before the root: changes built on top of it.
    ///
    /// If the root does not appear in the list at all, every entry lands here.
    pub dependents: Vec<&'a RelatedChange>,
    /// Entries after the root: changes it is built on.
    pub dependencies: Vec<&'a RelatedChange>,
}

/// Splits `related` around the entry whose id is `root`.
pub fn split_related<'a>(root: &ChangeId, related: &'a [RelatedChange]) -> RelatedSplit<'a> {
    match related.iter().position(|r| &r.id == root) {
        Some(pos) => RelatedSplit {
            dependents: related[..pos].iter().collect(),
            dependencies: related[pos + 1..].iter().collect(),
        },
        None => RelatedSplit {
            dependents: related.iter().collect(),
            dependencies: Vec::new(),
        },
    }
}

/// How a related change is addressed: by number when the service gave one.
fn related_target(related: &RelatedChange) -> ChangeRef {
    match related.number {
        Some(number) => ChangeRef::from(number),
        None => ChangeRef::from(&related.id),
    }
}

/// Adds `root` and its unmerged dependencies to `tracked`.
#[instrument(skip(executor, tracked))]
pub async fn resolve_root<G>(
    executor: &EffectExecutor<G>,
    root: ChangeNumber,
    tracked: &mut TrackedChangeSet,
) -> Result<(), ResolveError>
where
    G: GerritInterpreter,
    G::Error: fmt::Display,
{
    let target = ChangeRef::from(root);
    let summary = executor
        .fetch_change(&target)
        .await
        .map_err(|source| ResolveError::Change {
            change: target.clone(),
            source,
        })?;

    if tracked.track(summary.id.clone(), target.clone()) {
        info!("Tracking change {}: {}", root, summary.subject);
    }

    let related = executor
        .fetch_related(&target, summary.current_revision)
        .await
        .map_err(|source| ResolveError::Related {
            change: target.clone(),
            source,
        })?;

    let split = split_related(&summary.id, &related);
    if !split.dependents.is_empty() {
        debug!(count = split.dependents.len(), "Ignoring dependent changes");
    }

    for dependency in split.dependencies {
        if dependency.status.is_some_and(|s| s.is_merged()) {
            debug!(change = %dependency.id, "Dependency already merged");
            continue;
        }
        let dependency_target = related_target(dependency);
        if tracked.track(dependency.id.clone(), dependency_target.clone()) {
            info!("Tracking dependency {} of {}", dependency_target, root);
        }
    }

    Ok(())
}

/// Resolves every root in order into one tracked set.
pub async fn resolve_all<G>(
    executor: &EffectExecutor<G>,
    roots: &[ChangeNumber],
) -> Result<TrackedChangeSet, ResolveError>
where
    G: GerritInterpreter,
    G::Error: fmt::Display,
{
    let mut tracked = TrackedChangeSet::new();
    for &root in roots {
        resolve_root(executor, root, &mut tracked).await?;
    }
    Ok(tracked)
}
