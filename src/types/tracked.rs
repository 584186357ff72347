//! The set of changes a run is watching.

use std::collections::HashMap;

use super::ids::{ChangeId, ChangeRef};

/// A tracked change and whether CI has approved it yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedChange {
    /// Stable key of the entry.
    pub id: ChangeId,
    /// How the change is addressed on the wire (change number when known).
    pub target: ChangeRef,
    pub approved: bool,
}

/// Insertion-ordered map from Change-Id to approval flag.
///
/// Iteration follows insertion order so each poll cycle visits changes (and
/// logs them) in the same order. Entries are never removed; they can only
/// move from unapproved to approved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedChangeSet {
    entries: Vec<TrackedChange>,
    index: HashMap<ChangeId, usize>,
}

impl TrackedChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `id` as unapproved.
    ///
    /// Returns false, leaving the existing entry untouched, if `id` is already
    /// tracked.
    pub fn track(&mut self, id: ChangeId, target: ChangeRef) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push(TrackedChange {
            id,
            target,
            approved: false,
        });
        true
    }

    /// Marks `id` approved. Returns false if `id` is not tracked.
    pub fn mark_approved(&mut self, id: &ChangeId) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.entries[i].approved = true;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &ChangeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_approved(&self, id: &ChangeId) -> Option<bool> {
        self.index.get(id).map(|&i| self.entries[i].approved)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedChange> {
        self.entries.iter()
    }

    /// Unapproved entries in insertion order.
    pub fn pending(&self) -> impl Iterator<Item = &TrackedChange> {
        self.entries.iter().filter(|e| !e.approved)
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    pub fn all_approved(&self) -> bool {
        self.entries.iter().all(|e| e.approved)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ChangeId> {
        self.entries.iter().map(|e| &e.id)
    }
}
