//! gerrit-recheck - re-triggers CI on Gerrit changes until the CI voter approves them.
//!
//! Given a set of changes, the bot tracks each one plus its unmerged
//! dependencies, and every poll cycle posts `recheck` on any change whose
//! negative CI vote is newer than the last human recheck request.

pub mod cli;
pub mod config;
pub mod credentials;
pub mod effects;
pub mod gerrit;
pub mod recheck;
pub mod types;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_utils;
