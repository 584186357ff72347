//! Newtype wrappers for change identifiers.
//!
//! Gerrit addresses a change in several ways: the stable Change-Id footer
//! (`I8473b95934b5732ac55d26311a706c9c2bde9940`), the numeric change number
//! (`12345`), or any string the REST API accepts as a change reference. These
//! types keep the three apart so a Change-Id is never used where only a
//! revision number makes sense, and vice versa.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The stable Change-Id of a change.
///
/// Survives new patch sets, which is why the tracked set is keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(pub String);

impl ChangeId {
    pub fn new(s: impl Into<String>) -> Self {
        ChangeId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChangeId {
    fn from(s: &str) -> Self {
        ChangeId(s.to_string())
    }
}

impl From<String> for ChangeId {
    fn from(s: String) -> Self {
        ChangeId(s)
    }
}

/// A numeric change number, as shown in review URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeNumber(pub u64);

impl fmt::Display for ChangeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChangeNumber {
    fn from(n: u64) -> Self {
        ChangeNumber(n)
    }
}

/// Error returned when a command-line change number is not a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid change number {0}")]
pub struct InvalidChangeNumber(pub String);

impl FromStr for ChangeNumber {
    type Err = InvalidChangeNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ChangeNumber)
            .map_err(|_| InvalidChangeNumber(s.to_string()))
    }
}

/// Any string the review service accepts in the `{change-id}` path segment.
///
/// Built from either a [`ChangeNumber`] or a [`ChangeId`]; the transport
/// percent-encodes it when building URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeRef(pub String);

impl ChangeRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ChangeNumber> for ChangeRef {
    fn from(n: ChangeNumber) -> Self {
        ChangeRef(n.0.to_string())
    }
}

impl From<&ChangeId> for ChangeRef {
    fn from(id: &ChangeId) -> Self {
        ChangeRef(id.0.clone())
    }
}

/// A patch set number within a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionNumber(pub u32);

impl fmt::Display for RevisionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
