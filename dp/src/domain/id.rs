//! Task ID generation
//!
//! IDs are UUID v7 so they sort by creation time. The first 6 hex chars are
//! shown to the user as a short handle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, immutable task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh ID
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Short display handle (first 6 hex chars)
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..6].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for TaskId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
