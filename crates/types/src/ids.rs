//! Identifier types for the race simulation.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Lap number (1-based once the race has started).
pub type Lap = u32;

/// Unique identifier for a racing agent.
///
/// Ids are opaque strings supplied by the caller (e.g. `"tyre_whisperer"`).
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl AgentId {
    /// Create a new agent id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (rejected at race setup).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
