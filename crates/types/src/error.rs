//! Error types for race setup.

use crate::ids::AgentId;
use crate::race::{MAX_LAPS, MIN_LAPS};

/// Reasons a race cannot be started.
///
/// These are fatal: they are raised before any lap runs. Per-lap
/// computations are total over clamped inputs and never fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// The roster was empty.
    #[error("at least one agent is required")]
    NoAgents,

    /// `total_laps` outside the supported range.
    #[error(
        "total_laps must be between {min} and {max}, got {laps}",
        min = MIN_LAPS,
        max = MAX_LAPS
    )]
    LapCountOutOfRange { laps: u32 },

    /// Two agents share an id.
    #[error("duplicate agent id: {0}")]
    DuplicateAgentId(AgentId),

    /// An agent has a blank id.
    #[error("agent id cannot be empty")]
    EmptyAgentId,
}
