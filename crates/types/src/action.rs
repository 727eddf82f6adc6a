//! The closed set of per-lap actions an agent can take.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One decision per agent per lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    PushHard,
    PushMedium,
    Maintain,
    ConserveLow,
    ConserveMedium,
    ConserveHigh,
    Pit,
}

impl Action {
    /// Every action, fastest pace first, pit last.
    pub const ALL: [Action; 7] = [
        Action::PushHard,
        Action::PushMedium,
        Action::Maintain,
        Action::ConserveLow,
        Action::ConserveMedium,
        Action::ConserveHigh,
        Action::Pit,
    ];

    /// Wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::PushHard => "push_hard",
            Action::PushMedium => "push_medium",
            Action::Maintain => "maintain",
            Action::ConserveLow => "conserve_low",
            Action::ConserveMedium => "conserve_medium",
            Action::ConserveHigh => "conserve_high",
            Action::Pit => "pit",
        }
    }

    pub fn is_pit(self) -> bool {
        matches!(self, Action::Pit)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
