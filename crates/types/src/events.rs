//! The simulation event stream.
//!
//! Events are append-only records emitted in causal order within a lap:
//! pit stop / lap complete pairs (in ranking order), then overtakes, then
//! trait adaptation updates. They are never mutated after emission.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::ids::{AgentId, Lap};
use crate::profile::Traits;

/// Why an agent entered the pits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitReason {
    /// An external must-pit request.
    Requested,
    /// Tyre wear crossed a pit threshold.
    TyreWear,
    /// Profile-driven early stop inside the soft wear window.
    Strategy,
    /// Non-dry conditions on worn tyres.
    Weather,
}

/// An agent finished a lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapCompleteEvent {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub lap: Lap,
    pub action: Action,
    pub lap_time: f64,
    pub position: usize,
    /// Previous position minus new position (positive = places gained).
    pub position_change: i64,
    pub tyre_wear: f64,
    pub tyre_age: u32,
    /// Agent's cumulative race time after the lap.
    pub timestamp: f64,
}

/// An agent pitted during the lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitStopEvent {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub lap: Lap,
    /// Time lost relative to the base lap time.
    pub pit_stop_time: f64,
    pub position: usize,
    pub position_change: i64,
    pub reason: PitReason,
    pub timestamp: f64,
}

/// An agent moved ahead of another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertakeEvent {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub overtaken_agent_id: AgentId,
    pub overtaken_agent_name: String,
    pub lap: Lap,
    /// Always true: only completed passes are modelled.
    pub success: bool,
    pub position_before: usize,
    pub position_after: usize,
    pub timestamp: f64,
}

/// Individual reward terms, each in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RewardComponents {
    pub time: f64,
    pub tyre: f64,
    pub position: f64,
}

/// Applied per-trait change (`new - old`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TraitDeltas {
    pub aggression: f64,
    pub risk_taking: f64,
    pub tyre_management: f64,
    pub pit_bias: f64,
}

impl TraitDeltas {
    /// Difference between two trait sets.
    pub fn between(before: &Traits, after: &Traits) -> Self {
        Self {
            aggression: after.aggression - before.aggression,
            risk_taking: after.risk_taking - before.risk_taking,
            tyre_management: after.tyre_management - before.tyre_management,
            pit_bias: after.pit_bias - before.pit_bias,
        }
    }
}

/// Trait adaptation result for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrlUpdateEvent {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub lap: Lap,
    /// Combined reward in `[-1, 1]`.
    pub reward: f64,
    pub components: RewardComponents,
    pub trait_deltas: TraitDeltas,
    /// Traits after the update.
    pub traits: Traits,
    pub timestamp: f64,
}

/// Discriminant of [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LapComplete,
    PitStop,
    Overtake,
    PrlUpdate,
}

/// A single record in the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum Event {
    LapComplete(LapCompleteEvent),
    PitStop(PitStopEvent),
    Overtake(OvertakeEvent),
    PrlUpdate(PrlUpdateEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::LapComplete(_) => EventKind::LapComplete,
            Event::PitStop(_) => EventKind::PitStop,
            Event::Overtake(_) => EventKind::Overtake,
            Event::PrlUpdate(_) => EventKind::PrlUpdate,
        }
    }

    /// The agent the event is about (the overtaking agent for overtakes).
    pub fn agent_id(&self) -> &AgentId {
        match self {
            Event::LapComplete(e) => &e.agent_id,
            Event::PitStop(e) => &e.agent_id,
            Event::Overtake(e) => &e.agent_id,
            Event::PrlUpdate(e) => &e.agent_id,
        }
    }

    pub fn lap(&self) -> Lap {
        match self {
            Event::LapComplete(e) => e.lap,
            Event::PitStop(e) => e.lap,
            Event::Overtake(e) => e.lap,
            Event::PrlUpdate(e) => e.lap,
        }
    }
}
