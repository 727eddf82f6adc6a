//! Simulation output: per-lap timelines, tabular timeline and summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::events::Event;
use crate::ids::{AgentId, Lap};
use crate::profile::Traits;
use crate::race::{RaceConfig, Weather};

/// Every event of one lap, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapTimeline {
    pub lap: Lap,
    pub weather: Weather,
    pub events: Vec<Event>,
}

/// One row per agent per lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub lap: Lap,
    pub agent_id: AgentId,
    pub position: usize,
    pub lap_time: f64,
    pub tyre_wear_pct: f64,
    pub action: Action,
}

/// Final classification row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    /// 1-based finishing place by cumulative time.
    pub place: usize,
    pub agent_id: AgentId,
    pub agent_name: String,
    pub total_time: f64,
    pub gap_to_winner: f64,
    pub best_lap: f64,
    pub pit_stops: u32,
    pub final_tyre_wear: f64,
    pub final_traits: Traits,
}

/// Closing summary of a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Fastest single lap of the race.
    pub fastest_lap: f64,
    pub fastest_lap_agent: AgentId,
    pub fastest_lap_number: Lap,
    /// Mean final tyre wear in percent.
    pub avg_tyre_wear_pct: f64,
    pub pit_stops: BTreeMap<AgentId, u32>,
    /// Lowest cumulative elapsed time.
    pub winner: AgentId,
    pub standings: Vec<StandingEntry>,
}

/// Everything a race produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub race: RaceConfig,
    /// Seed of the random stream that produced this result.
    pub seed: u64,
    pub laps: Vec<LapTimeline>,
    pub timeline: Vec<TimelineEntry>,
    pub summary: Summary,
}

impl SimulationResult {
    /// All events across all laps, in order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.laps.iter().flat_map(|lap| lap.events.iter())
    }

    /// Number of laps actually run.
    pub fn laps_completed(&self) -> usize {
        self.laps.len()
    }
}
