//! Simulation hooks for observing the race lifecycle.
//!
//! Hooks are **observers**: they receive owned snapshots of race state at
//! fixed points and cannot influence the race. Use interior mutability
//! (atomics, `Mutex`) for hook-owned state.
//!
//! # Lifecycle
//!
//! ```text
//! on_race_start ─► [ on_lap_start ─► (lap runs) ─► on_lap_end ] × laps ─► on_race_end
//! ```

use std::sync::Arc;

use types::{AgentId, Event, Lap, RaceConfig, Summary, Traits, Weather};

/// Race parameters as seen by hooks before lap 1.
#[derive(Debug, Clone)]
pub struct RaceStart {
    pub race: RaceConfig,
    pub seed: u64,
    pub agents: Vec<AgentId>,
}

/// Per-agent state at the end of a lap.
#[derive(Debug, Clone)]
pub struct AgentLapSnapshot {
    pub agent_id: AgentId,
    pub position: usize,
    pub lap_time: f64,
    pub tyre_wear: f64,
    pub total_elapsed_time: f64,
    pub traits: Traits,
}

/// Everything that happened in one lap.
#[derive(Debug, Clone)]
pub struct LapSnapshot {
    pub lap: Lap,
    pub weather: Weather,
    pub events: Vec<Event>,
    /// Agents in finishing order for the lap.
    pub agents: Vec<AgentLapSnapshot>,
}

/// Trait for race observers.
///
/// All methods default to no-ops; implement the ones you need.
pub trait SimulationHook: Send + Sync {
    fn name(&self) -> &str {
        "SimulationHook"
    }

    fn on_race_start(&self, _start: &RaceStart) {}

    fn on_lap_start(&self, _lap: Lap, _weather: Weather) {}

    fn on_lap_end(&self, _snapshot: &LapSnapshot) {}

    fn on_race_end(&self, _summary: &Summary) {}
}

/// Dispatches lifecycle calls to every registered hook, in registration order.
#[derive(Default, Clone)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn SimulationHook>>,
}

impl HookRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn on_race_start(&self, start: &RaceStart) {
        for hook in &self.hooks {
            hook.on_race_start(start);
        }
    }

    pub fn on_lap_start(&self, lap: Lap, weather: Weather) {
        for hook in &self.hooks {
            hook.on_lap_start(lap, weather);
        }
    }

    pub fn on_lap_end(&self, snapshot: &LapSnapshot) {
        for hook in &self.hooks {
            hook.on_lap_end(snapshot);
        }
    }

    pub fn on_race_end(&self, summary: &Summary) {
        for hook in &self.hooks {
            hook.on_race_end(summary);
        }
    }
}

impl std::fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.names())
            .finish()
    }
}
