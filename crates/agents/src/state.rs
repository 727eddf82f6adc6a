//! Per-agent dynamic race state.
//!
//! Owned by the orchestrator for the duration of one run. Positions are
//! assigned by ranking; everything else is updated through [`AgentDynamicState::complete_lap`].

use serde::{Deserialize, Serialize};

/// Mutable state of one car during a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDynamicState {
    /// Current position (1-based, unique across the field).
    pub position: usize,
    /// Normalized tyre degradation in `[0, 1]`.
    pub tyre_wear: f64,
    /// Laps since the last pit stop.
    pub tyre_age: u32,
    pub last_lap_time: Option<f64>,
    /// Best lap so far (never increases).
    pub best_lap_time: Option<f64>,
    pub pit_stop_count: u32,
    pub total_elapsed_time: f64,
    /// External must-pit flag, cleared when the agent pits.
    pub pit_requested: bool,
}

impl AgentDynamicState {
    /// Fresh state on new tyres at the given grid position.
    pub fn new(position: usize) -> Self {
        Self {
            position,
            tyre_wear: 0.0,
            tyre_age: 0,
            last_lap_time: None,
            best_lap_time: None,
            pit_stop_count: 0,
            total_elapsed_time: 0.0,
            pit_requested: false,
        }
    }

    /// Record a completed lap.
    ///
    /// Pitting resets `tyre_age` to zero and clears any pending pit request;
    /// otherwise the tyres age by one lap.
    pub fn complete_lap(&mut self, lap_time: f64, tyre_wear: f64, pitted: bool) {
        self.tyre_wear = tyre_wear;
        if pitted {
            self.tyre_age = 0;
            self.pit_stop_count += 1;
            self.pit_requested = false;
        } else {
            self.tyre_age += 1;
        }
        self.last_lap_time = Some(lap_time);
        self.best_lap_time = Some(match self.best_lap_time {
            Some(best) => best.min(lap_time),
            None => lap_time,
        });
        self.total_elapsed_time += lap_time;
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    pub fn is_leading(&self) -> bool {
        self.position == 1
    }
}
