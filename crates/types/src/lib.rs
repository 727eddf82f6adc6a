//! Core types for the race strategy simulation.
//!
//! This crate provides all shared data types used across the simulation:
//! agent identity and behavioral profiles, race configuration, the closed
//! set of per-lap actions, the event stream and the final result.
//!
//! Everything here is plain data. Behavior lives in the `agents`,
//! `sim-core` and `simulation` crates.

pub mod action;
pub mod error;
pub mod events;
pub mod ids;
pub mod profile;
pub mod race;
pub mod result;

pub use action::Action;
pub use error::ConfigurationError;
pub use events::{
    Event, EventKind, LapCompleteEvent, OvertakeEvent, PitReason, PitStopEvent, PrlUpdateEvent,
    RewardComponents, TraitDeltas,
};
pub use ids::{AgentId, Lap};
pub use profile::{AgentProfile, Traits};
pub use race::{MAX_LAPS, MIN_LAPS, RaceConfig, Weather, WeatherMode};
pub use result::{LapTimeline, SimulationResult, StandingEntry, Summary, TimelineEntry};

/// Clamp `value` into `[min, max]`, mapping NaN to `min`.
///
/// `f64::clamp` propagates NaN; every bounded quantity in the simulation
/// goes through this instead.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// Round to `decimals` places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
