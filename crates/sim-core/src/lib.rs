//! Sim-core: per-lap race mechanics.
//!
//! - [`LapModel`]: lap time and tyre degradation for a chosen action
//! - [`rank_lap`]: orders the field by lap time, derives position changes
//!   and attributes overtakes
//!
//! Both are deterministic given their inputs; randomness enters only through
//! the caller-supplied generator handed to [`LapModel::simulate`].

pub mod lap_model;
pub mod ranking;

pub use lap_model::{LapModel, LapModelConfig, LapOutcome};
pub use ranking::{Overtake, RankedLap, rank_lap};
