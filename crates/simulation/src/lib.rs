//! Simulation crate: the lap orchestrator for the race strategy gym.
//!
//! This crate provides the race runner that coordinates:
//! - Lap-based event loop
//! - Per-agent decisions and lap outcomes
//! - Ranking and overtake resolution
//! - Trait adaptation after every lap
//! - Hook-based observation
//!
//! # Architecture
//!
//! The race runs in discrete laps:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             RaceSimulation.step()            │
//! │                                              │
//! │  1. Hook: on_race_start (lap 1 only)         │
//! │  2. Weather transition (mixed only)          │
//! │  3. Hook: on_lap_start                       │
//! │  4. policy.evaluate() + model.simulate()     │
//! │     for each agent, in input order           │
//! │  5. rank_lap(): positions + overtakes        │
//! │  6. Update AgentDynamicState                 │
//! │  7. Emit PitStop / LapComplete pairs         │
//! │  8. Emit Overtake events                     │
//! │  9. adapt_traits() + PrlUpdate (lap ≥ 2)     │
//! │ 10. Hook: on_lap_end (+ on_race_end)         │
//! │                                              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! All randomness comes from one seeded stream per run, so the same seed,
//! race and roster reproduce the same events and summary.
//!
//! # Example
//!
//! ```ignore
//! use simulation::{RaceMetricsHook, RaceSimulation, SimulationConfig};
//! use std::sync::Arc;
//! use types::{AgentProfile, RaceConfig};
//!
//! let roster = vec![AgentProfile::new("a"), AgentProfile::new("b")];
//! let mut sim = RaceSimulation::new(RaceConfig::new(20), roster, SimulationConfig::seeded(42))?;
//! let metrics = Arc::new(RaceMetricsHook::new());
//! sim.add_hook(metrics.clone());
//!
//! let result = sim.run();
//! println!("winner: {}", result.summary.winner);
//! println!("overtakes: {}", metrics.snapshot().overtakes);
//! ```

mod config;
pub mod hooks;
pub mod metrics;
mod runner;
mod summary;

pub use config::SimulationConfig;
pub use hooks::{AgentLapSnapshot, HookRunner, LapSnapshot, RaceStart, SimulationHook};
pub use metrics::{RaceMetricsHook, RaceMetricsSnapshot};
pub use runner::RaceSimulation;
