//! Agents crate: racing agent behavior for the race strategy simulation.
//!
//! This crate provides:
//! - [`AgentDynamicState`]: per-run mutable state of one car (position, tyres, times)
//! - The [`DecisionPolicy`] trait and its rule-table implementation [`RuleBasedPolicy`]
//! - The trait adaptation engine ([`adapt_traits`]) that turns a lap outcome
//!   into a bounded reward and nudges the agent's behavioral traits
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   Decision   ┌──────────────────────┐
//! │  DecisionPolicy      │ ───────────► │  lap model (sim-core)│
//! │  (state, profile,    │              └──────────┬───────────┘
//! │   RaceContext)       │                         │ lap outcome
//! └──────────▲───────────┘                         ▼
//!            │ traits                   ┌──────────────────────┐
//!            └───────────────────────── │  adapt_traits        │
//!                 next lap              │  (LapPerformance)    │
//!                                       └──────────────────────┘
//! ```
//!
//! Both the policy and the adaptation step are pure: the orchestrator owns
//! profiles and state and writes results back.

pub mod adaptation;
pub mod policy;
mod state;

pub use adaptation::{
    LapPerformance, RewardBreakdown, TRAIT_MAX, TRAIT_MIN, TraitUpdate, adapt_traits,
    compute_reward,
};
pub use policy::{Decision, DecisionPolicy, RaceContext, RuleBasedPolicy};
pub use state::AgentDynamicState;
