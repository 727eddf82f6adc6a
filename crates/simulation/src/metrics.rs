//! RaceMetricsHook - built-in hook for aggregating race statistics.
//!
//! Counts laps, pit stops, overtakes and trait updates, and keeps the
//! reward history for post-race reports.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use types::Event;

use crate::hooks::{LapSnapshot, SimulationHook};

/// Snapshot of race metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceMetricsSnapshot {
    /// Laps completed.
    pub laps: u64,
    pub pit_stops: u64,
    pub overtakes: u64,
    /// Trait adaptation updates applied.
    pub prl_updates: u64,
    /// Mean reward over all updates (0 when none).
    pub mean_reward: f64,
    pub min_reward: Option<f64>,
    pub max_reward: Option<f64>,
}

/// Built-in hook for collecting race metrics.
///
/// Thread-safe via atomics and a mutex, so one instance can observe
/// several concurrent runs.
///
/// # Example
///
/// ```ignore
/// let metrics = Arc::new(RaceMetricsHook::new());
/// sim.add_hook(metrics.clone());
/// let result = sim.run();
/// println!("overtakes: {}", metrics.snapshot().overtakes);
/// ```
#[derive(Debug, Default)]
pub struct RaceMetricsHook {
    laps: AtomicU64,
    pit_stops: AtomicU64,
    overtakes: AtomicU64,
    prl_updates: AtomicU64,
    rewards: Mutex<Vec<f64>>,
}

impl RaceMetricsHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> RaceMetricsSnapshot {
        let rewards = self.rewards.lock();
        let mean_reward = if rewards.is_empty() {
            0.0
        } else {
            rewards.iter().sum::<f64>() / rewards.len() as f64
        };

        RaceMetricsSnapshot {
            laps: self.laps.load(Ordering::Relaxed),
            pit_stops: self.pit_stops.load(Ordering::Relaxed),
            overtakes: self.overtakes.load(Ordering::Relaxed),
            prl_updates: self.prl_updates.load(Ordering::Relaxed),
            mean_reward,
            min_reward: rewards.iter().copied().reduce(f64::min),
            max_reward: rewards.iter().copied().reduce(f64::max),
        }
    }
}

impl SimulationHook for RaceMetricsHook {
    fn name(&self) -> &str {
        "RaceMetricsHook"
    }

    fn on_lap_end(&self, snapshot: &LapSnapshot) {
        self.laps.fetch_add(1, Ordering::Relaxed);

        let mut rewards = Vec::new();
        for event in &snapshot.events {
            match event {
                Event::PitStop(_) => {
                    self.pit_stops.fetch_add(1, Ordering::Relaxed);
                }
                Event::Overtake(_) => {
                    self.overtakes.fetch_add(1, Ordering::Relaxed);
                }
                Event::PrlUpdate(update) => {
                    self.prl_updates.fetch_add(1, Ordering::Relaxed);
                    rewards.push(update.reward);
                }
                Event::LapComplete(_) => {}
            }
        }

        if !rewards.is_empty() {
            self.rewards.lock().extend(rewards);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{
        AgentId, OvertakeEvent, PrlUpdateEvent, RewardComponents, TraitDeltas, Traits, Weather,
    };

    fn prl(reward: f64) -> Event {
        Event::PrlUpdate(PrlUpdateEvent {
            agent_id: AgentId::from("a"),
            agent_name: "a".into(),
            lap: 2,
            reward,
            components: RewardComponents::default(),
            trait_deltas: TraitDeltas::default(),
            traits: Traits::default(),
            timestamp: 0.0,
        })
    }

    fn overtake() -> Event {
        Event::Overtake(OvertakeEvent {
            agent_id: AgentId::from("a"),
            agent_name: "a".into(),
            overtaken_agent_id: AgentId::from("b"),
            overtaken_agent_name: "b".into(),
            lap: 2,
            success: true,
            position_before: 2,
            position_after: 1,
            timestamp: 0.0,
        })
    }

    #[test]
    fn test_empty_snapshot() {
        let hook = RaceMetricsHook::new();
        let snapshot = hook.snapshot();
        assert_eq!(snapshot, RaceMetricsSnapshot::default());
    }

    #[test]
    fn test_counts_and_rewards() {
        let hook = RaceMetricsHook::new();
        hook.on_lap_end(&LapSnapshot {
            lap: 2,
            weather: Weather::Dry,
            events: vec![overtake(), prl(0.2), prl(-0.4)],
            agents: vec![],
        });

        let snapshot = hook.snapshot();
        assert_eq!(snapshot.laps, 1);
        assert_eq!(snapshot.overtakes, 1);
        assert_eq!(snapshot.prl_updates, 2);
        assert!((snapshot.mean_reward + 0.1).abs() < 1e-12);
        assert_eq!(snapshot.min_reward, Some(-0.4));
        assert_eq!(snapshot.max_reward, Some(0.2));
    }
}
