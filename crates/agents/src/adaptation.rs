//! Trait adaptation: a hand-tuned pseudo-reinforcement update.
//!
//! After every lap (except the first, which has no baseline) each agent's
//! lap outcome is folded into a scalar reward
//!
//! ```text
//! R = clamp(0.4·R_time + 0.3·R_tyre + 0.3·R_position, -1, 1)
//! ```
//!
//! and the four traits are nudged by `learning_rate`-scaled deltas. Every
//! intermediate term is bounded to `[-1, 1]` and every trait to
//! `[TRAIT_MIN, TRAIT_MAX]`: the update feeds back into every later
//! decision of the same agent, so unbounded values would compound.

use types::{AgentProfile, Lap, RewardComponents, TraitDeltas, Traits, clamp};

/// Lower bound of every trait after adaptation.
pub const TRAIT_MIN: f64 = 0.1;
/// Upper bound of every trait after adaptation.
pub const TRAIT_MAX: f64 = 0.9;

const TIME_WEIGHT: f64 = 0.4;
const TYRE_WEIGHT: f64 = 0.3;
const POSITION_WEIGHT: f64 = 0.3;
/// Pit laps slower than `best * PIT_LAP_ALLOWANCE` reduce pit bias.
const PIT_LAP_ALLOWANCE: f64 = 1.05;
const MAX_PIT_BIAS_STEP: f64 = 0.05;

/// Observed outcome of one lap for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapPerformance {
    pub lap: Lap,
    pub current_lap_time: f64,
    /// Best lap before this one.
    pub best_lap_time: f64,
    /// `max(0, wear_after - wear_before)`.
    pub tyre_wear_increase: f64,
    pub expected_wear: f64,
    pub position_before: usize,
    pub position_after: usize,
    pub total_cars: usize,
    pub pitted: bool,
}

impl LapPerformance {
    /// Positions gained this lap (negative when lost).
    pub fn position_delta(&self) -> i64 {
        self.position_before as i64 - self.position_after as i64
    }

    fn expected_wear(&self) -> f64 {
        self.expected_wear.max(AgentProfile::MIN_EXPECTED_WEAR)
    }

    /// `1 - wear_increase / expected_wear` (unclamped).
    pub fn tyre_efficiency(&self) -> f64 {
        1.0 - self.tyre_wear_increase / self.expected_wear()
    }
}

/// Combined reward and its components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardBreakdown {
    pub reward: f64,
    pub components: RewardComponents,
}

/// Result of one adaptation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitUpdate {
    pub traits: Traits,
    pub reward: f64,
    pub components: RewardComponents,
    /// Applied change per trait (`new - old`).
    pub deltas: TraitDeltas,
}

/// Compute the bounded reward for a lap.
pub fn compute_reward(perf: &LapPerformance) -> RewardBreakdown {
    let best = perf.best_lap_time.max(0.01);
    let time = clamp((best - perf.current_lap_time) / best, -1.0, 1.0);
    let tyre = clamp(perf.tyre_efficiency(), -1.0, 1.0);
    let cars = perf.total_cars.max(1) as f64;
    let position = clamp(perf.position_delta() as f64 / cars, -1.0, 1.0);

    let reward = clamp(
        TIME_WEIGHT * time + TYRE_WEIGHT * tyre + POSITION_WEIGHT * position,
        -1.0,
        1.0,
    );

    RewardBreakdown {
        reward,
        components: RewardComponents {
            time,
            tyre,
            position,
        },
    }
}

fn aggression_delta(reward: f64, position_delta: i64, lr: f64) -> f64 {
    if reward > 0.0 {
        if position_delta > 0 {
            lr * reward
        } else {
            -lr * reward * 0.5
        }
    } else if position_delta < 0 {
        -lr * reward.abs()
    } else {
        lr * reward.abs() * 0.5
    }
}

fn tyre_management_delta(reward: f64, efficiency: f64, lr: f64) -> f64 {
    if efficiency > 0.8 {
        lr * reward
    } else if efficiency < 0.5 {
        -lr * reward.abs()
    } else {
        lr * reward * 0.5
    }
}

fn risk_delta(reward: f64, position_delta: i64, lr: f64) -> f64 {
    if reward > 0.0 && position_delta > 0 {
        lr * reward
    } else if reward < 0.0 && position_delta < 0 {
        -lr * reward.abs()
    } else {
        lr * reward * 0.3
    }
}

fn pit_bias_delta(perf: &LapPerformance, lr: f64) -> f64 {
    if !perf.pitted {
        return 0.0;
    }
    let expected_lap = perf.best_lap_time.max(0.01) * PIT_LAP_ALLOWANCE;
    let loss = perf.current_lap_time - expected_lap;
    let delta = if loss < 0.0 {
        lr * loss.abs() * 0.5
    } else {
        -lr * loss * 0.3
    };
    clamp(delta, -MAX_PIT_BIAS_STEP, MAX_PIT_BIAS_STEP)
}

/// Run one adaptation step.
///
/// Returns `None` on lap 1, where there is no baseline and traits are
/// left untouched.
pub fn adapt_traits(
    traits: &Traits,
    perf: &LapPerformance,
    learning_rate: f64,
) -> Option<TraitUpdate> {
    if perf.lap <= 1 {
        return None;
    }

    let RewardBreakdown { reward, components } = compute_reward(perf);
    let position_delta = perf.position_delta();
    let lr = learning_rate;

    let bounded = |value: f64| clamp(value, TRAIT_MIN, TRAIT_MAX);
    let updated = Traits {
        aggression: bounded(traits.aggression + aggression_delta(reward, position_delta, lr)),
        risk_taking: bounded(traits.risk_taking + risk_delta(reward, position_delta, lr)),
        tyre_management: bounded(
            traits.tyre_management + tyre_management_delta(reward, perf.tyre_efficiency(), lr),
        ),
        pit_bias: bounded(traits.pit_bias + pit_bias_delta(perf, lr)),
    };

    Some(TraitUpdate {
        traits: updated,
        reward,
        components,
        deltas: TraitDeltas::between(traits, &updated),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perf() -> LapPerformance {
        LapPerformance {
            lap: 5,
            current_lap_time: 90.0,
            best_lap_time: 90.0,
            tyre_wear_increase: 0.04,
            expected_wear: 0.04,
            position_before: 2,
            position_after: 2,
            total_cars: 3,
            pitted: false,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_lap_one_is_skipped() {
        let traits = Traits::new(0.95, 0.5, 0.5, 0.5);
        let p = LapPerformance { lap: 1, ..perf() };
        assert!(adapt_traits(&traits, &p, 0.02).is_none());
    }

    #[test]
    fn test_neutral_lap_has_zero_reward() {
        let breakdown = compute_reward(&perf());
        assert!(approx(breakdown.reward, 0.0));
        assert!(approx(breakdown.components.time, 0.0));
        assert!(approx(breakdown.components.tyre, 0.0));
        assert!(approx(breakdown.components.position, 0.0));
    }

    #[test]
    fn test_reward_components() {
        let p = LapPerformance {
            current_lap_time: 88.2,
            tyre_wear_increase: 0.02,
            position_before: 3,
            position_after: 1,
            ..perf()
        };
        let b = compute_reward(&p);
        assert!(approx(b.components.time, 0.02));
        assert!(approx(b.components.tyre, 0.5));
        assert!(approx(b.components.position, 2.0 / 3.0));
        assert!(approx(b.reward, 0.4 * 0.02 + 0.3 * 0.5 + 0.3 * (2.0 / 3.0)));
    }

    #[test]
    fn test_reward_is_bounded_for_extreme_inputs() {
        let p = LapPerformance {
            current_lap_time: 1_000.0,
            best_lap_time: 0.0,
            tyre_wear_increase: 5.0,
            expected_wear: 0.0,
            position_before: 1,
            position_after: 20,
            total_cars: 1,
            ..perf()
        };
        let b = compute_reward(&p);
        assert_eq!(b.components.time, -1.0);
        assert_eq!(b.components.tyre, -1.0);
        assert_eq!(b.components.position, -1.0);
        assert_eq!(b.reward, -1.0);
    }

    #[test]
    fn test_positive_reward_with_gain_raises_aggression_and_risk() {
        let traits = Traits::new(0.5, 0.5, 0.5, 0.5);
        let p = LapPerformance {
            current_lap_time: 89.0,
            tyre_wear_increase: 0.0,
            position_before: 3,
            position_after: 1,
            ..perf()
        };
        let update = adapt_traits(&traits, &p, 0.02).unwrap();
        assert!(update.reward > 0.0);
        assert!(approx(update.deltas.aggression, 0.02 * update.reward));
        assert!(approx(update.deltas.risk_taking, 0.02 * update.reward));
        // efficiency 1.0 > 0.8
        assert!(approx(update.deltas.tyre_management, 0.02 * update.reward));
        assert_eq!(update.deltas.pit_bias, 0.0);
    }

    #[test]
    fn test_positive_reward_without_gain_lowers_aggression() {
        let traits = Traits::new(0.5, 0.5, 0.5, 0.5);
        let p = LapPerformance {
            tyre_wear_increase: 0.0,
            ..perf()
        };
        let update = adapt_traits(&traits, &p, 0.02).unwrap();
        // R = 0.3 * 1.0
        assert!(approx(update.reward, 0.3));
        assert!(approx(update.deltas.aggression, -0.02 * 0.3 * 0.5));
        assert!(approx(update.deltas.risk_taking, 0.02 * 0.3 * 0.3));
    }

    #[test]
    fn test_negative_reward_with_loss() {
        let traits = Traits::new(0.5, 0.5, 0.5, 0.5);
        let p = LapPerformance {
            current_lap_time: 92.0,
            tyre_wear_increase: 0.06,
            position_before: 1,
            position_after: 3,
            ..perf()
        };
        let update = adapt_traits(&traits, &p, 0.02).unwrap();
        assert!(update.reward < 0.0);
        let magnitude = update.reward.abs();
        assert!(approx(update.deltas.aggression, -0.02 * magnitude));
        assert!(approx(update.deltas.risk_taking, -0.02 * magnitude));
        // efficiency -0.5 < 0.5
        assert!(approx(update.deltas.tyre_management, -0.02 * magnitude));
    }

    #[test]
    fn test_pit_bias_step_is_capped() {
        let traits = Traits::new(0.5, 0.5, 0.5, 0.5);
        let p = LapPerformance {
            current_lap_time: 113.0,
            pitted: true,
            tyre_wear_increase: 0.0,
            ..perf()
        };
        // loss = 113 - 94.5 = 18.5 -> -0.02 * 18.5 * 0.3 = -0.111 -> capped
        let update = adapt_traits(&traits, &p, 0.02).unwrap();
        assert!(approx(update.deltas.pit_bias, -0.05));

        let fast_pit = LapPerformance {
            current_lap_time: 93.5,
            ..p
        };
        // loss = -1.0 -> +0.01
        let update = adapt_traits(&traits, &fast_pit, 0.02).unwrap();
        assert!(approx(update.deltas.pit_bias, 0.01));
    }

    #[test]
    fn test_traits_are_clamped_and_deltas_report_applied_change() {
        let traits = Traits::new(0.95, 0.05, 0.9, 0.5);
        let update = adapt_traits(&traits, &perf(), 0.02).unwrap();
        assert!(update.traits.within(TRAIT_MIN, TRAIT_MAX));
        assert!(approx(update.traits.aggression, 0.9));
        assert!(approx(update.deltas.aggression, -0.05));
        assert!(approx(update.traits.risk_taking, 0.1));
    }
}
