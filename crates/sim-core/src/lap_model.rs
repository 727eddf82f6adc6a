//! Lap performance model.
//!
//! ```text
//! lap_time = base + pace_modifier(action) + wear^1.5 · 3.0 + noise(±0.1)
//! wear'    = wear + 0.03 · multiplier(action) · (1 - 0.4 · tyre_management)
//! ```
//!
//! A pit lap is driven at `Maintain` pace on fresh tyres plus the pit-lane
//! loss (`22.0 ± 1.5`), and leaves the car on tyres at the fresh baseline
//! wear.

use rand::Rng;
use serde::{Deserialize, Serialize};
use types::{Action, AgentProfile, clamp, round_to};

/// Tunable constants of the lap model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapModelConfig {
    /// Reference lap time for the track (seconds).
    pub base_lap_time: f64,
    /// Half-width of the uniform lap time noise.
    pub lap_noise: f64,
    /// Floor applied to every lap time.
    pub min_lap_time: f64,
    /// Mean pit-lane time loss.
    pub pit_loss: f64,
    /// Half-width of the uniform pit loss noise.
    pub pit_loss_jitter: f64,
    /// Wear on a freshly fitted set after the out-lap.
    pub fresh_tyre_wear: f64,
    /// Wear per lap at `Maintain` pace with zero tyre management.
    pub base_wear_per_lap: f64,
    /// Scale of the `wear^1.5` lap time penalty.
    pub tyre_penalty_scale: f64,
}

impl Default for LapModelConfig {
    fn default() -> Self {
        Self {
            base_lap_time: 90.0,
            lap_noise: 0.1,
            min_lap_time: 10.0,
            pit_loss: 22.0,
            pit_loss_jitter: 1.5,
            fresh_tyre_wear: 0.02,
            base_wear_per_lap: 0.03,
            tyre_penalty_scale: 3.0,
        }
    }
}

impl LapModelConfig {
    /// Set the track reference lap time.
    pub fn with_base_lap_time(mut self, seconds: f64) -> Self {
        self.base_lap_time = seconds;
        self
    }

    /// Set the mean pit loss.
    pub fn with_pit_loss(mut self, seconds: f64) -> Self {
        self.pit_loss = seconds;
        self
    }

    /// Disable both noise terms.
    pub fn without_noise(mut self) -> Self {
        self.lap_noise = 0.0;
        self.pit_loss_jitter = 0.0;
        self
    }
}

/// Result of simulating one lap for one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapOutcome {
    pub action: Action,
    pub lap_time: f64,
    /// Tyre wear after the lap.
    pub tyre_wear: f64,
    pub pitted: bool,
    /// Time lost against the base lap time on a pit lap.
    pub pit_time: Option<f64>,
}

/// Lap time and tyre wear calculator.
#[derive(Debug, Clone, Default)]
pub struct LapModel {
    config: LapModelConfig,
}

impl LapModel {
    pub fn new(config: LapModelConfig) -> Self {
        Self { config }
    }

    /// Lap time offset for an action.
    pub fn pace_modifier(action: Action, aggression: f64) -> f64 {
        match action {
            Action::PushHard => -1.5 - 0.5 * aggression,
            Action::PushMedium => -0.8 - 0.3 * aggression,
            Action::Maintain | Action::Pit => 0.0,
            Action::ConserveLow => 0.6,
            Action::ConserveMedium => 1.2,
            Action::ConserveHigh => 2.2,
        }
    }

    /// Tyre wear multiplier for an action.
    pub fn wear_multiplier(action: Action) -> f64 {
        match action {
            Action::PushHard => 1.6,
            Action::PushMedium => 1.2,
            Action::Maintain | Action::Pit => 1.0,
            Action::ConserveLow => 0.8,
            Action::ConserveMedium => 0.6,
            Action::ConserveHigh => 0.45,
        }
    }

    /// Nonlinear slowdown from worn tyres.
    pub fn tyre_penalty(&self, tyre_wear: f64) -> f64 {
        clamp(tyre_wear, 0.0, 1.0).powf(1.5) * self.config.tyre_penalty_scale
    }

    /// Lap time for `action` starting the lap on tyres at `tyre_wear`.
    ///
    /// Floored at `min_lap_time` and rounded to 0.01.
    pub fn lap_time<R: Rng + ?Sized>(
        &self,
        action: Action,
        profile: &AgentProfile,
        tyre_wear: f64,
        rng: &mut R,
    ) -> f64 {
        let noise = self.noise(self.config.lap_noise, rng);
        let raw = self.config.base_lap_time
            + Self::pace_modifier(action, profile.traits.aggression)
            + self.tyre_penalty(tyre_wear)
            + noise;
        round_to(raw, 2).max(self.config.min_lap_time)
    }

    /// Tyre wear after driving one lap with `action`.
    pub fn tyre_wear(&self, prev_wear: f64, action: Action, profile: &AgentProfile) -> f64 {
        let management = 1.0 - 0.4 * profile.traits.tyre_management;
        let wear =
            prev_wear + self.config.base_wear_per_lap * Self::wear_multiplier(action) * management;
        round_to(clamp(wear, 0.0, 1.0), 4)
    }

    /// Simulate a full lap, including pit handling.
    ///
    /// Draws one lap noise sample, plus one pit loss sample when pitting.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        action: Action,
        profile: &AgentProfile,
        prev_wear: f64,
        rng: &mut R,
    ) -> LapOutcome {
        if action.is_pit() {
            let driving = self.lap_time(Action::Maintain, profile, 0.0, rng);
            let pit_loss = self.config.pit_loss + self.noise(self.config.pit_loss_jitter, rng);
            let lap_time = round_to(driving + pit_loss, 2).max(self.config.min_lap_time);
            return LapOutcome {
                action,
                lap_time,
                tyre_wear: self.config.fresh_tyre_wear,
                pitted: true,
                pit_time: Some(round_to(lap_time - self.config.base_lap_time, 2)),
            };
        }

        LapOutcome {
            action,
            lap_time: self.lap_time(action, profile, prev_wear, rng),
            tyre_wear: self.tyre_wear(prev_wear, action, profile),
            pitted: false,
            pit_time: None,
        }
    }

    fn noise<R: Rng + ?Sized>(&self, half_width: f64, rng: &mut R) -> f64 {
        if half_width > 0.0 {
            rng.random_range(-half_width..=half_width)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use types::Traits;

    fn profile(aggression: f64, tyre_management: f64) -> AgentProfile {
        AgentProfile::new("p").with_traits(Traits::new(aggression, 0.5, tyre_management, 0.5))
    }

    fn quiet() -> LapModel {
        LapModel::new(LapModelConfig::default().without_noise())
    }

    #[test]
    fn test_pace_modifiers() {
        assert_eq!(LapModel::pace_modifier(Action::PushHard, 1.0), -2.0);
        assert!((LapModel::pace_modifier(Action::PushMedium, 0.5) + 0.95).abs() < 1e-12);
        assert_eq!(LapModel::pace_modifier(Action::Maintain, 0.9), 0.0);
        assert_eq!(LapModel::pace_modifier(Action::ConserveHigh, 0.9), 2.2);
    }

    #[test]
    fn test_lap_time_without_noise() {
        let mut rng = StdRng::seed_from_u64(1);
        let model = quiet();
        // 90 - 1.5 - 0.45 + 0 = 88.05
        assert_eq!(model.lap_time(Action::PushHard, &profile(0.9, 0.5), 0.0, &mut rng), 88.05);
        // wear 0.64 -> 0.512 * 3 = 1.536 -> 91.536 -> 91.54
        assert_eq!(model.lap_time(Action::Maintain, &profile(0.5, 0.5), 0.64, &mut rng), 91.54);
    }

    #[test]
    fn test_lap_time_noise_is_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let model = LapModel::default();
        for _ in 0..500 {
            let t = model.lap_time(Action::Maintain, &profile(0.5, 0.5), 0.0, &mut rng);
            assert!((89.9..=90.1).contains(&t), "lap time {t} outside noise band");
        }
    }

    #[test]
    fn test_lap_time_floor() {
        let mut rng = StdRng::seed_from_u64(3);
        let model = LapModel::new(LapModelConfig::default().with_base_lap_time(5.0));
        let t = model.lap_time(Action::PushHard, &profile(1.0, 0.5), 0.0, &mut rng);
        assert_eq!(t, 10.0);
    }

    #[test]
    fn test_tyre_wear_progression() {
        let model = quiet();
        // 0.03 * 1.6 * (1 - 0.16) = 0.04032 -> 0.0403
        assert_eq!(model.tyre_wear(0.0, Action::PushHard, &profile(0.5, 0.4)), 0.0403);
        // 0.03 * 0.45 * (1 - 0.38) = 0.00837 -> 0.0084
        assert_eq!(model.tyre_wear(0.0, Action::ConserveHigh, &profile(0.5, 0.95)), 0.0084);
        assert_eq!(model.tyre_wear(0.99, Action::PushHard, &profile(0.5, 0.0)), 1.0);
    }

    #[test]
    fn test_pit_lap_resets_tyres() {
        let mut rng = StdRng::seed_from_u64(7);
        let model = LapModel::default();
        let outcome = model.simulate(Action::Pit, &profile(0.5, 0.5), 0.85, &mut rng);

        assert!(outcome.pitted);
        assert_eq!(outcome.tyre_wear, 0.02);
        // Maintain lap on fresh tyres (90 ± 0.1) plus 22 ± 1.5
        assert!((110.4..=113.6).contains(&outcome.lap_time));
        let pit_time = outcome.pit_time.unwrap();
        assert!((pit_time - (outcome.lap_time - 90.0)).abs() < 0.011);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let model = LapModel::default();
        let p = profile(0.7, 0.6);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for action in Action::ALL {
            assert_eq!(
                model.simulate(action, &p, 0.3, &mut a),
                model.simulate(action, &p, 0.3, &mut b)
            );
        }
    }
}
