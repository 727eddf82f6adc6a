//! Decision policy: one action per agent per lap.
//!
//! [`RuleBasedPolicy`] is a fixed rule table evaluated in precedence order:
//!
//! 1. external must-pit request
//! 2. hard tyre wear threshold (inclusive)
//! 3. profile-adjusted soft wear window, only with more than 4 laps left
//! 4. weather-sensitive stop on worn tyres in non-dry conditions
//! 5. attack when close behind another car
//! 6. late-race push when not leading
//! 7. tyre conservation
//! 8. default pace
//!
//! The policy never fails: callers sanitize profile inputs beforehand.

use types::{Action, AgentProfile, PitReason, Weather, clamp};

use crate::state::AgentDynamicState;

/// Tyre wear at or above which an agent always pits.
pub const HARD_PIT_WEAR: f64 = 0.82;
/// Base soft pit threshold before the pit-bias adjustment.
pub const SOFT_PIT_WEAR: f64 = 0.70;
/// Wear above which an agent pits inside the soft window regardless of bias.
pub const SOFT_WINDOW_FORCE_WEAR: f64 = 0.78;
/// Soft-window stops are only considered with more laps than this remaining.
pub const SOFT_WINDOW_MIN_LAPS: u32 = 4;
/// Gap (seconds) to the car ahead that counts as "within striking distance".
pub const ATTACK_GAP: f64 = 1.5;
/// Laps remaining at or below which the late-race push applies.
pub const LATE_RACE_LAPS: u32 = 6;

/// Race-level inputs to a decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceContext {
    /// `total_laps - current_lap`.
    pub laps_remaining: u32,
    pub weather: Weather,
    /// Time behind the car ahead on the previous lap; `None` for the leader
    /// and on lap 1.
    pub gap_ahead: Option<f64>,
    pub total_agents: usize,
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    /// Set only when `action` is [`Action::Pit`].
    pub pit_reason: Option<PitReason>,
}

impl Decision {
    fn run(action: Action) -> Self {
        Self {
            action,
            pit_reason: None,
        }
    }

    fn pit(reason: PitReason) -> Self {
        Self {
            action: Action::Pit,
            pit_reason: Some(reason),
        }
    }
}

/// Maps agent state, profile and race context to an action.
///
/// Implementations must be pure and deterministic.
pub trait DecisionPolicy: Send + Sync {
    /// Evaluate the policy, including the reason for any pit stop.
    fn evaluate(
        &self,
        state: &AgentDynamicState,
        profile: &AgentProfile,
        ctx: &RaceContext,
    ) -> Decision;

    /// The chosen action only.
    fn decide(
        &self,
        state: &AgentDynamicState,
        profile: &AgentProfile,
        ctx: &RaceContext,
    ) -> Action {
        self.evaluate(state, profile, ctx).action
    }

    fn name(&self) -> &str {
        "DecisionPolicy"
    }
}

/// Profile-aware soft pit threshold.
///
/// Higher pit bias lowers the threshold (pit earlier); bounded to `[0.45, 0.85]`.
pub fn adjusted_soft_threshold(pit_bias: f64) -> f64 {
    clamp(SOFT_PIT_WEAR - (pit_bias - 0.5) * 0.15, 0.45, 0.85)
}

/// The rule-table policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedPolicy;

impl RuleBasedPolicy {
    pub fn new() -> Self {
        Self
    }

    fn pit_decision(
        state: &AgentDynamicState,
        profile: &AgentProfile,
        ctx: &RaceContext,
    ) -> Option<PitReason> {
        let wear = state.tyre_wear;
        let traits = &profile.traits;

        if state.pit_requested {
            return Some(PitReason::Requested);
        }

        if wear >= HARD_PIT_WEAR {
            return Some(PitReason::TyreWear);
        }

        if wear >= adjusted_soft_threshold(traits.pit_bias)
            && ctx.laps_remaining > SOFT_WINDOW_MIN_LAPS
        {
            if traits.pit_bias > 0.6 || traits.tyre_management > 0.8 {
                return Some(PitReason::Strategy);
            }
            if wear > SOFT_WINDOW_FORCE_WEAR {
                return Some(PitReason::TyreWear);
            }
        }

        if !ctx.weather.is_dry() && profile.weather_sensitivity > 0.75 && wear > 0.6 {
            return Some(PitReason::Weather);
        }

        None
    }

    fn pace_decision(
        state: &AgentDynamicState,
        profile: &AgentProfile,
        ctx: &RaceContext,
    ) -> Action {
        let wear = state.tyre_wear;
        let traits = &profile.traits;

        let close_behind = ctx.gap_ahead.is_some_and(|gap| gap <= ATTACK_GAP);
        if close_behind && traits.aggression > 0.7 {
            return if traits.aggression > 0.85 {
                Action::PushHard
            } else {
                Action::PushMedium
            };
        }

        if ctx.laps_remaining <= LATE_RACE_LAPS
            && traits.risk_taking > 0.7
            && !state.is_leading()
        {
            return if traits.risk_taking > 0.85 {
                Action::PushHard
            } else {
                Action::PushMedium
            };
        }

        if wear > 0.55 && traits.tyre_management > 0.6 {
            if wear > 0.75 || traits.tyre_management > 0.85 {
                return Action::ConserveHigh;
            }
            if wear > 0.65 {
                return Action::ConserveMedium;
            }
            return Action::ConserveLow;
        }

        if traits.aggression > 0.65 || traits.risk_taking > 0.65 {
            Action::PushMedium
        } else {
            Action::Maintain
        }
    }
}

impl DecisionPolicy for RuleBasedPolicy {
    fn evaluate(
        &self,
        state: &AgentDynamicState,
        profile: &AgentProfile,
        ctx: &RaceContext,
    ) -> Decision {
        match Self::pit_decision(state, profile, ctx) {
            Some(reason) => Decision::pit(reason),
            None => Decision::run(Self::pace_decision(state, profile, ctx)),
        }
    }

    fn name(&self) -> &str {
        "RuleBasedPolicy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Traits;

    fn profile(aggression: f64, risk: f64, tyre: f64, pit_bias: f64) -> AgentProfile {
        AgentProfile::new("test").with_traits(Traits::new(aggression, risk, tyre, pit_bias))
    }

    fn state(position: usize, wear: f64) -> AgentDynamicState {
        let mut s = AgentDynamicState::new(position);
        s.tyre_wear = wear;
        s
    }

    fn ctx(laps_remaining: u32) -> RaceContext {
        RaceContext {
            laps_remaining,
            weather: Weather::Dry,
            gap_ahead: None,
            total_agents: 3,
        }
    }

    #[test]
    fn test_hard_threshold_is_inclusive_for_any_profile() {
        let policy = RuleBasedPolicy::new();
        let grid = [0.0, 0.3, 0.6, 0.9, 1.0];
        for &a in &grid {
            for &r in &grid {
                for &t in &grid {
                    for &p in &grid {
                        let decision =
                            policy.evaluate(&state(2, 0.82), &profile(a, r, t, p), &ctx(1));
                        assert_eq!(decision.action, Action::Pit);
                        assert_eq!(decision.pit_reason, Some(PitReason::TyreWear));
                    }
                }
            }
        }
    }

    #[test]
    fn test_pit_request_takes_precedence() {
        let mut s = state(1, 0.0);
        s.pit_requested = true;
        let decision = RuleBasedPolicy.evaluate(&s, &profile(0.9, 0.9, 0.9, 0.1), &ctx(20));
        assert_eq!(decision, Decision::pit(PitReason::Requested));
    }

    #[test]
    fn test_adjusted_soft_threshold_bounds() {
        assert!((adjusted_soft_threshold(0.5) - 0.70).abs() < 1e-12);
        assert!((adjusted_soft_threshold(1.0) - 0.625).abs() < 1e-12);
        assert!((adjusted_soft_threshold(0.0) - 0.775).abs() < 1e-12);
        assert_eq!(adjusted_soft_threshold(-10.0), 0.85);
        assert_eq!(adjusted_soft_threshold(10.0), 0.45);
    }

    #[test]
    fn test_soft_window_strategy_stop() {
        // pit_bias 0.7 -> threshold 0.67
        let decision =
            RuleBasedPolicy.evaluate(&state(2, 0.68), &profile(0.5, 0.5, 0.5, 0.7), &ctx(10));
        assert_eq!(decision, Decision::pit(PitReason::Strategy));

        // Same wear with few laps left: no soft-window stop.
        let decision =
            RuleBasedPolicy.evaluate(&state(2, 0.68), &profile(0.5, 0.5, 0.5, 0.7), &ctx(4));
        assert_ne!(decision.action, Action::Pit);
    }

    #[test]
    fn test_soft_window_forced_above_078() {
        // Low pit bias, low tyre management: only the 0.78 override triggers.
        let decision =
            RuleBasedPolicy.evaluate(&state(2, 0.79), &profile(0.5, 0.5, 0.5, 0.3), &ctx(10));
        assert_eq!(decision, Decision::pit(PitReason::TyreWear));

        let decision =
            RuleBasedPolicy.evaluate(&state(2, 0.77), &profile(0.5, 0.5, 0.5, 0.3), &ctx(10));
        assert_ne!(decision.action, Action::Pit);
    }

    #[test]
    fn test_weather_stop_only_in_rain() {
        let p = profile(0.5, 0.5, 0.5, 0.3).with_weather_sensitivity(0.8);
        let mut rain = ctx(2);
        rain.weather = Weather::Rain;

        assert_eq!(
            RuleBasedPolicy.evaluate(&state(2, 0.65), &p, &rain),
            Decision::pit(PitReason::Weather)
        );
        assert_ne!(RuleBasedPolicy.decide(&state(2, 0.65), &p, &ctx(2)), Action::Pit);
    }

    #[test]
    fn test_attack_when_close_behind() {
        let mut c = ctx(20);
        c.gap_ahead = Some(1.2);
        assert_eq!(
            RuleBasedPolicy.decide(&state(2, 0.1), &profile(0.9, 0.3, 0.5, 0.5), &c),
            Action::PushHard
        );
        assert_eq!(
            RuleBasedPolicy.decide(&state(2, 0.1), &profile(0.75, 0.3, 0.5, 0.5), &c),
            Action::PushMedium
        );

        c.gap_ahead = Some(1.6);
        assert_eq!(
            RuleBasedPolicy.decide(&state(2, 0.1), &profile(0.6, 0.3, 0.5, 0.5), &c),
            Action::Maintain
        );
    }

    #[test]
    fn test_late_race_push_skips_leader() {
        let p = profile(0.3, 0.9, 0.5, 0.5);
        assert_eq!(RuleBasedPolicy.decide(&state(3, 0.1), &p, &ctx(5)), Action::PushHard);

        // The leader falls through to the default rule (risk > 0.65).
        assert_eq!(RuleBasedPolicy.decide(&state(1, 0.1), &p, &ctx(5)), Action::PushMedium);

        let p = profile(0.3, 0.8, 0.5, 0.5);
        assert_eq!(RuleBasedPolicy.decide(&state(2, 0.1), &p, &ctx(6)), Action::PushMedium);
    }

    #[test]
    fn test_conservation_levels() {
        let p = profile(0.3, 0.3, 0.7, 0.5);
        assert_eq!(RuleBasedPolicy.decide(&state(2, 0.58), &p, &ctx(2)), Action::ConserveLow);
        assert_eq!(RuleBasedPolicy.decide(&state(2, 0.70), &p, &ctx(2)), Action::ConserveMedium);
        assert_eq!(RuleBasedPolicy.decide(&state(2, 0.76), &p, &ctx(2)), Action::ConserveHigh);

        let whisperer = profile(0.3, 0.3, 0.9, 0.5);
        assert_eq!(
            RuleBasedPolicy.decide(&state(2, 0.56), &whisperer, &ctx(2)),
            Action::ConserveHigh
        );
    }

    #[test]
    fn test_default_pace() {
        assert_eq!(
            RuleBasedPolicy.decide(&state(2, 0.1), &profile(0.7, 0.2, 0.5, 0.5), &ctx(20)),
            Action::PushMedium
        );
        assert_eq!(
            RuleBasedPolicy.decide(&state(2, 0.1), &profile(0.4, 0.35, 0.95, 0.4), &ctx(20)),
            Action::Maintain
        );
    }
}
