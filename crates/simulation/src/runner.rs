//! Lap orchestrator: drives a race lap by lap.

use std::collections::HashSet;
use std::sync::Arc;

use agents::{
    AgentDynamicState, DecisionPolicy, LapPerformance, RaceContext, RuleBasedPolicy, adapt_traits,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_core::{LapModel, LapOutcome, rank_lap};
use tracing::{debug, info, warn};
use types::{
    AgentId, AgentProfile, ConfigurationError, Event, Lap, LapCompleteEvent, LapTimeline,
    OvertakeEvent, PitReason, PitStopEvent, PrlUpdateEvent, RaceConfig, SimulationResult,
    Summary, TimelineEntry, TraitDeltas, Weather, clamp, round_to,
};

use crate::config::SimulationConfig;
use crate::hooks::{AgentLapSnapshot, HookRunner, LapSnapshot, RaceStart, SimulationHook};
use crate::summary::{FastestLap, build_summary};

/// A single race run.
///
/// Owns every agent's profile and dynamic state for the duration of the run.
/// Profiles are mutated in place by trait adaptation; nothing else holds a
/// reference to them across laps.
pub struct RaceSimulation {
    race: RaceConfig,
    config: SimulationConfig,
    seed: u64,
    rng: StdRng,
    model: LapModel,
    policy: Box<dyn DecisionPolicy>,
    hooks: HookRunner,

    /// Roster in input order; index `i` here matches `states[i]`.
    profiles: Vec<AgentProfile>,
    states: Vec<AgentDynamicState>,

    weather: Weather,
    /// Last completed lap (0 before the start).
    current_lap: Lap,
    fastest: Option<FastestLap>,

    laps: Vec<LapTimeline>,
    timeline: Vec<TimelineEntry>,
}

impl RaceSimulation {
    /// Set up a race.
    ///
    /// Fails before any lap runs when the lap count is out of range, the
    /// roster is empty, or an id is empty or duplicated. Out-of-range
    /// profile values and weather switch probabilities are clamped with a
    /// warning.
    pub fn new(
        race: RaceConfig,
        profiles: Vec<AgentProfile>,
        mut config: SimulationConfig,
    ) -> Result<Self, ConfigurationError> {
        race.validate()?;
        if profiles.is_empty() {
            return Err(ConfigurationError::NoAgents);
        }

        let mut seen = HashSet::new();
        for profile in &profiles {
            if profile.id.is_empty() {
                return Err(ConfigurationError::EmptyAgentId);
            }
            if !seen.insert(profile.id.clone()) {
                return Err(ConfigurationError::DuplicateAgentId(profile.id.clone()));
            }
        }

        let profiles: Vec<AgentProfile> = profiles
            .iter()
            .map(|profile| {
                let (clean, changed) = profile.sanitized();
                if changed {
                    warn!(agent = %profile.id, "profile values out of range, clamped");
                }
                clean
            })
            .collect();

        let probability = clamp(config.weather_switch_probability, 0.0, 1.0);
        if probability != config.weather_switch_probability {
            warn!(
                requested = config.weather_switch_probability,
                applied = probability,
                "weather switch probability out of range, clamped"
            );
            config.weather_switch_probability = probability;
        }

        let states = (1..=profiles.len()).map(AgentDynamicState::new).collect();
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());

        Ok(Self {
            weather: race.weather_mode.initial_weather(),
            model: LapModel::new(config.lap_model.clone()),
            rng: StdRng::seed_from_u64(seed),
            seed,
            race,
            config,
            policy: Box::new(RuleBasedPolicy::new()),
            hooks: HookRunner::new(),
            profiles,
            states,
            current_lap: 0,
            fastest: None,
            laps: Vec::new(),
            timeline: Vec::new(),
        })
    }

    /// Replace the decision policy.
    pub fn with_policy(mut self, policy: Box<dyn DecisionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Register an observer. Hooks run in registration order.
    pub fn add_hook(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.add(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Force an agent to pit on its next lap.
    ///
    /// Returns `false` for an unknown id.
    pub fn request_pit(&mut self, agent_id: &AgentId) -> bool {
        match self.index_of(agent_id) {
            Some(idx) => {
                self.states[idx].pit_requested = true;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Seed of this run's random stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn race(&self) -> &RaceConfig {
        &self.race
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// Last completed lap (0 before the start).
    pub fn current_lap(&self) -> Lap {
        self.current_lap
    }

    pub fn is_finished(&self) -> bool {
        self.current_lap >= self.race.total_laps
    }

    /// Weather of the last lap run (initial weather before the start).
    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn profiles(&self) -> &[AgentProfile] {
        &self.profiles
    }

    pub fn states(&self) -> &[AgentDynamicState] {
        &self.states
    }

    pub fn profile(&self, agent_id: &AgentId) -> Option<&AgentProfile> {
        self.index_of(agent_id).map(|idx| &self.profiles[idx])
    }

    pub fn agent_state(&self, agent_id: &AgentId) -> Option<&AgentDynamicState> {
        self.index_of(agent_id).map(|idx| &self.states[idx])
    }

    /// Laps run so far.
    pub fn laps(&self) -> &[LapTimeline] {
        &self.laps
    }

    fn index_of(&self, agent_id: &AgentId) -> Option<usize> {
        self.profiles.iter().position(|p| &p.id == agent_id)
    }

    // =========================================================================
    // Lap loop
    // =========================================================================

    /// Run one lap.
    ///
    /// Returns `None` once every lap has been run.
    ///
    /// Lap phases:
    /// 1. Hook: on_race_start (first lap only)
    /// 2. Weather transition (mixed weather only)
    /// 3. Hook: on_lap_start
    /// 4. Decide and simulate every agent, in input order
    /// 5. Rank the field and resolve overtakes
    /// 6. Update dynamic state
    /// 7. Emit pit stop / lap complete pairs in finishing order
    /// 8. Emit overtakes
    /// 9. Adapt traits (from lap 2) and emit updates
    /// 10. Hook: on_lap_end, and on_race_end after the last lap
    pub fn step(&mut self) -> Option<LapTimeline> {
        if self.is_finished() {
            return None;
        }
        let lap = self.current_lap + 1;

        // Phase 1: race start
        if lap == 1 {
            self.start_race();
        }

        // Phase 2: weather
        self.update_weather(lap);

        // Phase 3: lap start
        self.hooks.on_lap_start(lap, self.weather);

        // Phase 4: decisions and lap outcomes
        let laps_remaining = self.race.total_laps - lap;
        let decisions: Vec<_> = (0..self.profiles.len())
            .map(|idx| {
                let ctx = RaceContext {
                    laps_remaining,
                    weather: self.weather,
                    gap_ahead: self.gap_ahead(idx),
                    total_agents: self.profiles.len(),
                };
                self.policy.evaluate(&self.states[idx], &self.profiles[idx], &ctx)
            })
            .collect();

        let outcomes: Vec<LapOutcome> = decisions
            .iter()
            .enumerate()
            .map(|(idx, decision)| {
                self.model.simulate(
                    decision.action,
                    &self.profiles[idx],
                    self.states[idx].tyre_wear,
                    &mut self.rng,
                )
            })
            .collect();

        // Phase 5: ranking
        let lap_times: Vec<f64> = outcomes.iter().map(|o| o.lap_time).collect();
        let previous_positions: Vec<usize> = self.states.iter().map(|s| s.position).collect();
        let ranked = rank_lap(&lap_times, &previous_positions);

        // Phase 6: dynamic state, keeping the pre-lap values adaptation needs
        let before: Vec<(f64, Option<f64>)> = self
            .states
            .iter()
            .map(|s| (s.tyre_wear, s.best_lap_time))
            .collect();
        for (idx, outcome) in outcomes.iter().enumerate() {
            let state = &mut self.states[idx];
            state.complete_lap(outcome.lap_time, outcome.tyre_wear, outcome.pitted);
            state.set_position(ranked.positions[idx]);
            self.fastest = FastestLap::update(
                self.fastest,
                FastestLap {
                    time: outcome.lap_time,
                    agent: idx,
                    lap,
                },
            );
        }

        let mut events = Vec::new();

        // Phase 7: pit stop / lap complete pairs
        for &idx in &ranked.order {
            let outcome = &outcomes[idx];
            let profile = &self.profiles[idx];
            let state = &self.states[idx];
            let position_change = ranked.position_changes[idx];

            if let Some(pit_stop_time) = outcome.pit_time {
                events.push(Event::PitStop(PitStopEvent {
                    agent_id: profile.id.clone(),
                    agent_name: profile.display_name().to_string(),
                    lap,
                    pit_stop_time,
                    position: state.position,
                    position_change,
                    reason: decisions[idx].pit_reason.unwrap_or(PitReason::Strategy),
                    timestamp: state.total_elapsed_time,
                }));
            }
            events.push(Event::LapComplete(LapCompleteEvent {
                agent_id: profile.id.clone(),
                agent_name: profile.display_name().to_string(),
                lap,
                action: outcome.action,
                lap_time: outcome.lap_time,
                position: state.position,
                position_change,
                tyre_wear: state.tyre_wear,
                tyre_age: state.tyre_age,
                timestamp: state.total_elapsed_time,
            }));
        }

        // Phase 8: overtakes
        for overtake in &ranked.overtakes {
            let overtaker = &self.profiles[overtake.overtaker];
            let overtaken = &self.profiles[overtake.overtaken];
            events.push(Event::Overtake(OvertakeEvent {
                agent_id: overtaker.id.clone(),
                agent_name: overtaker.display_name().to_string(),
                overtaken_agent_id: overtaken.id.clone(),
                overtaken_agent_name: overtaken.display_name().to_string(),
                lap,
                success: true,
                position_before: overtake.position_before,
                position_after: overtake.position_after,
                timestamp: self.states[overtake.overtaker].total_elapsed_time,
            }));
        }

        // Phase 9: trait adaptation
        let total_cars = self.profiles.len();
        for &idx in &ranked.order {
            let (wear_before, best_before) = before[idx];
            let outcome = &outcomes[idx];
            let state = &self.states[idx];
            let profile = &mut self.profiles[idx];

            let perf = LapPerformance {
                lap,
                current_lap_time: outcome.lap_time,
                best_lap_time: best_before.unwrap_or(outcome.lap_time),
                tyre_wear_increase: (state.tyre_wear - wear_before).max(0.0),
                expected_wear: profile.expected_wear,
                position_before: previous_positions[idx],
                position_after: state.position,
                total_cars,
                pitted: outcome.pitted,
            };
            let Some(update) = adapt_traits(&profile.traits, &perf, profile.learning_rate) else {
                continue;
            };
            debug_assert_eq!(
                update.deltas,
                TraitDeltas::between(&profile.traits, &update.traits)
            );
            profile.traits = update.traits;

            events.push(Event::PrlUpdate(PrlUpdateEvent {
                agent_id: profile.id.clone(),
                agent_name: profile.display_name().to_string(),
                lap,
                reward: update.reward,
                components: update.components,
                trait_deltas: update.deltas,
                traits: update.traits,
                timestamp: state.total_elapsed_time,
            }));
        }

        self.record_timeline(lap, &ranked.order, &outcomes);
        self.current_lap = lap;
        self.log_lap(lap, &ranked.order, &events);

        // Phase 10: lap end
        if !self.hooks.is_empty() {
            let snapshot = self.lap_snapshot(lap, &ranked.order, &outcomes, &events);
            self.hooks.on_lap_end(&snapshot);
        }

        let lap_timeline = LapTimeline {
            lap,
            weather: self.weather,
            events,
        };
        self.laps.push(lap_timeline.clone());

        if self.is_finished() {
            let summary = self.summary();
            info!(
                winner = %summary.winner,
                fastest_lap = summary.fastest_lap,
                laps = lap,
                "race finished"
            );
            self.hooks.on_race_end(&summary);
        }

        Some(lap_timeline)
    }

    /// Run every remaining lap and return the result.
    pub fn run(mut self) -> SimulationResult {
        while self.step().is_some() {}
        self.into_result()
    }

    /// Summary of the race so far.
    pub fn summary(&self) -> Summary {
        build_summary(&self.profiles, &self.states, self.fastest)
    }

    /// Result built from the laps run so far.
    pub fn result(&self) -> SimulationResult {
        SimulationResult {
            race: self.race.clone(),
            seed: self.seed,
            laps: self.laps.clone(),
            timeline: self.timeline.clone(),
            summary: self.summary(),
        }
    }

    /// Consume the simulation, returning the result of the laps run so far.
    pub fn into_result(self) -> SimulationResult {
        let summary = self.summary();
        SimulationResult {
            race: self.race,
            seed: self.seed,
            laps: self.laps,
            timeline: self.timeline,
            summary,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn start_race(&self) {
        info!(
            seed = self.seed,
            laps = self.race.total_laps,
            agents = self.profiles.len(),
            track = %self.race.track_id,
            weather = ?self.race.weather_mode,
            policy = self.policy.name(),
            "race starting"
        );
        if !self.hooks.is_empty() {
            self.hooks.on_race_start(&RaceStart {
                race: self.race.clone(),
                seed: self.seed,
                agents: self.profiles.iter().map(|p| p.id.clone()).collect(),
            });
        }
    }

    fn update_weather(&mut self, lap: Lap) {
        if !self.race.weather_mode.is_changeable() {
            return;
        }
        if self.rng.random_bool(self.config.weather_switch_probability) {
            let next = self.weather.toggled();
            debug!(lap, from = %self.weather, to = %next, "weather changed");
            self.weather = next;
        }
    }

    /// Previous-lap time difference to the car one place ahead.
    fn gap_ahead(&self, idx: usize) -> Option<f64> {
        let state = &self.states[idx];
        let own = state.last_lap_time?;
        let ahead_position = state.position.checked_sub(1).filter(|&p| p >= 1)?;
        let ahead = self.states.iter().find(|s| s.position == ahead_position)?;
        Some(own - ahead.last_lap_time?)
    }

    fn record_timeline(&mut self, lap: Lap, order: &[usize], outcomes: &[LapOutcome]) {
        for &idx in order {
            let state = &self.states[idx];
            self.timeline.push(TimelineEntry {
                lap,
                agent_id: self.profiles[idx].id.clone(),
                position: state.position,
                lap_time: outcomes[idx].lap_time,
                tyre_wear_pct: round_to(state.tyre_wear * 100.0, 2),
                action: outcomes[idx].action,
            });
        }
    }

    fn lap_snapshot(
        &self,
        lap: Lap,
        order: &[usize],
        outcomes: &[LapOutcome],
        events: &[Event],
    ) -> LapSnapshot {
        LapSnapshot {
            lap,
            weather: self.weather,
            events: events.to_vec(),
            agents: order
                .iter()
                .map(|&idx| AgentLapSnapshot {
                    agent_id: self.profiles[idx].id.clone(),
                    position: self.states[idx].position,
                    lap_time: outcomes[idx].lap_time,
                    tyre_wear: self.states[idx].tyre_wear,
                    total_elapsed_time: self.states[idx].total_elapsed_time,
                    traits: self.profiles[idx].traits,
                })
                .collect(),
        }
    }

    fn log_lap(&self, lap: Lap, order: &[usize], events: &[Event]) {
        let leader = order
            .first()
            .map(|&idx| self.profiles[idx].id.as_str())
            .unwrap_or("-");
        if self.config.verbose {
            info!(lap, weather = %self.weather, leader, events = events.len(), "lap complete");
        } else {
            debug!(lap, weather = %self.weather, leader, events = events.len(), "lap complete");
        }
    }
}

impl std::fmt::Debug for RaceSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceSimulation")
            .field("race", &self.race)
            .field("seed", &self.seed)
            .field("policy", &self.policy.name())
            .field("current_lap", &self.current_lap)
            .field("agents", &self.profiles.len())
            .field("hooks", &self.hooks)
            .finish()
    }
}
