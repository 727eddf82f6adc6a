//! Closing race summary.

use std::collections::BTreeMap;

use agents::AgentDynamicState;
use types::{AgentProfile, Lap, StandingEntry, Summary, round_to};

/// Fastest lap seen so far: (time, roster index, lap number).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FastestLap {
    pub time: f64,
    pub agent: usize,
    pub lap: Lap,
}

impl FastestLap {
    /// Keep the earlier record on ties.
    pub fn update(current: Option<Self>, candidate: Self) -> Option<Self> {
        match current {
            Some(best) if best.time <= candidate.time => Some(best),
            _ => Some(candidate),
        }
    }
}

/// Build the summary from the field's current state.
///
/// Standings order by cumulative elapsed time; ties keep roster order, so
/// the winner is the first agent with the lowest total.
pub(crate) fn build_summary(
    profiles: &[AgentProfile],
    states: &[AgentDynamicState],
    fastest: Option<FastestLap>,
) -> Summary {
    let mut ranking: Vec<usize> = (0..profiles.len()).collect();
    let elapsed = |idx: usize| states[idx].total_elapsed_time;
    ranking.sort_by(|&a, &b| elapsed(a).total_cmp(&elapsed(b)));

    let winner_idx = ranking.first().copied().unwrap_or(0);
    let winner_time = states
        .get(winner_idx)
        .map_or(0.0, |s| s.total_elapsed_time);

    let standings: Vec<StandingEntry> = ranking
        .iter()
        .enumerate()
        .map(|(place, &idx)| {
            let profile = &profiles[idx];
            let state = &states[idx];
            StandingEntry {
                place: place + 1,
                agent_id: profile.id.clone(),
                agent_name: profile.display_name().to_string(),
                total_time: round_to(state.total_elapsed_time, 3),
                gap_to_winner: round_to(state.total_elapsed_time - winner_time, 3),
                best_lap: state.best_lap_time.unwrap_or(0.0),
                pit_stops: state.pit_stop_count,
                final_tyre_wear: state.tyre_wear,
                final_traits: profile.traits,
            }
        })
        .collect();

    let pit_stops: BTreeMap<_, _> = profiles
        .iter()
        .zip(states)
        .map(|(profile, state)| (profile.id.clone(), state.pit_stop_count))
        .collect();

    let avg_tyre_wear_pct = if states.is_empty() {
        0.0
    } else {
        let mean = states.iter().map(|s| s.tyre_wear).sum::<f64>() / states.len() as f64;
        round_to(mean * 100.0, 2)
    };

    let (fastest_lap, fastest_idx, fastest_lap_number) =
        fastest.map_or((0.0, winner_idx, 0), |f| (f.time, f.agent, f.lap));

    Summary {
        fastest_lap,
        fastest_lap_agent: profiles
            .get(fastest_idx)
            .map(|p| p.id.clone())
            .unwrap_or_default(),
        fastest_lap_number,
        avg_tyre_wear_pct,
        pit_stops,
        winner: profiles
            .get(winner_idx)
            .map(|p| p.id.clone())
            .unwrap_or_default(),
        standings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::AgentId;

    fn finished(elapsed: f64, wear: f64, pits: u32) -> AgentDynamicState {
        let mut state = AgentDynamicState::new(1);
        state.total_elapsed_time = elapsed;
        state.tyre_wear = wear;
        state.pit_stop_count = pits;
        state.best_lap_time = Some(89.0);
        state
    }

    #[test]
    fn test_winner_and_standings() {
        let profiles = vec![
            AgentProfile::new("a"),
            AgentProfile::new("b").with_name("Bee"),
            AgentProfile::new("c"),
        ];
        let states = vec![
            finished(905.0, 0.30, 1),
            finished(900.5, 0.20, 0),
            finished(900.5, 0.10, 2),
        ];
        let fastest = FastestLap::update(
            None,
            FastestLap {
                time: 88.4,
                agent: 2,
                lap: 7,
            },
        );

        let summary = build_summary(&profiles, &states, fastest);
        // b and c tie on time; roster order puts b first.
        assert_eq!(summary.winner, AgentId::from("b"));
        assert_eq!(summary.standings[0].agent_name, "Bee");
        assert_eq!(summary.standings[1].agent_id, AgentId::from("c"));
        assert_eq!(summary.standings[2].gap_to_winner, 4.5);
        assert_eq!(summary.avg_tyre_wear_pct, 20.0);
        assert_eq!(summary.pit_stops[&AgentId::from("c")], 2);
        assert_eq!(summary.fastest_lap, 88.4);
        assert_eq!(summary.fastest_lap_agent, AgentId::from("c"));
        assert_eq!(summary.fastest_lap_number, 7);
    }

    #[test]
    fn test_fastest_lap_keeps_first_on_tie() {
        let first = FastestLap {
            time: 88.0,
            agent: 0,
            lap: 3,
        };
        let tie = FastestLap {
            time: 88.0,
            agent: 1,
            lap: 4,
        };
        let faster = FastestLap {
            time: 87.9,
            agent: 1,
            lap: 5,
        };
        let best = FastestLap::update(Some(first), tie);
        assert_eq!(best, Some(first));
        assert_eq!(FastestLap::update(best, faster), Some(faster));
    }
}
