//! Race simulation endpoint.
//!
//! - `POST /api/simulate` - Run one race to completion
//!
//! The race runs on tokio's blocking pool; the handler only validates the
//! request and shapes the response.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use simulation::{RaceSimulation, SimulationConfig};
use tracing::{error, info};
use types::{
    AgentProfile, Event, Lap, LapTimeline, RaceConfig, SimulationResult, Summary, TimelineEntry,
};

use crate::error::{AppError, AppResult};
use crate::state::ServerState;

/// Simulation request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    pub race: RaceConfig,
    #[serde(default)]
    pub agents: Vec<AgentProfile>,
    /// Fixed seed for a reproducible run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Track base lap time in seconds.
    #[serde(default)]
    pub base_lap_time: Option<f64>,
    /// Pit lane time loss in seconds.
    #[serde(default)]
    pub pit_loss: Option<f64>,
}

impl SimulateRequest {
    /// Validate the request and set up the race.
    pub fn into_simulation(self) -> AppResult<RaceSimulation> {
        let mut config = SimulationConfig::default();
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(base) = self.base_lap_time {
            if !base.is_finite() || base <= 0.0 {
                return Err(AppError::BadRequest(format!(
                    "base_lap_time must be positive, got {base}"
                )));
            }
            config = config.with_base_lap_time(base);
        }
        if let Some(loss) = self.pit_loss {
            if !loss.is_finite() || loss < 0.0 {
                return Err(AppError::BadRequest(format!(
                    "pit_loss must be non-negative, got {loss}"
                )));
            }
            config = config.with_pit_loss(loss);
        }

        Ok(RaceSimulation::new(self.race, self.agents, config)?)
    }
}

/// Simulation response.
#[derive(Debug, Serialize)]
pub struct SimulateResponse {
    pub race_id: String,
    pub track_id: String,
    pub total_laps: Lap,
    pub seed: u64,
    pub laps: Vec<LapTimeline>,
    pub timeline: Vec<TimelineEntry>,
    /// Every event of the race, in emission order.
    pub events: Vec<Event>,
    pub summary: Summary,
}

impl From<SimulationResult> for SimulateResponse {
    fn from(result: SimulationResult) -> Self {
        let events = result.events().cloned().collect();
        Self {
            race_id: format!("{}-{:016x}", result.race.track_id, result.seed),
            track_id: result.race.track_id,
            total_laps: result.race.total_laps,
            seed: result.seed,
            laps: result.laps,
            timeline: result.timeline,
            events,
            summary: result.summary,
        }
    }
}

/// Run a race: `POST /api/simulate`
pub async fn simulate(
    State(state): State<ServerState>,
    Json(req): Json<SimulateRequest>,
) -> AppResult<Json<SimulateResponse>> {
    let sim = req.into_simulation()?;
    let seed = sim.seed();

    let result = tokio::task::spawn_blocking(move || sim.run())
        .await
        .map_err(|err| {
            error!(seed, %err, "simulation task failed");
            AppError::Internal(format!("simulation task failed: {err}"))
        })?;

    state
        .metrics
        .record_simulation(u64::from(result.race.total_laps));
    info!(
        seed,
        track = %result.race.track_id,
        laps = result.race.total_laps,
        winner = %result.summary.winner,
        "simulation complete"
    );

    Ok(Json(SimulateResponse::from(result)))
}
