//! Simulation configuration options.

use sim_core::LapModelConfig;

/// Configuration for a race run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Seed for the run's random stream. `None` draws a fresh seed, which is
    /// reported back through `RaceSimulation::seed`.
    pub seed: Option<u64>,

    /// Lap time and tyre model constants.
    pub lap_model: LapModelConfig,

    /// Per-lap chance of switching dry ↔ rain in `Mixed` weather.
    pub weather_switch_probability: f64,

    /// Log every lap at info level instead of debug.
    pub verbose: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            lap_model: LapModelConfig::default(),
            weather_switch_probability: 0.10,
            verbose: false,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the lap model constants.
    pub fn with_lap_model(mut self, lap_model: LapModelConfig) -> Self {
        self.lap_model = lap_model;
        self
    }

    /// Set the track reference lap time.
    pub fn with_base_lap_time(mut self, seconds: f64) -> Self {
        self.lap_model.base_lap_time = seconds;
        self
    }

    /// Set the mean pit loss.
    pub fn with_pit_loss(mut self, seconds: f64) -> Self {
        self.lap_model.pit_loss = seconds;
        self
    }

    /// Set the mixed-weather switch probability (clamped to `[0, 1]`).
    pub fn with_weather_switch_probability(mut self, probability: f64) -> Self {
        self.weather_switch_probability = types::clamp(probability, 0.0, 1.0);
        self
    }

    /// Enable verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
