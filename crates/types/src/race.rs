//! Race configuration and weather.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigurationError;
use crate::ids::Lap;

/// Shortest supported race.
pub const MIN_LAPS: Lap = 1;

/// Longest supported race.
pub const MAX_LAPS: Lap = 200;

/// Track conditions for a single lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Dry,
    Rain,
}

impl Weather {
    pub fn is_dry(self) -> bool {
        matches!(self, Weather::Dry)
    }

    /// The other condition (Dry ↔ Rain).
    pub fn toggled(self) -> Self {
        match self {
            Weather::Dry => Weather::Rain,
            Weather::Rain => Weather::Dry,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weather::Dry => f.write_str("dry"),
            Weather::Rain => f.write_str("rain"),
        }
    }
}

/// Weather regime requested for the whole race.
///
/// `Dry` and `Rain` are fixed for the race; `Mixed` starts dry and may
/// switch between dry and rain at the start of any lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherMode {
    #[default]
    Dry,
    Rain,
    Mixed,
}

impl WeatherMode {
    /// Conditions on lap 1.
    pub fn initial_weather(self) -> Weather {
        match self {
            WeatherMode::Dry | WeatherMode::Mixed => Weather::Dry,
            WeatherMode::Rain => Weather::Rain,
        }
    }

    /// Whether conditions can change mid-race.
    pub fn is_changeable(self) -> bool {
        matches!(self, WeatherMode::Mixed)
    }
}

/// Immutable parameters of one race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Number of laps to run, in `[MIN_LAPS, MAX_LAPS]`.
    pub total_laps: Lap,
    /// Weather regime.
    #[serde(default, alias = "weather")]
    pub weather_mode: WeatherMode,
    /// Opaque track identifier.
    #[serde(default = "default_track_id")]
    pub track_id: String,
}

fn default_track_id() -> String {
    "default".to_string()
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            total_laps: 50,
            weather_mode: WeatherMode::Dry,
            track_id: default_track_id(),
        }
    }
}

impl RaceConfig {
    /// Create a race with the given lap count and default track/weather.
    pub fn new(total_laps: Lap) -> Self {
        Self {
            total_laps,
            ..Default::default()
        }
    }

    /// Set the weather regime.
    pub fn with_weather(mut self, weather_mode: WeatherMode) -> Self {
        self.weather_mode = weather_mode;
        self
    }

    /// Set the track identifier.
    pub fn with_track(mut self, track_id: impl Into<String>) -> Self {
        self.track_id = track_id.into();
        self
    }

    /// Check the lap count is within range.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(MIN_LAPS..=MAX_LAPS).contains(&self.total_laps) {
            return Err(ConfigurationError::LapCountOutOfRange {
                laps: self.total_laps,
            });
        }
        Ok(())
    }
}
