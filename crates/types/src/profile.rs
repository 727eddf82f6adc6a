//! Agent behavioral profiles.
//!
//! A profile is the static identity of an agent plus the four behavioral
//! traits that the decision policy reads and the trait adaptation loop
//! rewrites after every lap.

use serde::{Deserialize, Serialize};

use crate::clamp;
use crate::ids::AgentId;

fn default_aggression() -> f64 {
    0.5
}

fn default_risk_taking() -> f64 {
    0.5
}

fn default_tyre_management() -> f64 {
    0.6
}

fn default_pit_bias() -> f64 {
    0.5
}

fn default_weather_sensitivity() -> f64 {
    0.5
}

fn default_learning_rate() -> f64 {
    AgentProfile::DEFAULT_LEARNING_RATE
}

fn default_expected_wear() -> f64 {
    AgentProfile::DEFAULT_EXPECTED_WEAR
}

/// The four adaptable behavioral traits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    #[serde(default = "default_aggression")]
    pub aggression: f64,
    #[serde(default = "default_risk_taking", alias = "risk")]
    pub risk_taking: f64,
    #[serde(default = "default_tyre_management")]
    pub tyre_management: f64,
    #[serde(default = "default_pit_bias")]
    pub pit_bias: f64,
}

impl Default for Traits {
    fn default() -> Self {
        Self {
            aggression: default_aggression(),
            risk_taking: default_risk_taking(),
            tyre_management: default_tyre_management(),
            pit_bias: default_pit_bias(),
        }
    }
}

impl Traits {
    pub fn new(aggression: f64, risk_taking: f64, tyre_management: f64, pit_bias: f64) -> Self {
        Self {
            aggression,
            risk_taking,
            tyre_management,
            pit_bias,
        }
    }

    /// Whether every trait lies in `[min, max]`.
    pub fn within(&self, min: f64, max: f64) -> bool {
        [
            self.aggression,
            self.risk_taking,
            self.tyre_management,
            self.pit_bias,
        ]
        .iter()
        .all(|v| (min..=max).contains(v))
    }
}

/// Identity and behavior of one racing agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: AgentId,
    /// Display name; falls back to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub traits: Traits,
    /// How strongly non-dry conditions push the agent towards the pits.
    #[serde(default = "default_weather_sensitivity")]
    pub weather_sensitivity: f64,
    /// Step size of the trait adaptation loop.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Tyre wear the agent expects to accumulate per lap.
    #[serde(default = "default_expected_wear", alias = "tyre_wear_rate")]
    pub expected_wear: f64,
}

impl AgentProfile {
    pub const DEFAULT_LEARNING_RATE: f64 = 0.02;
    pub const DEFAULT_EXPECTED_WEAR: f64 = 0.04;
    /// Floor applied to `expected_wear` so wear ratios stay finite.
    pub const MIN_EXPECTED_WEAR: f64 = 0.001;

    /// Create a profile with default traits.
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            traits: Traits::default(),
            weather_sensitivity: default_weather_sensitivity(),
            learning_rate: default_learning_rate(),
            expected_wear: default_expected_wear(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set all four traits.
    pub fn with_traits(mut self, traits: Traits) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_weather_sensitivity(mut self, sensitivity: f64) -> Self {
        self.weather_sensitivity = sensitivity;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_expected_wear(mut self, expected_wear: f64) -> Self {
        self.expected_wear = expected_wear;
        self
    }

    /// Name used in events.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// Return a copy with every numeric input forced into its valid range.
    ///
    /// Traits and weather sensitivity go to `[0, 1]`, non-finite values fall
    /// back to their defaults. The second element reports whether anything
    /// had to change.
    pub fn sanitized(&self) -> (Self, bool) {
        let unit = |value: f64, fallback: f64| {
            if value.is_finite() {
                clamp(value, 0.0, 1.0)
            } else {
                fallback
            }
        };

        let defaults = Traits::default();
        let traits = Traits {
            aggression: unit(self.traits.aggression, defaults.aggression),
            risk_taking: unit(self.traits.risk_taking, defaults.risk_taking),
            tyre_management: unit(self.traits.tyre_management, defaults.tyre_management),
            pit_bias: unit(self.traits.pit_bias, defaults.pit_bias),
        };
        let expected_wear = if self.expected_wear.is_finite() {
            self.expected_wear.max(Self::MIN_EXPECTED_WEAR)
        } else {
            Self::DEFAULT_EXPECTED_WEAR
        };

        let clean = Self {
            id: self.id.clone(),
            name: self.name.clone(),
            traits,
            weather_sensitivity: unit(self.weather_sensitivity, default_weather_sensitivity()),
            learning_rate: unit(self.learning_rate, Self::DEFAULT_LEARNING_RATE),
            expected_wear,
        };
        let changed = clean != *self;
        (clean, changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parsing_with_defaults_and_alias() {
        let json = r#"{
            "id": "aggressive_overtaker",
            "name": "Aggressive Overtaker",
            "aggression": 0.9,
            "risk": 0.85,
            "tyre_management": 0.4,
            "pit_bias": 0.3
        }"#;
        let profile: AgentProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, AgentId::from("aggressive_overtaker"));
        assert_eq!(profile.traits.risk_taking, 0.85);
        assert_eq!(profile.weather_sensitivity, 0.5);
        assert_eq!(profile.learning_rate, 0.02);
        assert_eq!(profile.expected_wear, 0.04);
        assert_eq!(profile.display_name(), "Aggressive Overtaker");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let profile = AgentProfile::new("agent_7");
        assert_eq!(profile.display_name(), "agent_7");
    }

    #[test]
    fn test_sanitized_clamps_out_of_range_inputs() {
        let profile = AgentProfile::new("x")
            .with_traits(Traits::new(1.4, -0.2, f64::NAN, 0.5))
            .with_weather_sensitivity(2.0)
            .with_expected_wear(0.0);

        let (clean, changed) = profile.sanitized();
        assert!(changed);
        assert_eq!(clean.traits.aggression, 1.0);
        assert_eq!(clean.traits.risk_taking, 0.0);
        assert_eq!(clean.traits.tyre_management, 0.6);
        assert_eq!(clean.weather_sensitivity, 1.0);
        assert_eq!(clean.expected_wear, AgentProfile::MIN_EXPECTED_WEAR);
    }

    #[test]
    fn test_sanitized_leaves_valid_profile_untouched() {
        let profile = AgentProfile::new("ok").with_traits(Traits::new(0.9, 0.85, 0.4, 0.3));
        let (clean, changed) = profile.sanitized();
        assert!(!changed);
        assert_eq!(clean, profile);
    }

    #[test]
    fn test_traits_within() {
        assert!(Traits::new(0.1, 0.5, 0.9, 0.3).within(0.1, 0.9));
        assert!(!Traits::new(0.95, 0.5, 0.5, 0.5).within(0.1, 0.9));
    }
}
