//! Agent roster loading for the CLI.
//!
//! Rosters are JSON files holding either a bare list of profiles or an
//! object with a `profiles` list. Without a file the built-in three-car
//! field is used.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use serde::Deserialize;
use types::{AgentProfile, Traits};

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    List(Vec<AgentProfile>),
    Wrapped { profiles: Vec<AgentProfile> },
}

/// Parse a roster from JSON text.
pub fn parse_roster(json: &str) -> anyhow::Result<Vec<AgentProfile>> {
    let roster: RosterFile = serde_json::from_str(json)
        .context("roster must be a list of profiles or {\"profiles\": [...]}")?;
    let profiles = match roster {
        RosterFile::List(profiles) | RosterFile::Wrapped { profiles } => profiles,
    };
    if profiles.is_empty() {
        bail!("roster contains no profiles");
    }
    Ok(profiles)
}

/// Load a roster file.
pub fn load_roster(path: &Path) -> anyhow::Result<Vec<AgentProfile>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    parse_roster(&json).with_context(|| format!("invalid roster {}", path.display()))
}

/// Roster from `path`, or the built-in field.
pub fn resolve_roster(path: Option<&Path>) -> anyhow::Result<Vec<AgentProfile>> {
    match path {
        Some(path) => load_roster(path),
        None => Ok(default_roster()),
    }
}

/// Built-in three-car field.
pub fn default_roster() -> Vec<AgentProfile> {
    vec![
        AgentProfile::new("aggressive_overtaker")
            .with_name("Aggressive Overtaker")
            .with_traits(Traits::new(0.9, 0.85, 0.4, 0.3))
            .with_weather_sensitivity(0.6),
        AgentProfile::new("tyre_whisperer")
            .with_name("Tyre Whisperer")
            .with_traits(Traits::new(0.4, 0.35, 0.95, 0.4))
            .with_weather_sensitivity(0.55),
        AgentProfile::new("balanced_racer")
            .with_name("Balanced Racer")
            .with_traits(Traits::new(0.55, 0.5, 0.65, 0.5))
            .with_weather_sensitivity(0.5),
    ]
}
