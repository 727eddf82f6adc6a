//! Race Strategy Gym - Main binary
//!
//! Runs lap-by-lap race simulations from the command line, or serves them
//! over HTTP.
//!
//! # Modes
//!
//! - `run`: simulate one race and print the standings (or `--json` for the
//!   full result)
//! - `serve`: start the HTTP server (`POST /api/simulate`, `GET /health`)
//!
//! Every option falls back to a `SIM_*` environment variable.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use server::ServerConfig;
use simulation::{RaceMetricsHook, RaceMetricsSnapshot, RaceSimulation, SimulationConfig};
use tracing::info;
use types::{RaceConfig, SimulationResult, WeatherMode};

/// Race Strategy Gym - multi-agent race strategy simulation
#[derive(Parser, Debug)]
#[command(name = "race-strategy-gym")]
#[command(about = "Lap-by-lap race strategy simulation with adaptive agents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate one race
    Run {
        /// Number of laps
        #[arg(short, long, env = "SIM_LAPS", default_value_t = 50)]
        laps: u32,

        /// Seed for a reproducible race (random if omitted)
        #[arg(short, long, env = "SIM_SEED")]
        seed: Option<u64>,

        /// Weather regime
        #[arg(short, long, env = "SIM_WEATHER", value_enum, default_value_t = WeatherArg::Dry)]
        weather: WeatherArg,

        /// Track identifier
        #[arg(short, long, env = "SIM_TRACK", default_value = "default")]
        track: String,

        /// Roster file (JSON list or {"profiles": [...]})
        #[arg(short, long, env = "SIM_PROFILES", value_name = "PATH")]
        profiles: Option<PathBuf>,

        /// Track base lap time in seconds
        #[arg(long)]
        base_lap_time: Option<f64>,

        /// Pit lane time loss in seconds
        #[arg(long)]
        pit_loss: Option<f64>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Log every lap
        #[arg(short, long)]
        verbose: bool,
    },
    /// Serve simulations over HTTP
    Serve {
        /// Host to bind to (overrides SIM_SERVER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides SIM_SERVER_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum WeatherArg {
    Dry,
    Rain,
    Mixed,
}

impl From<WeatherArg> for WeatherMode {
    fn from(arg: WeatherArg) -> Self {
        match arg {
            WeatherArg::Dry => WeatherMode::Dry,
            WeatherArg::Rain => WeatherMode::Rain,
            WeatherArg::Mixed => WeatherMode::Mixed,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `run --json` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            laps,
            seed,
            weather,
            track,
            profiles,
            base_lap_time,
            pit_loss,
            json,
            verbose,
        } => {
            let roster = config::resolve_roster(profiles.as_deref())?;
            info!("Roster: {} agents", roster.len());

            let race = RaceConfig::new(laps)
                .with_weather(weather.into())
                .with_track(track);

            let mut sim_config = SimulationConfig::default().with_verbose(verbose);
            if let Some(seed) = seed {
                sim_config = sim_config.with_seed(seed);
            }
            if let Some(base) = base_lap_time {
                sim_config = sim_config.with_base_lap_time(base);
            }
            if let Some(loss) = pit_loss {
                sim_config = sim_config.with_pit_loss(loss);
            }

            let mut sim =
                RaceSimulation::new(race, roster, sim_config).context("invalid race setup")?;
            let metrics = Arc::new(RaceMetricsHook::new());
            sim.add_hook(metrics.clone());

            let result = sim.run();

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_report(&result, &metrics.snapshot());
            }
        }
        Commands::Serve { host, port } => {
            let server_config = server_config(host, port);
            info!("Starting server on {}", server_config.bind_addr());
            server::serve(&server_config)
                .await
                .with_context(|| format!("server failed on {}", server_config.bind_addr()))?;
        }
    }

    Ok(())
}

/// Environment settings with command line overrides applied.
fn server_config(host: Option<String>, port: Option<u16>) -> ServerConfig {
    let mut config = ServerConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    config
}

// ============================================================================
// Report
// ============================================================================

fn print_report(result: &SimulationResult, metrics: &RaceMetricsSnapshot) {
    let summary = &result.summary;

    println!(
        "\n{} | {} laps | {:?} | seed {}",
        result.race.track_id, result.race.total_laps, result.race.weather_mode, result.seed
    );
    println!("{}", "─".repeat(86));
    println!(
        "{:>3}  {:<24} {:>11} {:>9} {:>9} {:>5} {:>7}",
        "Pos", "Agent", "Total", "Gap", "Best", "Pits", "Tyres"
    );
    println!("{}", "─".repeat(86));

    for standing in &summary.standings {
        let gap = if standing.place == 1 {
            "-".to_string()
        } else {
            format!("+{:.3}", standing.gap_to_winner)
        };
        println!(
            "{:>3}  {:<24} {:>11.3} {:>9} {:>9.2} {:>5} {:>6.1}%",
            standing.place,
            standing.agent_name,
            standing.total_time,
            gap,
            standing.best_lap,
            standing.pit_stops,
            standing.final_tyre_wear * 100.0
        );
    }

    println!("{}", "─".repeat(86));
    println!("Winner:        {}", summary.winner);
    println!(
        "Fastest lap:   {:.2}s ({}, lap {})",
        summary.fastest_lap, summary.fastest_lap_agent, summary.fastest_lap_number
    );
    println!("Avg tyre wear: {:.2}%", summary.avg_tyre_wear_pct);
    println!(
        "Overtakes:     {}   Pit stops: {}   Mean reward: {:.4}",
        metrics.overtakes, metrics.pit_stops, metrics.mean_reward
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_flags_override_environment() {
        let args = [
            "race-strategy-gym",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "9100",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Commands::Serve { host, port } = cli.command else {
            panic!("expected serve");
        };
        let config = server_config(host, port);
        assert_eq!(config.bind_addr(), "127.0.0.1:9100");
    }

    #[test]
    fn test_serve_without_flags_uses_environment_config() {
        let cli = Cli::try_parse_from(["race-strategy-gym", "serve"]).unwrap();
        let Commands::Serve { host, port } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(server_config(host, port), ServerConfig::from_env());
    }
}
