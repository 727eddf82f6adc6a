//! Server crate: Axum HTTP boundary for the race strategy gym.
//!
//! Accepts race requests over HTTP, runs each race on the blocking pool and
//! returns the full result.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐  spawn_blocking  ┌──────────────────────┐
//! │  Axum handler        │ ───────────────► │  RaceSimulation      │
//! │  (async)             │                  │  (sync, one per      │
//! │  POST /api/simulate  │ ◄─────────────── │   request)           │
//! └──────────────────────┘ SimulationResult └──────────────────────┘
//! ```
//!
//! Requests never share simulation state; each run owns its roster and
//! random stream.
//!
//! # Modules
//!
//! - [`app`]: Axum application builder, router setup and server config
//! - [`state`]: Shared server state (start time, counters)
//! - [`error`]: Unified error handling with HTTP status codes
//! - [`routes`]: HTTP route handlers (health, api)

pub mod app;
pub mod error;
pub mod routes;
pub mod state;

pub use app::{ServerConfig, create_app, serve};
pub use error::{AppError, AppResult};
pub use state::{ServerMetrics, ServerState};
