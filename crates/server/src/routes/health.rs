//! Health check endpoint.
//!
//! - `GET /health` - Liveness check (always 200 if server is up)

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::ServerState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: &'static str,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Races completed since start.
    pub simulations_run: u64,
}

/// Liveness check: `GET /health`
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        uptime_secs: state.uptime_secs(),
        simulations_run: state.metrics.simulations_run(),
    })
}
