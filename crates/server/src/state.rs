//! Shared server state.
//!
//! Cloned into each handler via Axum's `State` extractor. Races themselves
//! are never stored here: every request owns its simulation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct ServerState {
    /// Server start time.
    pub start_time: Instant,

    /// Shared metrics.
    pub metrics: Arc<ServerMetrics>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            metrics: Arc::new(ServerMetrics::new()),
        }
    }

    /// Get server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Server-wide counters.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    /// Races completed since start.
    pub simulations_run: AtomicU64,
    /// Laps simulated across all races.
    pub laps_simulated: AtomicU64,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished race.
    pub fn record_simulation(&self, laps: u64) {
        self.simulations_run.fetch_add(1, Ordering::Relaxed);
        self.laps_simulated.fetch_add(laps, Ordering::Relaxed);
    }

    pub fn simulations_run(&self) -> u64 {
        self.simulations_run.load(Ordering::Relaxed)
    }

    pub fn laps_simulated(&self) -> u64 {
        self.laps_simulated.load(Ordering::Relaxed)
    }
}
