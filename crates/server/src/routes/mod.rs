//! Route handlers for the server.
//!
//! # Modules
//!
//! - [`health`]: Liveness endpoint
//! - [`api`]: Race simulation endpoint

pub mod api;
pub mod health;
