//! Error type for the fallible parts of the crate
//!
//! The geometric core recovers from numerical trouble locally; only settings
//! loading and snapshots surface errors to callers.

use thiserror::Error;

/// Errors produced by the collision core and configuration loading
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// GJK or EPA hit its iteration cap without converging
    #[error("{algorithm} did not converge within {iterations} iterations")]
    NoConvergence {
        algorithm: &'static str,
        iterations: usize,
    },

    /// Settings or snapshot JSON could not be parsed or produced
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
