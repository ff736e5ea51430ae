//! Error types for kilo-sim.

use thiserror::Error;

/// Result type for robot and simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving robots or loading a simulation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("topology error: {0}")]
    Topology(#[from] kilo_topology::Error),

    #[error("hull error: {0}")]
    Hull(#[from] kilo_hull::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] kilo_protocols::Error),

    /// A configuration value was out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
