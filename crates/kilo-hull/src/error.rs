//! Error types for kilo-hull.

use thiserror::Error;

/// Result type for kilo-hull operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during reconstruction or the hull decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The table was not in a state the operation is defined for.
    #[error("invalid input: {0}")]
    Input(&'static str),

    /// The neighbourhood model rejected an update.
    #[error("topology error: {0}")]
    Topology(#[from] kilo_topology::Error),
}
