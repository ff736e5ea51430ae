//! Error types for kilo-topology.

use thiserror::Error;

/// Result type for neighbourhood model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the neighbourhood model.
///
/// None of these are fatal to a control cycle. Callers log them and carry on
/// with whatever state the table was left in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument was out of its valid domain (invalid id, bad dimension).
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A neighbour index was not below the current neighbour count.
    #[error("index {index} out of bounds (count {count})")]
    OutOfBounds { index: usize, count: usize },

    /// The table is at capacity and the operation does not evict.
    #[error("neighbour table full (capacity {capacity})")]
    Full { capacity: usize },

    /// The eviction policy could not pick a victim.
    #[error("eviction policy could not select a victim")]
    EvictionFailure,

    /// A caller-provided backing buffer is too small for the requested shape.
    #[error("backing storage too small: need {needed}, have {available}")]
    OutOfMemory { needed: usize, available: usize },
}
