//! Error types for kilo-protocols.

use thiserror::Error;

/// Result type for kilo-protocols operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while framing or handling messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The type tag does not name a known message.
    #[error("unknown message type {0:#04x}")]
    UnknownType(u8),

    /// The buffer is shorter than the fixed message layout.
    #[error("truncated message: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// The frame checksum does not match its contents.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Checksum { expected: u32, actual: u32 },

    /// A bounded queue has no room left.
    #[error("queue full")]
    QueueFull,

    /// The neighbourhood model rejected an update.
    #[error("topology error: {0}")]
    Topology(#[from] kilo_topology::Error),
}
