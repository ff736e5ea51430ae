//! Kilo Neighbourhood Topology
//!
//! Fixed-capacity model of a robot's one-hop neighbourhood: who is in range,
//! which neighbours can hear each other, and how far apart everyone is.
//!
//! # Storage
//!
//! Nothing here allocates. Adjacency lives in a packed [`BitMatrix`], pairwise
//! distance estimates in a packed upper-triangular [`DistMatrix`], and the
//! records themselves in an inline array of [`MAX_NEIGHBORS`] slots owned by
//! the [`NeighborTable`].
//!
//! # Components
//!
//! Each control cycle the table is [segmented](NeighborTable::segment) into
//! connected [`Component`]s by iterating powers of the adjacency matrix. At
//! most [`MAX_COMPONENTS`] are tracked; a neighbourhood that splits further is
//! reported as not localizable for the cycle.
//!
//! Components and records refer to each other by index only, so eviction can
//! never leave a dangling reference behind.

mod bitmat;
mod component;
mod distmat;
mod error;
mod geometry;
mod neighbor;
mod segment;
mod table;

pub use bitmat::{bytes_for, BitMatrix};
pub use component::Component;
pub use distmat::{entries_for, DistMatrix, INVALID_DISTANCE};
pub use error::{Error, Result};
pub use geometry::{
    angle_diff, angle_subtended, center_angle, neg_norm_angle, norm_angle, Point,
};
pub use neighbor::{NeighborFlags, NeighborId, NeighborRecord};
pub use table::{EvictionPolicy, NeighborTable, OldestFirst, TableConfig};

/// Monotonic control-loop tick.
pub type Tick = u32;

/// Capacity of a neighbour table.
pub const MAX_NEIGHBORS: usize = 16;

/// Maximum number of components tracked per segmentation pass. Reaching this
/// value means "too fragmented to reason about", not a literal count.
pub const MAX_COMPONENTS: usize = 5;

/// Bytes backing a `MAX_NEIGHBORS × MAX_NEIGHBORS` adjacency matrix.
pub const ADJ_BYTES: usize = MAX_NEIGHBORS * MAX_NEIGHBORS / 8;

/// Floats backing a `MAX_NEIGHBORS × MAX_NEIGHBORS` packed distance matrix.
pub const DIST_ENTRIES: usize = MAX_NEIGHBORS * (MAX_NEIGHBORS + 1) / 2;

/// Default communication range, in distance-estimate units (millimetres on
/// the reference hardware).
pub const DEFAULT_COMM_RANGE: f32 = 100.0;

// Byte-wise matrix multiplication needs whole-byte rows.
const _: () = assert!(MAX_NEIGHBORS % 8 == 0);
const _: () = assert!(ADJ_BYTES == bytes_for(MAX_NEIGHBORS));
const _: () = assert!(DIST_ENTRIES == entries_for(MAX_NEIGHBORS));
