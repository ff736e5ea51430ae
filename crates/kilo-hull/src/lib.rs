//! Kilo Hull - Local Coordinates and Convex View
//!
//! Turns a robot's [`NeighborTable`](kilo_topology::NeighborTable) into a
//! picture of where its neighbours are, and from that picture decides
//! whether the robot sits on the edge of the swarm.
//!
//! # Overview
//!
//! ## Localisation
//!
//! [`localize_all`] segments the table, anchors one member of each component
//! on the x-axis of its own frame and propagates positions outward by
//! triangulation (one placed reference) or trilateration (two). Work is
//! bounded by `count - 1` rounds and stops early once every neighbour is
//! placed. Geometry that goes non-finite leaves a neighbour unplaced for the
//! cycle instead of poisoning the frame.
//!
//! ## Local Convex View
//!
//! [`check_lcv`] consumes the segmented, localized table and one random draw
//! and answers "am I on the convex boundary?".
//!
//! # Example
//!
//! ```rust
//! use kilo_hull::{check_lcv, localize_all, LcvParams, Outcome};
//! use kilo_topology::{NeighborId, NeighborTable};
//! use rand::SeedableRng;
//!
//! let mut table = NeighborTable::new();
//! let a = table.update_or_insert(NeighborId(1), 0)?;
//! let b = table.update_or_insert(NeighborId(2), 0)?;
//! table.set_self_distance(a, 50.0)?;
//! table.set_self_distance(b, 70.0)?;
//! table.set_distance(a, b, 60.0)?;
//! table.set_adjacent(a, b)?;
//!
//! assert!(matches!(localize_all(&mut table)?, Outcome::Localized { unplaced: 0, .. }));
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! assert!(check_lcv(&table, &LcvParams::default(), &mut rng)?);
//! # Ok::<(), kilo_hull::Error>(())
//! ```

mod error;
pub mod lcv;
pub mod localize;

pub use error::{Error, Result};
pub use lcv::{boundary_probability, check_lcv, decide, LcvParams, DEFAULT_HULL_TOLERANCE};
pub use localize::{localize_all, localize_one, triangulate, trilaterate, Outcome, Placement};
