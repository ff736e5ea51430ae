//! Kilo Sim - Robot Context and Swarm Harness
//!
//! Ties the neighbourhood model, the wire protocol and the hull test into a
//! single robot, and runs many of them together.
//!
//! # Architecture
//!
//! - **Robot**: one robot's state, driven once per control cycle
//! - **Platform**: clock, entropy and range-estimation seams
//! - **Simulation**: robots in a plane sharing a lossy broadcast channel
//! - **Events**: a timeline of localization, phase and role changes
//!
//! # Usage
//!
//! ```rust
//! use kilo_sim::{Simulation, SimulationConfig};
//!
//! let mut sim = Simulation::new(SimulationConfig::default().with_cycles(20))?;
//! let snapshot = sim.run();
//! assert_eq!(snapshot.robots.len(), 36);
//! # Ok::<(), kilo_sim::Error>(())
//! ```

mod config;
mod error;
mod events;
pub mod platform;
mod robot;
mod simulation;

pub use config::{Layout, RobotConfig, SimulationConfig, DEFAULT_STATIC_INTERVAL};
pub use error::{Error, Result};
pub use events::{border_timeline, RobotSnapshot, SwarmEvent, SwarmSnapshot, Traffic};
pub use platform::{Clock, DistanceEstimator, HardwareDraws, HardwareRng, NoisyRange, SimClock};
pub use robot::{Phase, Robot, RobotStats, Role, StepReport};
pub use simulation::{place, Simulation};
