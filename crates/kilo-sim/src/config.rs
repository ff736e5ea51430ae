//! Robot and simulation configuration.

use kilo_hull::LcvParams;
use kilo_topology::{NeighborId, Point, TableConfig, Tick, DEFAULT_COMM_RANGE};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Ticks the neighbourhood must stay unchanged before the hull decision.
pub const DEFAULT_STATIC_INTERVAL: Tick = 128;

/// Per-robot settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    pub id: NeighborId,
    pub table: TableConfig,
    pub static_interval: Tick,
    pub lcv: LcvParams,
    /// Re-send the last frame while nothing else is queued.
    pub repeat_last: bool,
}

impl RobotConfig {
    pub fn new(id: NeighborId) -> Self {
        Self {
            id,
            table: TableConfig::default(),
            static_interval: DEFAULT_STATIC_INTERVAL,
            lcv: LcvParams::default(),
            repeat_last: false,
        }
    }

    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }

    pub fn with_static_interval(mut self, static_interval: Tick) -> Self {
        self.static_interval = static_interval;
        self
    }

    pub fn with_lcv(mut self, lcv: LcvParams) -> Self {
        self.lcv = lcv;
        self
    }

    pub fn with_repeat_last(mut self, repeat_last: bool) -> Self {
        self.repeat_last = repeat_last;
        self
    }
}

/// Where robots are placed at the start of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// Square lattice with `spacing` between rows and columns.
    Grid { rows: usize, cols: usize, spacing: f32 },
    /// Evenly spaced on a circle, plus one robot at its centre when
    /// `center` is set.
    Ring { count: usize, radius: f32, center: bool },
    /// Uniformly random in a disc, from the simulation seed.
    Disc { count: usize, radius: f32 },
    /// Fixed coordinates.
    Explicit { positions: Vec<Point> },
}

impl Layout {
    pub fn robot_count(&self) -> usize {
        match self {
            Layout::Grid { rows, cols, .. } => rows * cols,
            Layout::Ring { count, center, .. } => count + usize::from(*center),
            Layout::Disc { count, .. } => *count,
            Layout::Explicit { positions } => positions.len(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Grid {
            rows: 6,
            cols: 6,
            spacing: 45.0,
        }
    }
}

/// Configuration for a swarm run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for layout, radio loss, range noise and robot RNG seeding.
    pub seed: u64,
    pub layout: Layout,
    /// Robots further apart than this never hear each other.
    pub comm_range: f32,
    /// Range estimate error as a fraction of the true distance.
    pub distance_noise: f32,
    /// Probability that any single reception is lost.
    pub loss_rate: f32,
    /// Control cycles to run.
    pub cycles: u32,
    /// Clock ticks elapsed per control cycle.
    pub ticks_per_cycle: Tick,
    pub static_interval: Tick,
    pub hull_tolerance: f32,
    pub repeat_last: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            layout: Layout::default(),
            comm_range: DEFAULT_COMM_RANGE,
            distance_noise: 0.0,
            loss_rate: 0.0,
            cycles: 200,
            ticks_per_cycle: 16,
            static_interval: DEFAULT_STATIC_INTERVAL,
            hull_tolerance: LcvParams::default().hull_tolerance,
            repeat_last: false,
        }
    }
}

impl SimulationConfig {
    pub fn robot_count(&self) -> usize {
        self.layout.robot_count()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_cycles(mut self, cycles: u32) -> Self {
        self.cycles = cycles;
        self
    }

    pub fn with_loss_rate(mut self, loss_rate: f32) -> Self {
        self.loss_rate = loss_rate;
        self
    }

    pub fn with_distance_noise(mut self, distance_noise: f32) -> Self {
        self.distance_noise = distance_noise;
        self
    }

    /// Settings for the robot with the given id.
    pub fn robot(&self, id: NeighborId) -> RobotConfig {
        RobotConfig::new(id)
            .with_table(TableConfig::default().with_comm_range(self.comm_range))
            .with_static_interval(self.static_interval)
            .with_lcv(LcvParams::default().with_hull_tolerance(self.hull_tolerance))
            .with_repeat_last(self.repeat_last)
    }

    pub fn validate(&self) -> Result<()> {
        let count = self.robot_count();
        if count == 0 {
            return Err(Error::Config("layout places no robots".into()));
        }
        if count >= usize::from(NeighborId::INVALID.0) {
            return Err(Error::Config(format!("{} robots exceed the id space", count)));
        }
        if !(self.comm_range.is_finite() && self.comm_range > 0.0) {
            return Err(Error::Config("comm_range must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.loss_rate) {
            return Err(Error::Config("loss_rate must be in [0, 1)".into()));
        }
        if !(0.0..1.0).contains(&self.distance_noise) {
            return Err(Error::Config("distance_noise must be in [0, 1)".into()));
        }
        if self.ticks_per_cycle == 0 {
            return Err(Error::Config("ticks_per_cycle must be non-zero".into()));
        }
        Ok(())
    }
}
