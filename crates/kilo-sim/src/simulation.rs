//! Swarm simulation.
//!
//! Robots sit still in a plane. Every cycle each robot runs its control
//! step, then offers one frame to the radio; the frame reaches every other
//! robot within range unless the channel drops it, arriving with a noisy
//! range estimate. Everything random comes from the configured seed, so a
//! run is reproducible.

use std::f32::consts::TAU;

use kilo_hull::Outcome;
use kilo_topology::{NeighborId, Point, Tick};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::events::{RobotSnapshot, SwarmEvent, SwarmSnapshot, Traffic};
use crate::platform::{Clock, DistanceEstimator, NoisyRange, SimClock};
use crate::robot::{Phase, Robot};
use crate::{Layout, Result, SimulationConfig};

/// Arena coordinates for a layout.
pub fn place<R: Rng + ?Sized>(layout: &Layout, rng: &mut R) -> Vec<Point> {
    match layout {
        Layout::Grid { rows, cols, spacing } => (0..*rows)
            .flat_map(|r| (0..*cols).map(move |c| Point::new(c as f32 * spacing, r as f32 * spacing)))
            .collect(),
        Layout::Ring { count, radius, center } => {
            let step = TAU / (*count).max(1) as f32;
            let mut points: Vec<Point> = (0..*count)
                .map(|k| Point::polar(*radius, k as f32 * step))
                .collect();
            if *center {
                points.push(Point::ORIGIN);
            }
            points
        }
        Layout::Disc { count, radius } => (0..*count)
            .map(|_| {
                // sqrt keeps the density uniform over the area
                let r = radius * rng.gen::<f32>().sqrt();
                Point::polar(r, rng.gen_range(0.0..TAU))
            })
            .collect(),
        Layout::Explicit { positions } => positions.clone(),
    }
}

/// A running swarm.
pub struct Simulation {
    config: SimulationConfig,
    robots: Vec<Robot>,
    positions: Vec<Point>,
    clock: SimClock,
    /// Channel loss draws.
    rng: StdRng,
    estimator: NoisyRange<StdRng>,
    cycle: u32,
    events: Vec<SwarmEvent>,
    traffic: Traffic,
}

impl Simulation {
    /// Lay out and boot every robot.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let positions = place(&config.layout, &mut rng);

        let mut robots = Vec::with_capacity(positions.len());
        for i in 0..positions.len() {
            // each robot gets its own entropy stream from the shared seed
            let id = NeighborId(i as u16);
            let hardware = StdRng::seed_from_u64(rng.gen());
            robots.push(Robot::new(config.robot(id), hardware)?);
        }

        let estimator = NoisyRange::new(config.distance_noise, StdRng::seed_from_u64(rng.gen()));
        info!(robots = robots.len(), seed = config.seed, "swarm created");

        Ok(Self {
            config,
            robots,
            positions,
            clock: SimClock::new(),
            rng,
            estimator,
            cycle: 0,
            events: Vec::new(),
            traffic: Traffic::default(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    /// Cycles completed so far.
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn tick(&self) -> Tick {
        self.clock.ticks()
    }

    pub fn events(&self) -> &[SwarmEvent] {
        &self.events
    }

    pub fn traffic(&self) -> Traffic {
        self.traffic
    }

    /// Indices of the robots within radio range of robot `i`.
    pub fn in_range(&self, i: usize) -> Vec<usize> {
        let Some(here) = self.positions.get(i) else {
            return Vec::new();
        };
        self.positions
            .iter()
            .enumerate()
            .filter(|&(j, p)| j != i && here.dist(p) <= self.config.comm_range)
            .map(|(j, _)| j)
            .collect()
    }

    /// Advance every robot by one control cycle, then let each transmit once.
    pub fn step(&mut self) {
        self.clock.advance(self.config.ticks_per_cycle);
        let cycle = self.cycle;

        for robot in &mut self.robots {
            let id = robot.id();
            let was_localized = robot.table().is_localized();
            let report = match robot.step(&self.clock) {
                Ok(report) => report,
                Err(e) => {
                    warn!(robot = %id, error = %e, "control cycle failed");
                    self.events.push(SwarmEvent::StepFailed {
                        robot: id,
                        error: e.to_string(),
                        cycle,
                    });
                    continue;
                }
            };

            let components = match report.outcome {
                Outcome::Localized { components, .. } => components,
                _ => robot.table().component_count(),
            };
            let localized = robot.table().is_localized();
            if localized != was_localized {
                self.events.push(SwarmEvent::LocalizationChanged {
                    robot: id,
                    localized,
                    components,
                    cycle,
                });
            }
            if let Some(phase) = report.entered {
                self.events.push(SwarmEvent::PhaseChanged { robot: id, phase, cycle });
            }
            if report.became_border {
                self.events.push(SwarmEvent::BorderAssigned { robot: id, components, cycle });
            }
        }

        for i in 0..self.robots.len() {
            let Some(frame) = self.robots[i].transmit() else {
                continue;
            };
            self.robots[i].transmit_success();
            self.traffic.sent += 1;

            for j in self.in_range(i) {
                if self.rng.gen::<f32>() < self.config.loss_rate {
                    self.traffic.lost += 1;
                    continue;
                }
                let true_dist = self.positions[i].dist(&self.positions[j]);
                let dist = self.estimator.estimate(&true_dist);
                if self.robots[j].receive(frame, dist) {
                    self.traffic.delivered += 1;
                } else {
                    self.traffic.overflowed += 1;
                }
            }
        }

        self.cycle += 1;
        debug!(cycle = self.cycle, tick = self.clock.ticks(), "cycle complete");
    }

    /// Run the configured number of cycles and return the final state.
    pub fn run(&mut self) -> SwarmSnapshot {
        for _ in 0..self.config.cycles {
            self.step();
        }
        let snapshot = self.snapshot();
        info!(
            cycles = snapshot.cycle,
            localized = snapshot.localized_count,
            border = snapshot.border_count,
            "run complete"
        );
        snapshot
    }

    pub fn snapshot(&self) -> SwarmSnapshot {
        let robots: Vec<RobotSnapshot> = self
            .robots
            .iter()
            .zip(&self.positions)
            .map(|(robot, &position)| {
                let table = robot.table();
                let components = table.component_count().min(table.components().len());
                RobotSnapshot {
                    id: robot.id(),
                    position,
                    neighbors: table.len(),
                    components: table.component_count(),
                    coverage: table.components()[..components]
                        .iter()
                        .map(|c| c.coverage)
                        .collect(),
                    localized: table.is_localized(),
                    placed: table.records().iter().filter(|r| r.is_localized()).count(),
                    phase: robot.phase(),
                    role: robot.role(),
                }
            })
            .collect();

        SwarmSnapshot {
            cycle: self.cycle,
            tick: self.clock.ticks(),
            localized_count: robots.iter().filter(|r| r.localized).count(),
            border_count: robots.iter().filter(|r| r.role == crate::Role::Border).count(),
            robots,
            traffic: self.traffic,
        }
    }

    /// Robots that have reached the hull test.
    pub fn in_phase(&self, phase: Phase) -> usize {
        self.robots.iter().filter(|r| r.phase() == phase).count()
    }
}
