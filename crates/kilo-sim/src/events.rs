//! Swarm events and snapshots.

use kilo_topology::{NeighborId, Point, Tick};
use serde::{Deserialize, Serialize};

use crate::robot::{Phase, Role};

/// Things worth recording while a swarm runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SwarmEvent {
    /// A robot's table went from unlocalized to localized or back.
    LocalizationChanged {
        robot: NeighborId,
        localized: bool,
        components: usize,
        cycle: u32,
    },

    /// A robot moved to a new behaviour phase.
    PhaseChanged {
        robot: NeighborId,
        phase: Phase,
        cycle: u32,
    },

    /// A robot decided it is on the convex boundary.
    BorderAssigned {
        robot: NeighborId,
        components: usize,
        cycle: u32,
    },

    /// A robot's control cycle failed.
    StepFailed {
        robot: NeighborId,
        error: String,
        cycle: u32,
    },
}

impl SwarmEvent {
    pub fn cycle(&self) -> u32 {
        match self {
            SwarmEvent::LocalizationChanged { cycle, .. } => *cycle,
            SwarmEvent::PhaseChanged { cycle, .. } => *cycle,
            SwarmEvent::BorderAssigned { cycle, .. } => *cycle,
            SwarmEvent::StepFailed { cycle, .. } => *cycle,
        }
    }

    pub fn robot(&self) -> NeighborId {
        match self {
            SwarmEvent::LocalizationChanged { robot, .. } => *robot,
            SwarmEvent::PhaseChanged { robot, .. } => *robot,
            SwarmEvent::BorderAssigned { robot, .. } => *robot,
            SwarmEvent::StepFailed { robot, .. } => *robot,
        }
    }
}

/// Radio totals for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traffic {
    /// Frames put on the air.
    pub sent: u64,
    /// Receptions that reached an inbox.
    pub delivered: u64,
    /// Receptions lost to the channel.
    pub lost: u64,
    /// Receptions refused by a full inbox.
    pub overflowed: u64,
}

/// What one robot looks like from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    pub id: NeighborId,
    /// True position in the arena (robots never see this).
    pub position: Point,
    pub neighbors: usize,
    pub components: usize,
    /// Angular coverage of each component, radians.
    pub coverage: Vec<f32>,
    pub localized: bool,
    /// Neighbours with a position this cycle.
    pub placed: usize,
    pub phase: Phase,
    pub role: Role,
}

/// The whole swarm at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmSnapshot {
    pub cycle: u32,
    pub tick: Tick,
    pub robots: Vec<RobotSnapshot>,
    pub localized_count: usize,
    pub border_count: usize,
    pub traffic: Traffic,
}

impl SwarmSnapshot {
    /// Ids of the robots holding the border role.
    pub fn border_ids(&self) -> Vec<NeighborId> {
        self.robots
            .iter()
            .filter(|r| r.role == Role::Border)
            .map(|r| r.id)
            .collect()
    }

    pub fn robot(&self, id: NeighborId) -> Option<&RobotSnapshot> {
        self.robots.iter().find(|r| r.id == id)
    }
}

/// Border robots as of each cycle in which the count changed, replayed from
/// an event log.
pub fn border_timeline(events: &[SwarmEvent]) -> Vec<(u32, usize)> {
    let mut timeline: Vec<(u32, usize)> = Vec::new();
    let mut count = 0;
    for event in events {
        if let SwarmEvent::BorderAssigned { cycle, .. } = event {
            count += 1;
            match timeline.last_mut() {
                Some((c, n)) if *c == *cycle => *n = count,
                _ => timeline.push((*cycle, count)),
            }
        }
    }
    timeline
}
