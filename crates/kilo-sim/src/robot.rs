//! Per-robot control context.
//!
//! A [`Robot`] owns everything one robot knows: its neighbour table, its
//! message queues, its hardware entropy source and where it is in the boundary
//! detection behaviour. The radio side calls [`Robot::receive`] and
//! [`Robot::transmit`] whenever it likes; the control loop calls
//! [`Robot::step`] once per cycle, and only then is the table touched.

use std::fmt;

use kilo_hull::{check_lcv, localize_all, Outcome};
use kilo_protocols::{drain_inbox, DrainStats, Frame, Inbox, Message, Outbox};
use kilo_topology::{NeighborId, NeighborTable, OldestFirst, Tick};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::platform::{Clock, HardwareDraws, HardwareRng};
use crate::{Result, RobotConfig};

/// Behaviour state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Announce ourselves and learn the one-hop neighbourhood until it stops
    /// changing.
    Gather,
    /// Keep localizing and run the hull test each cycle.
    Lcv,
}

/// Role assigned by the behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    None,
    /// On the convex boundary of the swarm.
    Border,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Gather => "gather",
            Phase::Lcv => "lcv",
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::None => "none",
            Role::Border => "border",
        })
    }
}

/// Running totals for one robot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotStats {
    pub cycles: u64,
    pub received: u64,
    pub rejected: u64,
    pub gossiped: u64,
    /// Gossip that did not fit in the outbox.
    pub gossip_dropped: u64,
    pub sent: u64,
    pub hull_checks: u64,
}

impl RobotStats {
    fn absorb(&mut self, drained: &DrainStats) {
        self.received += u64::from(drained.received);
        self.rejected += u64::from(drained.rejected);
        self.gossiped += u64::from(drained.gossiped);
        self.gossip_dropped += u64::from(drained.dropped);
    }
}

/// What changed during one [`Robot::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub tick: Tick,
    pub drained: DrainStats,
    pub outcome: Outcome,
    /// Set when the phase changed this cycle.
    pub entered: Option<Phase>,
    /// Set when the robot took the border role this cycle.
    pub became_border: bool,
}

/// One robot, drawing its randomness from the hardware source `H`.
#[derive(Debug, Clone)]
pub struct Robot<H = StdRng> {
    config: RobotConfig,
    table: NeighborTable,
    inbox: Inbox,
    outbox: Outbox,
    hardware: H,
    phase: Phase,
    role: Role,
    last_outcome: Outcome,
    stats: RobotStats,
}

impl<H: HardwareRng> Robot<H> {
    /// Boot a robot on top of its hardware entropy source.
    pub fn new(config: RobotConfig, hardware: H) -> Result<Self> {
        let table = NeighborTable::with_config(config.table, OldestFirst)?;
        Ok(Self {
            table,
            inbox: Inbox::new(),
            outbox: Outbox::new().with_repeat_last(config.repeat_last),
            hardware,
            phase: Phase::Gather,
            role: Role::None,
            last_outcome: Outcome::Empty,
            stats: RobotStats::default(),
            config,
        })
    }

    pub fn id(&self) -> NeighborId {
        self.config.id
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn table(&self) -> &NeighborTable {
        &self.table
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_border(&self) -> bool {
        self.role == Role::Border
    }

    /// Result of the most recent localization.
    pub fn last_outcome(&self) -> Outcome {
        self.last_outcome
    }

    pub fn stats(&self) -> &RobotStats {
        &self.stats
    }

    /// Frames lost because the inbox was full.
    pub fn inbox_dropped(&self) -> u32 {
        self.inbox.dropped()
    }

    /// Radio receive path. Returns `false` if the frame was dropped.
    pub fn receive(&mut self, frame: Frame, dist: f32) -> bool {
        match self.inbox.deliver(frame, dist) {
            Ok(()) => true,
            Err(e) => {
                trace!(robot = %self.config.id, error = %e, "reception dropped");
                false
            }
        }
    }

    /// Radio transmit path: the next frame to put on the air.
    pub fn transmit(&mut self) -> Option<Frame> {
        self.outbox.next_to_send().map(|m| Frame::seal(&m))
    }

    /// Radio confirmation that the last frame went out.
    pub fn transmit_success(&mut self) {
        self.stats.sent += 1;
    }

    /// Run one control cycle.
    pub fn step<C: Clock + ?Sized>(&mut self, clock: &C) -> Result<StepReport> {
        let now = clock.ticks();
        let me = self.config.id;
        self.stats.cycles += 1;

        let drained = drain_inbox(&mut self.table, me, &mut self.inbox, &mut self.outbox, now);
        self.stats.absorb(&drained);

        if self.outbox.is_empty() {
            self.outbox.push(Message::Id { sender: me })?;
        }

        let outcome = localize_all(&mut self.table)?;
        self.last_outcome = outcome;

        let mut report = StepReport {
            tick: now,
            drained,
            outcome,
            entered: None,
            became_border: false,
        };

        match self.phase {
            Phase::Gather => {
                let quiet = now.wrapping_sub(self.table.last_new_contact());
                if self.table.is_localized() && quiet > self.config.static_interval {
                    debug!(robot = %me, quiet, "neighbourhood settled");
                    self.phase = Phase::Lcv;
                    report.entered = Some(Phase::Lcv);
                }
            }
            Phase::Lcv => {
                if self.table.is_localized() {
                    self.stats.hull_checks += 1;
                    let mut draws = HardwareDraws(&mut self.hardware);
                    let on_hull = check_lcv(&self.table, &self.config.lcv, &mut draws)?;
                    if on_hull && self.role != Role::Border {
                        info!(robot = %me, components = self.table.component_count(), "border role assigned");
                        self.role = Role::Border;
                        report.became_border = true;
                    }
                }
            }
        }

        Ok(report)
    }
}

impl<H> fmt::Display for Robot<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "robot {} phase={} role={} {}",
            self.config.id, self.phase, self.role, self.table
        )
    }
}
