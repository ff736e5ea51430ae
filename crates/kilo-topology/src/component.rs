//! Angular span of one connected group of neighbours.
//!
//! A component covers the window `[start_angle, start_angle + coverage]`
//! (mod 2π) as seen from the local robot. The window is delimited by two
//! members: the clockwise-most (`cw_most`) and counter-clockwise-most
//! (`ccw_most`). When the span passes π and those two members can hear each
//! other, the ring around the robot is closed and coverage is pinned to 2π.

use std::f32::consts::{PI, TAU};
use std::fmt;

use crate::{center_angle, norm_angle, BitMatrix, NeighborRecord, Point};

/// One connected component of the neighbourhood graph.
///
/// Member references are indices into the owning table's records.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub start_angle: f32,
    pub coverage: f32,
    pub ccw_most: Option<usize>,
    pub cw_most: Option<usize>,
    /// Lowest-index member; anchors the component's local frame.
    pub founder: Option<usize>,
}

impl Component {
    /// An empty component.
    pub const fn new() -> Self {
        Self {
            start_angle: 0.0,
            coverage: 0.0,
            ccw_most: None,
            cw_most: None,
            founder: None,
        }
    }

    /// No member has been added since the last reset.
    pub fn is_empty(&self) -> bool {
        self.ccw_most.is_none() && self.cw_most.is_none()
    }

    /// The ring around the robot is closed.
    pub fn is_full(&self) -> bool {
        self.coverage >= TAU
    }

    /// Forget all members.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Restart the component from a single member.
    pub fn seed(&mut self, member: usize, position: Point) {
        self.start_angle = position.angle();
        self.coverage = 0.0;
        self.ccw_most = Some(member);
        self.cw_most = Some(member);
        self.founder = Some(member);
    }

    /// Fold `records[member]`'s current position into the span.
    ///
    /// A member outside the window widens it on whichever side needs the
    /// smaller rotation; on a tie the clockwise edge moves.
    pub fn update<B>(&mut self, member: usize, records: &[NeighborRecord], adj: &BitMatrix<B>)
    where
        B: AsRef<[u8]>,
    {
        let Some(rec) = records.get(member) else {
            return;
        };
        if self.is_empty() {
            self.seed(member, rec.position);
        } else {
            let offset = norm_angle(rec.position.angle() - self.start_angle);
            if offset > self.coverage {
                let ccw_growth = offset - self.coverage;
                let cw_growth = TAU - offset;
                if ccw_growth < cw_growth {
                    self.ccw_most = Some(member);
                } else {
                    self.cw_most = Some(member);
                }
            }
        }
        self.check_full(records, adj);
    }

    /// Recompute start and coverage from the current extremes, closing the
    /// ring when the extremes are adjacent and the span exceeds π.
    pub fn check_full<B>(&mut self, records: &[NeighborRecord], adj: &BitMatrix<B>)
    where
        B: AsRef<[u8]>,
    {
        let (Some(ccw), Some(cw)) = (self.ccw_most, self.cw_most) else {
            return;
        };
        let (Some(ccw_rec), Some(cw_rec)) = (records.get(ccw), records.get(cw)) else {
            return;
        };
        let amax = ccw_rec.position.angle();
        let amin = cw_rec.position.angle();

        self.start_angle = center_angle(amin);
        self.coverage = norm_angle(amax - amin);

        if self.coverage > PI && ccw != cw && adj.test(ccw, cw) {
            self.coverage = TAU;
        }
    }

    /// Whether the bearing of `point` falls inside the covered window.
    pub fn contains(&self, point: Point) -> bool {
        if self.is_full() {
            return true;
        }
        norm_angle(point.angle() - self.start_angle) <= self.coverage
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "component start={:.4} coverage={:.4}",
            self.start_angle, self.coverage
        )?;
        if let (Some(cw), Some(ccw)) = (self.cw_most, self.ccw_most) {
            write!(f, " cw=[{}] ccw=[{}]", cw, ccw)?;
        }
        Ok(())
    }
}
