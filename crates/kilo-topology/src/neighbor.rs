//! Per-neighbour records.

use std::fmt;

use crate::{Point, Tick};

/// Transport-level robot identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborId(pub u16);

impl NeighborId {
    /// Marks an unused slot. Never a valid sender.
    pub const INVALID: Self = Self(0xffff);

    /// Whether this id may name a real robot.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != Self::INVALID.0
    }
}

impl Default for NeighborId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NeighborId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#invalid")
        }
    }
}

impl From<u16> for NeighborId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

/// Per-record flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborFlags(u8);

impl NeighborFlags {
    /// The record's position is current for this cycle.
    pub const LOCALIZED: Self = Self(0x1);

    pub const fn empty() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Everything the table knows about one neighbour.
///
/// `component` is an index into the owning table's component array, valid
/// only until the next segmentation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborRecord {
    pub id: NeighborId,
    pub index: usize,
    pub last_time: Tick,
    pub flags: NeighborFlags,
    pub hop_count: u8,
    pub position: Point,
    pub last_position: Point,
    pub component: Option<usize>,
}

impl NeighborRecord {
    /// Fresh record for `id` first heard at `now`, stored in slot `index`.
    pub fn new(id: NeighborId, index: usize, now: Tick) -> Self {
        Self {
            id,
            index,
            last_time: now,
            flags: NeighborFlags::empty(),
            hop_count: 1,
            position: Point::ORIGIN,
            last_position: Point::ORIGIN,
            component: None,
        }
    }

    /// An unused slot.
    pub const fn vacant(index: usize) -> Self {
        Self {
            id: NeighborId::INVALID,
            index,
            last_time: 0,
            flags: NeighborFlags::empty(),
            hop_count: 0,
            position: Point::ORIGIN,
            last_position: Point::ORIGIN,
            component: None,
        }
    }

    #[inline]
    pub fn is_localized(&self) -> bool {
        self.flags.contains(NeighborFlags::LOCALIZED)
    }

    pub fn set_localized(&mut self) {
        self.flags.insert(NeighborFlags::LOCALIZED);
    }

    pub fn clear_localized(&mut self) {
        self.flags.remove(NeighborFlags::LOCALIZED);
    }

    /// Move to a new position, remembering the previous one.
    pub fn relocate(&mut self, to: Point) {
        self.last_position = self.position;
        self.position = to;
    }
}

impl fmt::Display for NeighborRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nbr {} [{}] t={} flags=0x{:x} hops={} at {} (was {})",
            self.id,
            self.index,
            self.last_time,
            self.flags.bits(),
            self.hop_count,
            self.position,
            self.last_position,
        )?;
        match self.component {
            Some(c) => write!(f, " comp {}", c),
            None => f.write_str(" comp -"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_sentinel() {
        assert!(!NeighborId::INVALID.is_valid());
        assert!(NeighborId(7).is_valid());
        assert_eq!(NeighborId::default(), NeighborId::INVALID);
        assert_eq!(NeighborId(7).to_string(), "#7");
    }

    #[test]
    fn flags_insert_remove() {
        let mut r = NeighborRecord::new(NeighborId(3), 0, 10);
        assert!(!r.is_localized());
        r.set_localized();
        assert!(r.is_localized());
        r.clear_localized();
        assert!(!r.is_localized());
    }

    #[test]
    fn relocate_keeps_previous() {
        let mut r = NeighborRecord::new(NeighborId(3), 0, 10);
        r.relocate(Point::new(1.0, 2.0));
        r.relocate(Point::new(3.0, 4.0));
        assert_eq!(r.last_position, Point::new(1.0, 2.0));
        assert_eq!(r.position, Point::new(3.0, 4.0));
    }

    #[test]
    fn display_mentions_component() {
        let mut r = NeighborRecord::new(NeighborId(9), 2, 5);
        assert!(r.to_string().ends_with("comp -"));
        r.component = Some(1);
        assert!(r.to_string().contains("nbr #9 [2]"));
        assert!(r.to_string().ends_with("comp 1"));
    }
}
