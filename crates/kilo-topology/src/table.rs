//! The bounded neighbour table.
//!
//! Owns every record, the adjacency and distance matrices, and the
//! components derived from them. Records occupy slots `0..len()`; a slot is
//! only ever reused through eviction.

use std::fmt;

use tracing::{debug, trace};

use crate::{
    BitMatrix, Component, DistMatrix, Error, NeighborFlags, NeighborId, NeighborRecord, Point,
    Result, Tick, DEFAULT_COMM_RANGE, MAX_COMPONENTS, MAX_NEIGHBORS,
};

/// Static shape of a neighbour table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableConfig {
    /// Number of usable slots, at most [`MAX_NEIGHBORS`].
    pub max_nbrs: usize,
    /// Radio range, used to disambiguate triangulation.
    pub comm_range: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_nbrs: MAX_NEIGHBORS,
            comm_range: DEFAULT_COMM_RANGE,
        }
    }
}

impl TableConfig {
    pub fn with_max_nbrs(mut self, max_nbrs: usize) -> Self {
        self.max_nbrs = max_nbrs;
        self
    }

    pub fn with_comm_range(mut self, comm_range: f32) -> Self {
        self.comm_range = comm_range;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_nbrs == 0 || self.max_nbrs > MAX_NEIGHBORS {
            return Err(Error::InvalidInput("max_nbrs must be in 1..=MAX_NEIGHBORS"));
        }
        if !(self.comm_range.is_finite() && self.comm_range > 0.0) {
            return Err(Error::InvalidInput("comm_range must be positive"));
        }
        Ok(())
    }
}

/// Strategy for choosing which record to drop when the table is full.
pub trait EvictionPolicy {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Pick the slot to reclaim from a full table, or `None` if no record
    /// qualifies.
    fn select_victim(&self, records: &[NeighborRecord]) -> Option<usize>;
}

/// Evict the record with the oldest last contact. Ties go to the lowest
/// index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OldestFirst;

impl EvictionPolicy for OldestFirst {
    fn name(&self) -> &'static str {
        "oldest-first"
    }

    fn select_victim(&self, records: &[NeighborRecord]) -> Option<usize> {
        records
            .iter()
            .enumerate()
            .min_by_key(|(_, r)| r.last_time)
            .map(|(i, _)| i)
    }
}

/// Everything a robot knows about its one-hop neighbourhood.
#[derive(Debug, Clone)]
pub struct NeighborTable<P = OldestFirst> {
    pub(crate) config: TableConfig,
    policy: P,
    pub(crate) count: usize,
    pub(crate) records: [NeighborRecord; MAX_NEIGHBORS],
    pub(crate) dist: DistMatrix,
    pub(crate) adj: BitMatrix,
    pub(crate) components: [Component; MAX_COMPONENTS],
    pub(crate) component_count: usize,
    localized: bool,
    last_new_contact: Tick,
}

impl NeighborTable {
    /// Full-size table with the oldest-first policy.
    pub fn new() -> Self {
        Self::from_parts(TableConfig::default(), OldestFirst, DistMatrix::default(), BitMatrix::default())
    }
}

impl Default for NeighborTable {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: EvictionPolicy> NeighborTable<P> {
    /// Build a table with an explicit shape and eviction policy.
    pub fn with_config(config: TableConfig, policy: P) -> Result<Self> {
        config.validate()?;
        // adjacency rows must be whole bytes for multiplication
        let adj_dim = config.max_nbrs.next_multiple_of(8);
        let adj = BitMatrix::with_storage(adj_dim, true, [0u8; crate::ADJ_BYTES])?;
        let dist = DistMatrix::with_storage(
            config.max_nbrs,
            [crate::INVALID_DISTANCE; crate::DIST_ENTRIES],
        )?;
        Ok(Self::from_parts(config, policy, dist, adj))
    }

    fn from_parts(config: TableConfig, policy: P, dist: DistMatrix, adj: BitMatrix) -> Self {
        Self {
            config,
            policy,
            count: 0,
            records: std::array::from_fn(NeighborRecord::vacant),
            dist,
            adj,
            components: [Component::new(); MAX_COMPONENTS],
            component_count: 0,
            localized: false,
            last_new_contact: 0,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Number of usable slots.
    pub fn capacity(&self) -> usize {
        self.config.max_nbrs
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.config.max_nbrs
    }

    /// Occupied records, in slot order.
    pub fn records(&self) -> &[NeighborRecord] {
        &self.records[..self.count]
    }

    /// Tick at which the neighbourhood last changed: a previously-unknown
    /// neighbour was added or a new edge between neighbours learned.
    pub fn last_new_contact(&self) -> Tick {
        self.last_new_contact
    }

    /// Record that the neighbourhood changed at `now`.
    pub fn mark_new_contact(&mut self, now: Tick) {
        self.last_new_contact = now;
    }

    /// Whether slot `index` is occupied.
    pub fn exists(&self, index: usize) -> bool {
        index < self.count
    }

    pub fn get(&self, index: usize) -> Option<&NeighborRecord> {
        self.records().get(index)
    }

    pub fn get_by_id(&self, id: NeighborId) -> Option<&NeighborRecord> {
        self.index_of(id).map(|i| &self.records[i])
    }

    /// Slot holding `id`, if known.
    pub fn index_of(&self, id: NeighborId) -> Option<usize> {
        if !id.is_valid() {
            return None;
        }
        self.records().iter().position(|r| r.id == id)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.count {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                index,
                count: self.count,
            })
        }
    }

    /// Refresh `id`'s last contact, inserting it if unseen.
    ///
    /// Never evicts: a full table rejects new ids with [`Error::Full`].
    pub fn update_or_insert(&mut self, id: NeighborId, now: Tick) -> Result<usize> {
        if !id.is_valid() {
            return Err(Error::InvalidInput("cannot insert the invalid id"));
        }
        if let Some(i) = self.index_of(id) {
            self.records[i].last_time = now;
            return Ok(i);
        }
        if self.is_full() {
            return Err(Error::Full {
                capacity: self.capacity(),
            });
        }
        let i = self.count;
        self.records[i] = NeighborRecord::new(id, i, now);
        self.count += 1;
        self.last_new_contact = now;
        trace!(%id, index = i, now, "new neighbour");
        Ok(i)
    }

    /// Insert `id`, evicting per the table's policy if there is no free slot.
    pub fn add_record(&mut self, id: NeighborId, now: Tick) -> Result<usize> {
        if !id.is_valid() {
            return Err(Error::InvalidInput("cannot insert the invalid id"));
        }
        if let Some(i) = self.index_of(id) {
            self.records[i].last_time = now;
            return Ok(i);
        }
        let i = self.evict()?;
        if i == self.count {
            self.count += 1;
        }
        self.records[i] = NeighborRecord::new(id, i, now);
        self.last_new_contact = self.last_new_contact.max(now);
        Ok(i)
    }

    /// Free a slot.
    ///
    /// Below capacity this is the next unused index and nothing changes.
    /// Otherwise the policy's victim is wiped along with its rows in both
    /// matrices, and its index returned for reuse.
    pub fn evict(&mut self) -> Result<usize> {
        if !self.is_full() {
            return Ok(self.count);
        }
        let victim = self
            .policy
            .select_victim(self.records())
            .filter(|&i| i < self.count)
            .ok_or(Error::EvictionFailure)?;

        debug!(
            policy = self.policy.name(),
            index = victim,
            id = %self.records[victim].id,
            last_time = self.records[victim].last_time,
            "evicting neighbour"
        );

        self.records[victim] = NeighborRecord::vacant(victim);
        for k in 0..self.capacity() {
            self.dist.clear(k, victim);
            self.adj.clear(k, victim);
        }
        // derived state may reference the old occupant
        for r in self.records[..self.count].iter_mut() {
            r.component = None;
        }
        self.component_count = 0;
        self.localized = false;
        Ok(victim)
    }

    /// First index at or after `start` adjacent to `from` and carrying all
    /// of `flags`.
    pub fn find_neighbor(&self, from: usize, start: usize, flags: NeighborFlags) -> Option<usize> {
        (start..self.count).find(|&i| self.adj.test(from, i) && self.records[i].flags.contains(flags))
    }

    // -- adjacency ---------------------------------------------------------

    pub fn is_adjacent(&self, i: usize, j: usize) -> bool {
        i < self.count && j < self.count && self.adj.test(i, j)
    }

    /// Mark `i` and `j` as able to hear each other.
    pub fn set_adjacent(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        self.adj.set(i, j);
        Ok(())
    }

    pub fn clear_adjacent(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        self.adj.clear(i, j);
        Ok(())
    }

    /// Raw adjacency matrix.
    pub fn adjacency(&self) -> &BitMatrix {
        &self.adj
    }

    /// Whether some path of known edges joins `i` and `j`.
    pub fn is_connected(&self, i: usize, j: usize) -> bool {
        if !(self.exists(i) && self.exists(j)) {
            return false;
        }
        if self.adj.test(i, j) {
            return true;
        }
        let mut acc = self.adj;
        let mut next = self.adj;
        for _ in 0..self.count {
            if BitMatrix::multiply(&acc, &self.adj, &mut next).is_err() {
                return false;
            }
            std::mem::swap(&mut acc, &mut next);
            if acc.test(i, j) {
                return true;
            }
        }
        false
    }

    // -- distances ---------------------------------------------------------

    /// Estimated distance between neighbours `i` and `j`. With `i == j`,
    /// the distance from the local robot to `i`.
    pub fn distance(&self, i: usize, j: usize) -> Option<f32> {
        if !(self.exists(i) && self.exists(j)) {
            return None;
        }
        self.dist.get(i, j)
    }

    pub fn set_distance(&mut self, i: usize, j: usize, dist: f32) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        self.dist.set(i, j, dist);
        Ok(())
    }

    pub fn clear_distance(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        self.dist.clear(i, j);
        Ok(())
    }

    /// Distance from the local robot to neighbour `i`.
    pub fn self_distance(&self, i: usize) -> Option<f32> {
        self.distance(i, i)
    }

    pub fn set_self_distance(&mut self, i: usize, dist: f32) -> Result<()> {
        self.set_distance(i, i, dist)
    }

    /// Raw distance matrix.
    pub fn distances(&self) -> &DistMatrix {
        &self.dist
    }

    /// Neighbour with the largest self-distance; the first wins ties.
    pub fn furthest(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for i in 0..self.count {
            if let Some(d) = self.self_distance(i) {
                if best.map_or(true, |(_, b)| d > b) {
                    best = Some((i, d));
                }
            }
        }
        best.map(|(i, _)| i)
    }

    // -- flags -------------------------------------------------------------

    /// Every known neighbour has a current position.
    pub fn is_localized(&self) -> bool {
        self.localized
    }

    pub fn set_localized(&mut self) {
        self.localized = true;
    }

    pub fn clear_localized(&mut self) {
        self.localized = false;
    }

    pub fn is_neighbor_localized(&self, i: usize) -> bool {
        self.get(i).is_some_and(NeighborRecord::is_localized)
    }

    pub fn set_neighbor_localized(&mut self, i: usize) -> Result<()> {
        self.check_index(i)?;
        self.records[i].set_localized();
        Ok(())
    }

    pub fn clear_neighbor_localized(&mut self, i: usize) -> Result<()> {
        self.check_index(i)?;
        self.records[i].clear_localized();
        Ok(())
    }

    /// Drop the localized flag from every record.
    pub fn clear_all_neighbor_localized(&mut self) {
        for r in self.records[..self.count].iter_mut() {
            r.clear_localized();
        }
    }

    // -- components --------------------------------------------------------

    /// Component count from the last segmentation pass. [`MAX_COMPONENTS`]
    /// means the neighbourhood was too fragmented to track.
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    /// Components found by the last segmentation pass.
    pub fn components(&self) -> &[Component] {
        &self.components[..self.component_count.min(MAX_COMPONENTS)]
    }

    pub fn component(&self, c: usize) -> Option<&Component> {
        self.components().get(c)
    }

    fn check_component(&self, c: usize) -> Result<()> {
        if c < self.component_count.min(MAX_COMPONENTS) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                index: c,
                count: self.component_count,
            })
        }
    }

    /// Fix `member` at `position` as the sole reference of component `c`,
    /// restarting the component's span from it.
    pub fn anchor_component(&mut self, c: usize, member: usize, position: Point) -> Result<()> {
        self.check_index(member)?;
        self.check_component(c)?;
        let rec = &mut self.records[member];
        rec.relocate(position);
        rec.component = Some(c);
        rec.set_localized();
        self.components[c].seed(member, position);
        Ok(())
    }

    /// Commit a computed position for `i` as a member of component `c`.
    pub fn assign_position(&mut self, i: usize, position: Point, c: usize) -> Result<()> {
        self.check_index(i)?;
        self.check_component(c)?;
        if !position.is_finite() {
            return Err(Error::InvalidInput("non-finite position"));
        }
        let rec = &mut self.records[i];
        rec.relocate(position);
        rec.component = Some(c);
        rec.set_localized();
        self.components[c].update(i, &self.records[..self.count], &self.adj);
        Ok(())
    }

    /// Re-run the ring-closure check on every component.
    pub fn check_components(&mut self) {
        let n = self.component_count.min(MAX_COMPONENTS);
        for comp in self.components[..n].iter_mut() {
            comp.check_full(&self.records[..self.count], &self.adj);
        }
    }
}

impl<P: EvictionPolicy> fmt::Display for NeighborTable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "neighbours {}/{} policy={} localized={} last_new={}",
            self.count,
            self.capacity(),
            self.policy.name(),
            self.localized,
            self.last_new_contact
        )?;
        for r in self.records() {
            writeln!(f, "  {}", r)?;
        }
        for (c, comp) in self.components().iter().enumerate() {
            writeln!(f, "  [{}] {}", c, comp)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u16) -> NeighborId {
        NeighborId(n)
    }

    fn filled(n: usize) -> NeighborTable {
        let mut t = NeighborTable::new();
        for k in 0..n {
            t.update_or_insert(id(k as u16 + 1), k as Tick + 10).unwrap();
        }
        t
    }

    #[test]
    fn insert_and_lookup() {
        let mut t = NeighborTable::new();
        assert!(t.is_empty());
        let a = t.update_or_insert(id(7), 3).unwrap();
        let b = t.update_or_insert(id(9), 4).unwrap();
        assert_eq!((a, b), (0, 1));
        assert_eq!(t.len(), 2);
        assert_eq!(t.index_of(id(9)), Some(1));
        assert_eq!(t.get_by_id(id(7)).map(|r| r.index), Some(0));
        assert_eq!(t.last_new_contact(), 4);
        assert!(t.exists(1));
        assert!(!t.exists(2));
        assert!(t.get(2).is_none());
    }

    #[test]
    fn repeat_contact_refreshes_without_new_contact() {
        let mut t = NeighborTable::new();
        t.update_or_insert(id(7), 3).unwrap();
        assert_eq!(t.update_or_insert(id(7), 20).unwrap(), 0);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(0).unwrap().last_time, 20);
        assert_eq!(t.last_new_contact(), 3);
    }

    #[test]
    fn marking_new_contact_moves_the_clock() {
        let mut t = filled(2);
        assert_eq!(t.last_new_contact(), 11);
        t.mark_new_contact(40);
        assert_eq!(t.last_new_contact(), 40);
        t.update_or_insert(id(1), 50).unwrap();
        assert_eq!(t.last_new_contact(), 40);
    }

    #[test]
    fn invalid_id_rejected() {
        let mut t = NeighborTable::new();
        assert!(matches!(
            t.update_or_insert(NeighborId::INVALID, 0),
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(t.index_of(NeighborId::INVALID), None);
    }

    #[test]
    fn full_table_rejects_without_evicting() {
        let mut t = filled(MAX_NEIGHBORS);
        assert!(t.is_full());
        assert_eq!(
            t.update_or_insert(id(100), 99),
            Err(Error::Full { capacity: MAX_NEIGHBORS })
        );
        assert_eq!(t.len(), MAX_NEIGHBORS);
        assert!(t.index_of(id(1)).is_some());
    }

    #[test]
    fn evict_below_capacity_returns_free_slot() {
        let mut t = filled(3);
        assert_eq!(t.evict(), Ok(3));
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn eviction_replaces_oldest() {
        let mut t = NeighborTable::new();
        // last contact times out of order; id 5 is the oldest
        for k in 0..MAX_NEIGHBORS as u16 {
            let now = if k == 5 { 1 } else { 50 + k as Tick };
            t.update_or_insert(id(k + 1), now).unwrap();
        }
        let oldest = t.index_of(id(6)).unwrap();
        t.set_adjacent(oldest, 0).unwrap();
        t.set_distance(oldest, 0, 12.0).unwrap();
        t.set_self_distance(oldest, 30.0).unwrap();

        let i = t.add_record(id(200), 1000).unwrap();
        assert_eq!(i, oldest);
        assert_eq!(t.len(), MAX_NEIGHBORS);
        assert_eq!(t.index_of(id(6)), None);
        assert_eq!(t.index_of(id(200)), Some(oldest));
        assert!(!t.is_adjacent(oldest, 0));
        assert_eq!(t.distance(oldest, 0), None);
        assert_eq!(t.self_distance(oldest), None);
        assert_eq!(t.last_new_contact(), 1000);
    }

    #[test]
    fn oldest_first_tie_goes_to_lowest_index() {
        let recs = [
            NeighborRecord::new(id(1), 0, 5),
            NeighborRecord::new(id(2), 1, 2),
            NeighborRecord::new(id(3), 2, 2),
        ];
        assert_eq!(OldestFirst.select_victim(&recs), Some(1));
        assert_eq!(OldestFirst.select_victim(&[]), None);
    }

    struct Never;

    impl EvictionPolicy for Never {
        fn name(&self) -> &'static str {
            "never"
        }

        fn select_victim(&self, _records: &[NeighborRecord]) -> Option<usize> {
            None
        }
    }

    #[test]
    fn policy_without_victim_fails() {
        let config = TableConfig::default().with_max_nbrs(2);
        let mut t = NeighborTable::with_config(config, Never).unwrap();
        t.add_record(id(1), 0).unwrap();
        t.add_record(id(2), 0).unwrap();
        assert_eq!(t.add_record(id(3), 0), Err(Error::EvictionFailure));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn config_validation() {
        assert!(NeighborTable::with_config(TableConfig::default().with_max_nbrs(0), OldestFirst).is_err());
        assert!(NeighborTable::with_config(TableConfig::default().with_max_nbrs(17), OldestFirst).is_err());
        assert!(NeighborTable::with_config(TableConfig::default().with_comm_range(-1.0), OldestFirst).is_err());
        let t = NeighborTable::with_config(TableConfig::default().with_max_nbrs(5), OldestFirst).unwrap();
        assert_eq!(t.capacity(), 5);
        assert_eq!(t.adjacency().dim(), 8);
        assert_eq!(t.distances().dim(), 5);
    }

    #[test]
    fn adjacency_is_bounds_checked() {
        let mut t = filled(3);
        assert_eq!(
            t.set_adjacent(0, 3),
            Err(Error::OutOfBounds { index: 3, count: 3 })
        );
        t.set_adjacent(0, 2).unwrap();
        assert!(t.is_adjacent(2, 0));
        t.clear_adjacent(2, 0).unwrap();
        assert!(!t.is_adjacent(0, 2));
    }

    #[test]
    fn find_neighbor_scans_from_start() {
        let mut t = filled(5);
        t.set_adjacent(0, 1).unwrap();
        t.set_adjacent(0, 3).unwrap();
        t.set_adjacent(0, 4).unwrap();
        t.set_neighbor_localized(3).unwrap();
        t.set_neighbor_localized(4).unwrap();
        let l = NeighborFlags::LOCALIZED;
        assert_eq!(t.find_neighbor(0, 0, l), Some(3));
        assert_eq!(t.find_neighbor(0, 4, l), Some(4));
        assert_eq!(t.find_neighbor(0, 0, NeighborFlags::empty()), Some(1));
        assert_eq!(t.find_neighbor(2, 0, l), None);
    }

    #[test]
    fn connectivity_through_chain() {
        let mut t = filled(6);
        t.set_adjacent(0, 1).unwrap();
        t.set_adjacent(1, 2).unwrap();
        t.set_adjacent(2, 3).unwrap();
        t.set_adjacent(4, 5).unwrap();
        assert!(t.is_connected(0, 3));
        assert!(t.is_connected(3, 0));
        assert!(!t.is_connected(0, 4));
        assert!(t.is_connected(4, 5));
        assert!(!t.is_connected(0, 9));
    }

    #[test]
    fn connectivity_around_four_cycle() {
        let mut t = filled(4);
        for k in 0..4 {
            t.set_adjacent(k, (k + 1) % 4).unwrap();
        }
        assert!(t.is_connected(0, 2));
        assert!(t.is_connected(1, 3));
    }

    #[test]
    fn furthest_prefers_first_on_tie() {
        let mut t = filled(4);
        assert_eq!(t.furthest(), None);
        t.set_self_distance(1, 40.0).unwrap();
        t.set_self_distance(2, 80.0).unwrap();
        t.set_self_distance(3, 80.0).unwrap();
        assert_eq!(t.furthest(), Some(2));
    }

    #[test]
    fn distances_are_symmetric_and_checked() {
        let mut t = filled(3);
        t.set_distance(0, 2, 33.0).unwrap();
        assert_eq!(t.distance(2, 0), Some(33.0));
        t.clear_distance(2, 0).unwrap();
        assert_eq!(t.distance(0, 2), None);
        assert!(t.set_distance(0, 7, 1.0).is_err());
    }

    #[test]
    fn display_lists_records() {
        let mut t = filled(2);
        t.set_localized();
        let s = t.to_string();
        assert!(s.starts_with("neighbours 2/16 policy=oldest-first localized=true"));
        assert!(s.contains("nbr #1 [0]"));
    }

    proptest! {
        #[test]
        fn count_never_exceeds_capacity(ids in proptest::collection::vec(0u16..40, 0..80)) {
            let mut t = NeighborTable::new();
            for (now, raw) in ids.iter().enumerate() {
                match t.update_or_insert(id(*raw), now as Tick) {
                    Ok(i) => prop_assert_eq!(t.get(i).map(|r| r.id), Some(id(*raw))),
                    Err(e) => {
                        prop_assert_eq!(e, Error::Full { capacity: MAX_NEIGHBORS });
                        prop_assert!(t.is_full());
                    }
                }
                prop_assert!(t.len() <= t.capacity());
            }
            // ids stay unique
            for (i, r) in t.records().iter().enumerate() {
                prop_assert_eq!(t.index_of(r.id), Some(i));
            }
        }

        #[test]
        fn add_record_keeps_capacity(ids in proptest::collection::vec(0u16..60, 0..120)) {
            let mut t = NeighborTable::new();
            for (now, raw) in ids.iter().enumerate() {
                let i = t.add_record(id(*raw), now as Tick).unwrap();
                prop_assert_eq!(t.get(i).map(|r| r.id), Some(id(*raw)));
                prop_assert!(t.len() <= t.capacity());
            }
        }

        #[test]
        fn adjacency_symmetry(i in 0usize..16, j in 0usize..16) {
            let mut t = filled(16);
            t.set_adjacent(i, j).unwrap();
            prop_assert!(t.is_adjacent(j, i));
            t.clear_adjacent(j, i).unwrap();
            prop_assert!(!t.is_adjacent(i, j));
        }
    }
}
