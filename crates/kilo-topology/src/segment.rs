//! Connected-component segmentation.
//!
//! Bit `(i, j)` of `adj^k` is set when a walk of length `k` joins `i` and
//! `j`. Walking the powers `adj, adj², …, adj^count`, each neighbour is
//! relabelled with the smallest lower index it can reach, one relabel per
//! power. A neighbour still carrying its own label afterwards founds a
//! component; everyone else inherits the component of its label, which has
//! a smaller index and so was assigned first.

use tracing::debug;

use crate::{BitMatrix, EvictionPolicy, NeighborTable, MAX_COMPONENTS, MAX_NEIGHBORS};

impl<P: EvictionPolicy> NeighborTable<P> {
    /// Recompute every component from the adjacency matrix.
    ///
    /// Returns the component count. A result of [`MAX_COMPONENTS`] means the
    /// neighbourhood is too fragmented for localisation this cycle; the
    /// table's localized flag is cleared in that case.
    pub fn segment(&mut self) -> usize {
        let n = self.count;
        let mut labels = [0usize; MAX_NEIGHBORS];
        for (i, label) in labels.iter_mut().enumerate().take(n) {
            *label = i;
        }

        let mut acc = self.adj;
        let mut next = self.adj;
        for _ in 0..n {
            for i in 1..n {
                if let Some(j) = (0..i).find(|&j| acc.test(i, j)) {
                    labels[i] = labels[i].min(j);
                }
            }
            if BitMatrix::multiply(&acc, &self.adj, &mut next).is_err() {
                // table dimension is always a multiple of 8
                break;
            }
            std::mem::swap(&mut acc, &mut next);
        }

        let mut founded = 0;
        for i in 0..n {
            if labels[i] == i {
                if founded >= MAX_COMPONENTS {
                    for r in self.records[i..n].iter_mut() {
                        r.component = None;
                    }
                    self.component_count = MAX_COMPONENTS;
                    self.clear_localized();
                    debug!(neighbours = n, "too many components, skipping localisation");
                    return MAX_COMPONENTS;
                }
                let c = founded;
                founded += 1;
                self.components[c].reset();
                self.components[c].update(i, &self.records[..n], &self.adj);
                self.records[i].component = Some(c);
            } else {
                self.records[i].component = self.records[labels[i]].component;
            }
        }
        for comp in self.components[founded..].iter_mut() {
            comp.reset();
        }
        self.component_count = founded;
        founded
    }
}

#[cfg(test)]
mod tests {
    use crate::{NeighborId, NeighborTable, Tick, MAX_COMPONENTS};
    use proptest::prelude::*;

    fn table_with(n: usize, edges: &[(usize, usize)]) -> NeighborTable {
        let mut t = NeighborTable::new();
        for k in 0..n {
            t.update_or_insert(NeighborId(k as u16 + 1), k as Tick).unwrap();
        }
        for &(i, j) in edges {
            t.set_adjacent(i, j).unwrap();
        }
        t
    }

    fn assignment(t: &NeighborTable) -> Vec<Option<usize>> {
        t.records().iter().map(|r| r.component).collect()
    }

    #[test]
    fn empty_table_has_no_components() {
        let mut t = NeighborTable::new();
        assert_eq!(t.segment(), 0);
        assert!(t.components().is_empty());
    }

    #[test]
    fn chain_is_one_component() {
        let mut t = table_with(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(t.segment(), 1);
        assert_eq!(assignment(&t), vec![Some(0); 4]);
        assert_eq!(t.components()[0].founder, Some(0));
    }

    #[test]
    fn reversed_chain_is_one_component() {
        // 3-0 ... 0 only reaches 1 through 3 and 2
        let mut t = table_with(4, &[(3, 0), (3, 2), (2, 1)]);
        assert_eq!(t.segment(), 1);
        assert_eq!(assignment(&t), vec![Some(0); 4]);
    }

    #[test]
    fn star_through_high_index() {
        let mut t = table_with(3, &[(0, 2), (1, 2)]);
        assert_eq!(t.segment(), 1);
        assert_eq!(assignment(&t), vec![Some(0); 3]);
    }

    #[test]
    fn isolated_neighbours_are_separate() {
        let mut t = table_with(4, &[(0, 2)]);
        assert_eq!(t.segment(), 3);
        assert_eq!(assignment(&t), vec![Some(0), Some(1), Some(0), Some(2)]);
        assert_eq!(t.components()[1].founder, Some(1));
        assert_eq!(t.components()[2].founder, Some(3));
    }

    #[test]
    fn overflow_reports_sentinel() {
        let mut t = table_with(7, &[]);
        t.set_localized();
        assert_eq!(t.segment(), MAX_COMPONENTS);
        assert_eq!(t.component_count(), MAX_COMPONENTS);
        assert!(!t.is_localized());
        let a = assignment(&t);
        assert_eq!(&a[..5], &[Some(0), Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(&a[5..], &[None, None]);
    }

    #[test]
    fn exactly_five_components_fit() {
        let mut t = table_with(6, &[(4, 5)]);
        assert_eq!(t.segment(), 5);
        assert_eq!(t.records()[5].component, Some(4));
    }

    #[test]
    fn stale_components_are_cleared() {
        let mut t = table_with(3, &[]);
        assert_eq!(t.segment(), 3);
        t.set_adjacent(0, 1).unwrap();
        t.set_adjacent(1, 2).unwrap();
        assert_eq!(t.segment(), 1);
        assert_eq!(t.components().len(), 1);
    }

    fn edges() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (1usize..=16).prop_flat_map(|n| {
            (Just(n), proptest::collection::vec((0..n, 0..n), 0..24))
        })
    }

    proptest! {
        #[test]
        fn segmentation_is_deterministic((n, es) in edges()) {
            let mut t = table_with(n, &es);
            let first = t.segment();
            let a = assignment(&t);
            let second = t.segment();
            prop_assert_eq!(first, second);
            prop_assert_eq!(a, assignment(&t));
        }

        #[test]
        fn component_count_is_bounded((n, es) in edges()) {
            let mut t = table_with(n, &es);
            let count = t.segment();
            prop_assert!(count <= MAX_COMPONENTS);
            for r in t.records() {
                if let Some(c) = r.component {
                    prop_assert!(c < count);
                }
            }
        }

        #[test]
        fn members_share_component_iff_connected((n, es) in edges()) {
            let mut t = table_with(n, &es);
            let count = t.segment();
            prop_assume!(count < MAX_COMPONENTS);
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let same = t.records()[i].component == t.records()[j].component;
                    prop_assert_eq!(same, t.is_connected(i, j), "i={} j={}", i, j);
                }
            }
        }
    }
}
