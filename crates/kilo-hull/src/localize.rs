//! Local coordinate reconstruction.
//!
//! Each component gets its own frame: its lowest-index member is pinned to
//! the positive x-axis at its measured range, and everyone else is placed
//! outward from already-placed references:
//!
//! - one reference: **triangulation** from the law of cosines, picking the
//!   side of the reference that agrees with the reference's own neighbours;
//! - two references: **trilateration** by intersecting range circles.
//!
//! Any computation that produces a non-finite coordinate leaves the target
//! unplaced for this cycle.

use kilo_topology::{
    angle_subtended, EvictionPolicy, NeighborFlags, NeighborTable, Point, MAX_COMPONENTS,
};
use tracing::{debug, trace};

use crate::Result;

/// What a call to [`localize_all`] achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// No neighbours; nothing was done.
    Empty,
    /// Too many components to reason about; the table is marked not
    /// localized.
    Fragmented,
    /// Every component was processed.
    Localized {
        components: usize,
        placed: usize,
        unplaced: usize,
        rounds: usize,
    },
}

/// A computed position and the component it joins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point,
    pub component: usize,
}

/// Rebuild every neighbour's position from scratch.
pub fn localize_all<P: EvictionPolicy>(table: &mut NeighborTable<P>) -> Result<Outcome> {
    if table.is_empty() {
        return Ok(Outcome::Empty);
    }

    let components = table.segment();
    if components >= MAX_COMPONENTS {
        table.clear_localized();
        return Ok(Outcome::Fragmented);
    }

    table.clear_all_neighbor_localized();

    for c in 0..components {
        let Some(founder) = table.component(c).and_then(|comp| comp.founder) else {
            continue;
        };
        match table.self_distance(founder) {
            Some(range) => table.anchor_component(c, founder, Point::new(range, 0.0))?,
            None => trace!(component = c, founder, "anchor has no range estimate"),
        }
    }

    let n = table.len();
    let mut pending = true;
    let mut rounds = 0;
    for _ in 0..n.saturating_sub(1) {
        if !pending {
            break;
        }
        pending = false;
        rounds += 1;
        for target in 0..n {
            if table.is_neighbor_localized(target) {
                continue;
            }
            localize_one(table, target)?;
            if !table.is_neighbor_localized(target) {
                pending = true;
            }
        }
    }

    table.check_components();
    table.set_localized();

    let placed = table.records().iter().filter(|r| r.is_localized()).count();
    Ok(Outcome::Localized {
        components,
        placed,
        unplaced: n - placed,
        rounds,
    })
}

/// Try to place a single neighbour from up to two placed references.
pub fn localize_one<P: EvictionPolicy>(table: &mut NeighborTable<P>, target: usize) -> Result<bool> {
    let localized = NeighborFlags::LOCALIZED;
    let first = table.find_neighbor(target, 0, localized);
    let second = first.and_then(|r| table.find_neighbor(target, r + 1, localized));

    let placement = match (first, second) {
        (Some(r1), Some(r2)) => trilaterate(table, target, r1, r2),
        (Some(r), None) => triangulate(table, target, r),
        _ => None,
    };

    match placement {
        Some(p) => {
            table.assign_position(target, p.position, p.component)?;
            Ok(true)
        }
        None => {
            table.clear_neighbor_localized(target)?;
            Ok(false)
        }
    }
}

/// Place `target` using one placed reference.
///
/// The angle between target and reference, seen from the local robot, is
/// fixed by the three ranges; the sign is not. Each placed neighbour of the
/// reference is range-checked against both candidates: one the target can
/// hear picks the candidate it is in range of, one the target cannot hear
/// rules that candidate out. With no evidence the counter-clockwise
/// candidate is taken.
///
/// An unheard neighbour therefore votes for the candidate *farther* from it,
/// the reverse of the heard case, rather than for whichever is closest.
pub fn triangulate<P: EvictionPolicy>(
    table: &NeighborTable<P>,
    target: usize,
    reference: usize,
) -> Option<Placement> {
    let ab = table.self_distance(target)?;
    let ac = table.self_distance(reference)?;
    let bc = table.distance(target, reference)?;
    let anchor = table.get(reference)?;
    let component = anchor.component?;

    let theta = angle_subtended(ab, ac, bc);
    let ref_theta = anchor.position.y.atan2(anchor.position.x);
    let ccw = Point::polar(ab, ref_theta + theta);
    let cw = Point::polar(ab, ref_theta - theta);

    let range_sq = table.config().comm_range * table.config().comm_range;
    let mut position = ccw;
    for (k, other) in table.records().iter().enumerate() {
        if k == reference || k == target || !other.is_localized() {
            continue;
        }
        if !table.is_adjacent(reference, k) {
            continue;
        }
        let heard = table.is_adjacent(target, k);
        if other.position.dist_sq(&cw) <= range_sq {
            position = if heard { cw } else { ccw };
        }
        if other.position.dist_sq(&ccw) <= range_sq {
            position = if heard { ccw } else { cw };
        }
    }

    if !position.is_finite() {
        debug!(target, reference, ab, ac, bc, "triangulation produced a non-finite point");
        return None;
    }
    Some(Placement {
        position,
        component,
    })
}

/// Place `target` using two placed references.
///
/// Works in the frame where the first reference lies on the positive
/// x-axis, then rotates back. A reference already on the axis is used first
/// to skip the rotation.
pub fn trilaterate<P: EvictionPolicy>(
    table: &NeighborTable<P>,
    target: usize,
    first: usize,
    second: usize,
) -> Option<Placement> {
    let (mut ref1, mut ref2) = (table.get(first)?, table.get(second)?);
    if ref2.position.y == 0.0 && ref1.position.y != 0.0 {
        std::mem::swap(&mut ref1, &mut ref2);
    }
    let component = ref1.component?;

    let r1 = table.self_distance(target)?;
    let r2 = table.distance(target, ref1.index)?;
    let r3 = table.distance(target, ref2.index)?;
    let d = table.self_distance(ref1.index)?;

    let theta = if ref1.position.y != 0.0 {
        ref1.position.y.atan2(ref1.position.x)
    } else if ref1.position.x < 0.0 {
        std::f32::consts::PI
    } else {
        0.0
    };
    let Point { x: i, y: j } = ref2.position.rotate(-theta);

    let chord = r1 * r1 - r2 * r2 + d * d;
    let rel_x = chord / (2.0 * d);
    let mut rel_y = (r1 * r1 - r3 * r3 + i * i + j * j) / (2.0 * j) - i * chord / (2.0 * d * j);
    // colinear references leave y undetermined; take the axis
    if !rel_y.is_finite() {
        rel_y = 0.0;
    }

    let position = Point::new(rel_x, rel_y).rotate(theta);
    if !position.is_finite() {
        debug!(target, first, second, r1, r2, r3, d, "trilateration produced a non-finite point");
        return None;
    }
    Some(Placement {
        position,
        component,
    })
}
