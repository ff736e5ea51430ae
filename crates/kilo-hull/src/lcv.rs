//! Local convex view test.
//!
//! Decides whether the local robot sits on the convex boundary of its
//! neighbourhood (Fayed et al., 2007). A single component is judged exactly
//! from its angular coverage. Two or three components are judged
//! geometrically when the combined coverage rules the boundary out, and by
//! a weighted coin flip otherwise.

use std::f32::consts::PI;

use kilo_topology::{Component, EvictionPolicy, NeighborTable};
use rand::Rng;
use tracing::trace;

use crate::{Error, Result};

/// Default slack on the single-component bound, as a fraction of π.
pub const DEFAULT_HULL_TOLERANCE: f32 = 0.015;

/// Tuning for the hull decision.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LcvParams {
    /// Coverage up to `π · (1 + hull_tolerance)` still counts as a half-plane.
    pub hull_tolerance: f32,
}

impl Default for LcvParams {
    fn default() -> Self {
        Self {
            hull_tolerance: DEFAULT_HULL_TOLERANCE,
        }
    }
}

impl LcvParams {
    pub fn with_hull_tolerance(mut self, hull_tolerance: f32) -> Self {
        self.hull_tolerance = hull_tolerance;
        self
    }
}

/// Chance, in `[0, 1]`, that a robot seeing components of total coverage
/// `alpha + gamma` is on the boundary.
pub fn boundary_probability(alpha: f32, gamma: f32) -> f32 {
    let budget = 4.0 * PI / 3.0;
    let p = (budget - 2.0 * alpha - 2.0 * gamma) / (budget - alpha - gamma);
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Decide boundary membership from a set of segmented components.
///
/// `count` is the table's component count, which may be the overflow
/// sentinel. Consumes at most one draw from `rng`.
pub fn decide<R: Rng + ?Sized>(
    components: &[Component],
    count: usize,
    params: &LcvParams,
    rng: &mut R,
) -> Result<bool> {
    let coverage = |c: usize| components.get(c).map_or(0.0, |comp| comp.coverage);
    match count {
        0 => Err(Error::Input("hull test needs at least one component")),
        1 => Ok(coverage(0) <= PI * (1.0 + params.hull_tolerance)),
        2 | 3 => {
            let alpha = coverage(0);
            let (gamma, gap) = if count == 2 {
                (coverage(1), 2.0 * PI / 3.0)
            } else {
                (coverage(1) + coverage(2), PI / 3.0)
            };
            if alpha + gamma > gap {
                trace!(alpha, gamma, gap, "components too wide for a boundary position");
                return Ok(false);
            }
            let percent = (boundary_probability(alpha, gamma) * 100.0) as u8;
            let draw: u8 = rng.gen_range(0..100);
            trace!(alpha, gamma, percent, draw, "probabilistic hull decision");
            Ok(draw < percent)
        }
        _ => Ok(false),
    }
}

/// Run the hull test against a segmented, localized table.
pub fn check_lcv<P, R>(table: &NeighborTable<P>, params: &LcvParams, rng: &mut R) -> Result<bool>
where
    P: EvictionPolicy,
    R: Rng + ?Sized,
{
    decide(table.components(), table.component_count(), params, rng)
}
