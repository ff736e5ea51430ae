//! Packed symmetric distance matrix.
//!
//! Only the upper triangle (diagonal included) is stored, so an `n × n`
//! matrix needs `n(n+1)/2` floats. Entry `(i, i)` is the distance from the
//! local robot to neighbour `i`, not a self-distance.

use std::fmt;

use crate::{Error, Result, DIST_ENTRIES, MAX_NEIGHBORS};

/// Stored value for "no estimate".
pub const INVALID_DISTANCE: f32 = -1.0;

/// Number of floats needed for an `n × n` packed symmetric matrix.
#[inline]
pub const fn entries_for(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Symmetric float matrix over packed upper-triangular storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistMatrix<S = [f32; DIST_ENTRIES]> {
    n: usize,
    data: S,
}

impl DistMatrix {
    /// Create an `n × n` matrix over inline storage, every entry invalid.
    pub fn new(n: usize) -> Result<Self> {
        Self::with_storage(n, [INVALID_DISTANCE; DIST_ENTRIES])
    }
}

impl Default for DistMatrix {
    fn default() -> Self {
        Self {
            n: MAX_NEIGHBORS,
            data: [INVALID_DISTANCE; DIST_ENTRIES],
        }
    }
}

impl<S: AsRef<[f32]> + AsMut<[f32]>> DistMatrix<S> {
    /// Create an `n × n` matrix over caller-provided storage. The used prefix
    /// is reset to [`INVALID_DISTANCE`].
    pub fn with_storage(n: usize, data: S) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidInput("distance matrix dimension must be non-zero"));
        }
        let needed = entries_for(n);
        let available = data.as_ref().len();
        if available < needed {
            return Err(Error::OutOfMemory { needed, available });
        }
        let mut m = Self { n, data };
        m.fill_invalid();
        Ok(m)
    }

    /// Dimension of the matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    #[inline]
    fn slot(&self, i: usize, j: usize) -> Option<usize> {
        if i >= self.n || j >= self.n {
            return None;
        }
        let (sm, lg) = if i > j { (j, i) } else { (i, j) };
        let n = self.n;
        Some(n * (n - 1) / 2 - (n - sm) * (n - sm - 1) / 2 + lg)
    }

    /// Distance estimate for `(i, j)`, `None` if unknown or out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        let v = self.data.as_ref()[self.slot(i, j)?];
        (v.is_finite() && v >= 0.0).then_some(v)
    }

    /// Record a distance estimate. Negative or non-finite values are stored
    /// as invalid.
    pub fn set(&mut self, i: usize, j: usize, dist: f32) {
        if let Some(k) = self.slot(i, j) {
            self.data.as_mut()[k] = if dist.is_finite() && dist >= 0.0 {
                dist
            } else {
                INVALID_DISTANCE
            };
        }
    }

    /// Forget the estimate for `(i, j)`.
    pub fn clear(&mut self, i: usize, j: usize) {
        if let Some(k) = self.slot(i, j) {
            self.data.as_mut()[k] = INVALID_DISTANCE;
        }
    }

    /// Reset every entry to [`INVALID_DISTANCE`].
    pub fn fill_invalid(&mut self) {
        let len = entries_for(self.n);
        self.data.as_mut()[..len].fill(INVALID_DISTANCE);
    }
}

impl<S: AsRef<[f32]> + AsMut<[f32]>> fmt::Display for DistMatrix<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "matf {}x{} (symmetric)", self.n, self.n)?;
        for i in 0..self.n {
            for j in 0..self.n {
                match self.get(i, j) {
                    Some(d) => write!(f, "{:<8.2}", d)?,
                    None => write!(f, "{:<8}", "-")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_invalid() {
        let m = DistMatrix::new(16).unwrap();
        for i in 0..16 {
            for j in 0..16 {
                assert_eq!(m.get(i, j), None);
            }
        }
    }

    #[test]
    fn storage_size_is_triangular() {
        assert_eq!(entries_for(16), 136);
        assert_eq!(
            DistMatrix::with_storage(4, [0.0f32; 9]).unwrap_err(),
            Error::OutOfMemory { needed: 10, available: 9 }
        );
    }

    #[test]
    fn packed_slots_are_distinct_and_dense() {
        let m = DistMatrix::new(7).unwrap();
        let mut seen = vec![false; entries_for(7)];
        for i in 0..7 {
            for j in i..7 {
                let k = m.slot(i, j).unwrap();
                assert!(!seen[k], "slot {} reused for ({}, {})", k, i, j);
                seen[k] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn symmetric_get_set() {
        let mut m = DistMatrix::new(16).unwrap();
        m.set(2, 9, 42.5);
        assert_eq!(m.get(2, 9), Some(42.5));
        assert_eq!(m.get(9, 2), Some(42.5));
        m.clear(9, 2);
        assert_eq!(m.get(2, 9), None);
    }

    #[test]
    fn diagonal_is_independent_of_off_diagonal() {
        let mut m = DistMatrix::new(4).unwrap();
        m.set(1, 1, 30.0);
        m.set(1, 2, 55.0);
        assert_eq!(m.get(1, 1), Some(30.0));
        assert_eq!(m.get(2, 2), None);
    }

    #[test]
    fn rejects_garbage_values() {
        let mut m = DistMatrix::new(4).unwrap();
        m.set(0, 1, f32::NAN);
        assert_eq!(m.get(0, 1), None);
        m.set(0, 1, -3.0);
        assert_eq!(m.get(0, 1), None);
        m.set(0, 1, f32::INFINITY);
        assert_eq!(m.get(0, 1), None);
    }

    #[test]
    fn out_of_range_reads_none() {
        let mut m = DistMatrix::new(4).unwrap();
        m.set(4, 0, 1.0);
        assert_eq!(m.get(4, 0), None);
    }

    #[test]
    fn fill_invalid_clears_everything() {
        let mut m = DistMatrix::new(4).unwrap();
        m.set(0, 3, 1.0);
        m.set(2, 2, 2.0);
        m.fill_invalid();
        assert_eq!(m.get(0, 3), None);
        assert_eq!(m.get(2, 2), None);
    }
}
