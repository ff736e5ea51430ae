//! Packed boolean matrix.
//!
//! Bits are stored row-major, eight to a byte, over a backing buffer the caller
//! chooses: the default is an inline array sized for [`MAX_NEIGHBORS`], but any
//! `AsRef<[u8]> + AsMut<[u8]>` works (a borrowed `&mut [u8]` included), so the
//! matrix never allocates.
//!
//! # Multiplication
//!
//! [`BitMatrix::multiply`] works a byte at a time: row `i` of `a ⊗ b` is the
//! logical OR of every row `j` of `b` for which bit `(i, j)` of `a` is set.
//! Combining with OR (not XOR) keeps the product a reachability matrix: bit
//! `(i, j)` of `adj^k` is set iff some walk of length `k` joins `i` and `j`,
//! regardless of how many such walks exist.

use std::fmt;

use tracing::debug;

use crate::{Error, Result, ADJ_BYTES, MAX_NEIGHBORS};

/// Number of bytes needed to hold an `n × n` bit matrix.
#[inline]
pub const fn bytes_for(n: usize) -> usize {
    (n * n + 7) / 8
}

/// Fixed-size square bit matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitMatrix<B = [u8; ADJ_BYTES]> {
    n: usize,
    symmetric: bool,
    data: B,
}

impl BitMatrix {
    /// Create a zeroed symmetric `n × n` matrix over inline storage.
    pub fn new(n: usize) -> Result<Self> {
        Self::with_storage(n, true, [0u8; ADJ_BYTES])
    }
}

impl Default for BitMatrix {
    /// Zeroed symmetric matrix of the full table dimension.
    fn default() -> Self {
        Self {
            n: MAX_NEIGHBORS,
            symmetric: true,
            data: [0u8; ADJ_BYTES],
        }
    }
}

impl<B: AsRef<[u8]>> BitMatrix<B> {
    /// Dimension of the matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Whether writes are mirrored across the diagonal.
    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// The used bytes of the backing buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data.as_ref()[..bytes_for(self.n)]
    }

    #[inline]
    fn locate(&self, i: usize, j: usize) -> Option<(usize, u8)> {
        if i >= self.n || j >= self.n {
            return None;
        }
        let bit = i * self.n + j;
        Some((bit / 8, 1u8 << (bit % 8)))
    }

    /// Test bit `(i, j)`. Out-of-range coordinates read as unset.
    #[inline]
    pub fn test(&self, i: usize, j: usize) -> bool {
        match self.locate(i, j) {
            Some((byte, mask)) => self.data.as_ref()[byte] & mask != 0,
            None => false,
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> BitMatrix<B> {
    /// Create an `n × n` matrix over caller-provided storage. The used prefix
    /// of the buffer is cleared.
    pub fn with_storage(n: usize, symmetric: bool, mut data: B) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidInput("bit matrix dimension must be non-zero"));
        }
        let needed = bytes_for(n);
        let available = data.as_ref().len();
        if available < needed {
            return Err(Error::OutOfMemory { needed, available });
        }
        data.as_mut()[..needed].fill(0);
        Ok(Self { n, symmetric, data })
    }

    fn write(&mut self, i: usize, j: usize, on: bool) {
        let Some((byte, mask)) = self.locate(i, j) else {
            debug!(i, j, n = self.n, "bit matrix write out of range ignored");
            return;
        };
        let data = self.data.as_mut();
        if on {
            data[byte] |= mask;
        } else {
            data[byte] &= !mask;
        }
    }

    /// Set bit `(i, j)` (and `(j, i)` when symmetric).
    pub fn set(&mut self, i: usize, j: usize) {
        self.write(i, j, true);
        if self.symmetric {
            self.write(j, i, true);
        }
    }

    /// Clear bit `(i, j)` (and `(j, i)` when symmetric).
    pub fn clear(&mut self, i: usize, j: usize) {
        self.write(i, j, false);
        if self.symmetric {
            self.write(j, i, false);
        }
    }

    /// Set every bit to `bit`.
    pub fn fill(&mut self, bit: bool) {
        let len = bytes_for(self.n);
        self.data.as_mut()[..len].fill(if bit { 0xff } else { 0x00 });
    }

    /// Overwrite this matrix with the contents of `src`.
    pub fn copy_from<S: AsRef<[u8]>>(&mut self, src: &BitMatrix<S>) -> Result<()> {
        if src.n != self.n || src.symmetric != self.symmetric {
            return Err(Error::InvalidInput("bit matrix copy between different shapes"));
        }
        let len = bytes_for(self.n);
        self.data.as_mut()[..len].copy_from_slice(&src.data.as_ref()[..len]);
        Ok(())
    }

    /// Compute `out = a ⊗ b` over the boolean semiring.
    ///
    /// All three matrices must share a dimension that is a multiple of 8 so
    /// rows can be combined whole bytes at a time. `out` is overwritten.
    pub fn multiply<A, C>(a: &BitMatrix<A>, b: &BitMatrix<C>, out: &mut Self) -> Result<()>
    where
        A: AsRef<[u8]>,
        C: AsRef<[u8]>,
    {
        let n = a.n;
        if b.n != n || out.n != n {
            return Err(Error::InvalidInput("bit matrix multiply dimension mismatch"));
        }
        if n % 8 != 0 {
            return Err(Error::InvalidInput("bit matrix multiply needs a multiple-of-8 dimension"));
        }

        let row_bytes = n / 8;
        let b_data = b.data.as_ref();
        let out_data = out.data.as_mut();
        for byte in 0..bytes_for(n) {
            let row = byte / row_bytes;
            let col_byte = byte % row_bytes;
            let mut acc = 0u8;
            for j in 0..n {
                if a.test(row, j) {
                    acc |= b_data[j * row_bytes + col_byte];
                }
            }
            out_data[byte] = acc;
        }
        Ok(())
    }
}

impl<B: AsRef<[u8]>> fmt::Display for BitMatrix<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "bitmat {}x{} ({})",
            self.n,
            self.n,
            if self.symmetric { "symmetric" } else { "default" }
        )?;
        for i in 0..self.n {
            for j in 0..self.n {
                f.write_str(if self.test(i, j) { "1" } else { "0" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cycle(n: usize, len: usize) -> BitMatrix {
        let mut m = BitMatrix::new(n).unwrap();
        for i in 0..len {
            m.set(i, (i + 1) % len);
        }
        m
    }

    #[test]
    fn read_only_views_multiply_and_render() {
        let mut owned = BitMatrix::with_storage(8, false, [0u8; 8]).unwrap();
        owned.set(0, 1);
        owned.set(1, 2);
        let view = BitMatrix {
            n: 8,
            symmetric: false,
            data: owned.as_bytes(),
        };
        assert!(view.test(0, 1));
        assert!(!view.test(1, 0));

        let mut out = BitMatrix::with_storage(8, false, [0u8; 8]).unwrap();
        BitMatrix::multiply(&view, &view, &mut out).unwrap();
        assert!(out.test(0, 2));
        assert!(!out.test(0, 1));
        assert!(view.to_string().starts_with("bitmat 8x8 (default)"));
    }

    #[test]
    fn new_matrix_is_empty() {
        let m = BitMatrix::new(16).unwrap();
        assert!(m.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(m.as_bytes().len(), 32);
    }

    #[test]
    fn rejects_zero_dimension_and_short_storage() {
        assert!(matches!(BitMatrix::new(0), Err(Error::InvalidInput(_))));
        assert_eq!(
            BitMatrix::with_storage(16, true, [0u8; 8]),
            Err(Error::OutOfMemory { needed: 32, available: 8 })
        );
    }

    #[test]
    fn borrowed_storage_works() {
        let mut raw = [0xffu8; 8];
        let mut m = BitMatrix::with_storage(8, false, &mut raw[..]).unwrap();
        assert!(!m.test(0, 0));
        m.set(2, 5);
        assert!(m.test(2, 5));
        assert!(!m.test(5, 2));
    }

    #[test]
    fn symmetric_set_and_clear_mirror() {
        let mut m = BitMatrix::new(16).unwrap();
        m.set(3, 11);
        assert!(m.test(3, 11));
        assert!(m.test(11, 3));
        m.clear(11, 3);
        assert!(!m.test(3, 11));
        assert!(!m.test(11, 3));
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut m = BitMatrix::new(8).unwrap();
        m.set(8, 1);
        assert!(!m.test(8, 1));
        assert!(m.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_and_copy() {
        let mut a = BitMatrix::new(8).unwrap();
        a.fill(true);
        assert!(a.test(7, 7));
        let mut b = BitMatrix::new(8).unwrap();
        b.copy_from(&a).unwrap();
        assert_eq!(a, b);
        b.fill(false);
        assert!(!b.test(0, 0));

        let c = BitMatrix::new(16).unwrap();
        assert!(b.copy_from(&c).is_err());
    }

    #[test]
    fn multiply_requires_byte_aligned_dimension() {
        let a = BitMatrix::new(6).unwrap();
        let mut out = BitMatrix::new(6).unwrap();
        assert!(BitMatrix::multiply(&a, &a, &mut out).is_err());
    }

    #[test]
    fn square_of_path_reaches_two_hops() {
        // 0 - 1 - 2
        let mut adj = BitMatrix::new(8).unwrap();
        adj.set(0, 1);
        adj.set(1, 2);
        let mut sq = BitMatrix::new(8).unwrap();
        BitMatrix::multiply(&adj, &adj, &mut sq).unwrap();
        assert!(sq.test(0, 2));
        assert!(sq.test(0, 0));
        assert!(!sq.test(0, 1));
    }

    #[test]
    fn four_cycle_keeps_bit_with_two_paths() {
        // 0-1-2-3-0: there are two length-2 walks from 0 to 2 (via 1 and via 3).
        // Parity (XOR) combination would cancel them; reachability keeps the bit.
        let adj = cycle(8, 4);
        let mut sq = BitMatrix::new(8).unwrap();
        BitMatrix::multiply(&adj, &adj, &mut sq).unwrap();
        assert!(sq.test(0, 2));
        assert!(sq.test(1, 3));

        let mut parity = [[false; 4]; 4];
        for (i, row) in parity.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).filter(|&k| adj.test(i, k) && adj.test(k, j)).count() % 2 == 1;
            }
        }
        assert!(!parity[0][2], "XOR semantics would have erased this reachability bit");
    }

    #[test]
    fn display_renders_rows() {
        let mut m = BitMatrix::new(8).unwrap();
        m.set(0, 1);
        let s = m.to_string();
        assert!(s.starts_with("bitmat 8x8 (symmetric)"));
        assert!(s.contains("01000000"));
        assert!(s.contains("10000000"));
    }

    proptest! {
        #[test]
        fn set_is_symmetric(i in 0usize..16, j in 0usize..16) {
            let mut m = BitMatrix::new(16).unwrap();
            m.set(i, j);
            prop_assert!(m.test(i, j));
            prop_assert!(m.test(j, i));
            m.clear(j, i);
            prop_assert!(!m.test(i, j));
            prop_assert!(!m.test(j, i));
        }

        #[test]
        fn multiply_matches_naive_or_product(edges in proptest::collection::vec((0usize..16, 0usize..16), 0..40)) {
            let mut adj = BitMatrix::new(16).unwrap();
            for &(i, j) in &edges {
                adj.set(i, j);
            }
            let mut out = BitMatrix::new(16).unwrap();
            BitMatrix::multiply(&adj, &adj, &mut out).unwrap();
            for i in 0..16 {
                for j in 0..16 {
                    let expected = (0..16).any(|k| adj.test(i, k) && adj.test(k, j));
                    prop_assert_eq!(out.test(i, j), expected);
                }
            }
        }
    }
}
