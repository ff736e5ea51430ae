//! Hardware seams.
//!
//! A robot needs three things from the board it runs on: a free-running tick
//! counter, a source of true randomness for its hull coin flips, and a way
//! to turn a received signal into a distance. The simulator provides
//! software stand-ins for all three.

use kilo_topology::Tick;
use rand::{Rng, RngCore};

/// Monotonic tick counter.
pub trait Clock {
    fn ticks(&self) -> Tick;
}

/// A clock advanced by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    ticks: Tick,
}

impl SimClock {
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    pub fn advance(&mut self, by: Tick) {
        self.ticks = self.ticks.wrapping_add(by);
    }
}

impl Clock for SimClock {
    fn ticks(&self) -> Tick {
        self.ticks
    }
}

/// Slow, unbiased entropy from the board, one byte per call.
pub trait HardwareRng {
    fn random_byte(&mut self) -> u8;
}

impl<R: RngCore> HardwareRng for R {
    fn random_byte(&mut self) -> u8 {
        self.gen()
    }
}

/// Presents a [`HardwareRng`] as a [`RngCore`] so generic `rand` code can
/// draw from it directly.
#[derive(Debug)]
pub struct HardwareDraws<'a, H: ?Sized>(pub &'a mut H);

impl<H: HardwareRng + ?Sized> RngCore for HardwareDraws<'_, H> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.0.random_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Converts a raw reception measurement to a distance in millimetres.
pub trait DistanceEstimator {
    /// Whatever the receiver reports alongside a frame.
    type Raw;

    fn estimate(&mut self, raw: &Self::Raw) -> f32;
}

/// Simulated range finder: the raw reading is the true separation, and the
/// estimate is off by up to `noise` of it in either direction.
#[derive(Debug, Clone)]
pub struct NoisyRange<R> {
    noise: f32,
    rng: R,
}

impl<R: Rng> NoisyRange<R> {
    /// `noise` is a fraction of the true distance; negative values count as
    /// zero.
    pub fn new(noise: f32, rng: R) -> Self {
        Self {
            noise: noise.max(0.0),
            rng,
        }
    }

    pub fn noise(&self) -> f32 {
        self.noise
    }
}

impl<R: Rng> DistanceEstimator for NoisyRange<R> {
    type Raw = f32;

    fn estimate(&mut self, raw: &f32) -> f32 {
        if self.noise <= 0.0 {
            return *raw;
        }
        let factor = 1.0 + self.rng.gen_range(-self.noise..=self.noise);
        (*raw * factor).max(0.0)
    }
}
