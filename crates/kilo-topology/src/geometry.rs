//! Planar points and angle arithmetic.
//!
//! Every angle helper is total: it accepts any finite input and maps it into
//! its documented range. Non-finite input yields non-finite output, which
//! callers check for with [`Point::is_finite`] before committing a position.

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A position in a component-local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Origin of the frame (the local robot).
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from the origin in direction `theta`.
    pub fn polar(radius: f32, theta: f32) -> Self {
        Self {
            x: radius * theta.cos(),
            y: radius * theta.sin(),
        }
    }

    /// Bearing from the origin, normalised to `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        norm_angle(self.y.atan2(self.x))
    }

    /// Distance from the origin.
    pub fn norm(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Squared euclidean distance to `other`.
    pub fn dist_sq(&self, other: &Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    pub fn dist(&self, other: &Self) -> f32 {
        self.dist_sq(other).sqrt()
    }

    /// Rotate about the origin by `theta` radians, counter-clockwise.
    pub fn rotate(&self, theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }

    /// Both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Normalise an angle into `[0, 2π)`.
pub fn norm_angle(theta: f32) -> f32 {
    let a = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Normalise an angle into `[-2π, 0)`.
pub fn neg_norm_angle(theta: f32) -> f32 {
    norm_angle(theta) - TAU
}

/// Normalise an angle into `(-π, π]`.
pub fn center_angle(theta: f32) -> f32 {
    let a = norm_angle(theta);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-π, π]`.
pub fn angle_diff(from: f32, to: f32) -> f32 {
    center_angle(to - from)
}

/// Law of cosines: the angle at vertex A of triangle ABC given its three
/// side lengths. Returns NaN for degenerate or impossible triangles.
pub fn angle_subtended(ab: f32, ac: f32, bc: f32) -> f32 {
    let cos = (ab * ab + ac * ac - bc * bc) / (2.0 * ab * ac);
    cos.acos()
}
