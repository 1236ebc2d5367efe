//! Basic 2D types: orientation tags, segments, hashable point keys.

use serde::Serialize;

use crate::Vec2;

/// Turn direction of an ordered point triple (also used as a curve side tag).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation {
    Ccw,
    Cw,
    Collinear,
}

impl Orientation {
    /// `+1` for CCW, `-1` for CW, `0` for collinear.
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Orientation::Ccw => 1,
            Orientation::Cw => -1,
            Orientation::Collinear => 0,
        }
    }

    #[inline]
    pub fn from_sign(s: i8) -> Self {
        match s.signum() {
            1 => Orientation::Ccw,
            -1 => Orientation::Cw,
            _ => Orientation::Collinear,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        Self::from_sign(-self.sign())
    }
}

/// Ordered pair of points. Equality is directed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Segment {
    #[inline]
    pub fn new(p1: Vec2, p2: Vec2) -> Self {
        Self { p1, p2 }
    }

    /// True if `p` is one of the two endpoints (exact comparison).
    #[inline]
    pub fn has_endpoint(&self, p: Vec2) -> bool {
        self.p1 == p || self.p2 == p
    }

    /// The endpoint opposite to `p` (returns `p1` if `p` is not `p1`).
    #[inline]
    pub fn other(&self, p: Vec2) -> Vec2 {
        if p == self.p1 {
            self.p2
        } else {
            self.p1
        }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.p1 + self.p2) * 0.5
    }
}

/// Bit-exact key for hashing coordinates (`-0.0` folded onto `0.0`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey(u64, u64);

impl PointKey {
    #[inline]
    pub fn of(p: Vec2) -> Self {
        PointKey((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
    }
}
