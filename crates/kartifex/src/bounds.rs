//! Closed intervals and axis-aligned boxes.
//!
//! Both types have an explicit empty value (`lo > hi`), which `union` treats as
//! the identity, so bounds can be accumulated with a fold starting at `EMPTY`.

use crate::curve::{Curve2, Line2};
use crate::region::Ring2;
use crate::vec::Vec2;

/// Closed interval `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    pub const EMPTY: Interval = Interval {
        lo: f64::INFINITY,
        hi: f64::NEG_INFINITY,
    };

    pub const UNIT: Interval = Interval { lo: 0.0, hi: 1.0 };

    /// Interval spanning `a` and `b` in either order.
    #[inline]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.lo <= self.hi)
    }

    #[inline]
    pub fn contains(&self, n: f64) -> bool {
        self.lo <= n && n <= self.hi
    }

    #[inline]
    pub fn intersects(&self, o: &Interval) -> bool {
        !self.is_empty() && !o.is_empty() && o.hi >= self.lo && self.hi >= o.lo
    }

    #[inline]
    pub fn size(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.hi - self.lo
        }
    }

    #[inline]
    pub fn lerp(&self, t: f64) -> f64 {
        self.lo + (self.hi - self.lo) * t
    }

    /// Map a sub-interval of `[0, 1]` into this interval.
    #[inline]
    pub fn lerp_interval(&self, t: &Interval) -> Interval {
        Interval::new(self.lerp(t.lo), self.lerp(t.hi))
    }

    #[inline]
    pub fn normalize(&self, n: f64) -> f64 {
        (n - self.lo) / (self.hi - self.lo)
    }

    pub fn union(&self, o: &Interval) -> Interval {
        if self.is_empty() {
            *o
        } else if o.is_empty() {
            *self
        } else {
            Interval {
                lo: self.lo.min(o.lo),
                hi: self.hi.max(o.hi),
            }
        }
    }

    /// Grow by `t` on both sides; shrinking past zero width yields `EMPTY`.
    pub fn expand(&self, t: f64) -> Interval {
        if self.is_empty() {
            return *self;
        }
        let (lo, hi) = (self.lo - t, self.hi + t);
        if hi >= lo {
            Interval { lo, hi }
        } else {
            Interval::EMPTY
        }
    }
}

/// Axis-aligned bounding box `[lx, ux] × [ly, uy]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Box2 {
    pub lx: f64,
    pub ly: f64,
    pub ux: f64,
    pub uy: f64,
}

impl Box2 {
    pub const EMPTY: Box2 = Box2 {
        lx: f64::INFINITY,
        ly: f64::INFINITY,
        ux: f64::NEG_INFINITY,
        uy: f64::NEG_INFINITY,
    };

    /// Box with `a` and `b` as opposite corners.
    #[inline]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            lx: a.x.min(b.x),
            ly: a.y.min(b.y),
            ux: a.x.max(b.x),
            uy: a.y.max(b.y),
        }
    }

    #[inline]
    pub fn from_intervals(x: Interval, y: Interval) -> Self {
        Self {
            lx: x.lo,
            ly: y.lo,
            ux: x.hi,
            uy: y.hi,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.lx <= self.ux && self.ly <= self.uy)
    }

    #[inline]
    pub fn lower(&self) -> Vec2 {
        Vec2::new(self.lx, self.ly)
    }

    #[inline]
    pub fn upper(&self) -> Vec2 {
        Vec2::new(self.ux, self.uy)
    }

    #[inline]
    pub fn x(&self) -> Interval {
        Interval::new(self.lx, self.ux)
    }

    #[inline]
    pub fn y(&self) -> Interval {
        Interval::new(self.ly, self.uy)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.ux - self.lx
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.uy - self.ly
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.upper() - self.lower()
    }

    pub fn union(&self, o: &Box2) -> Box2 {
        if self.is_empty() {
            return *o;
        }
        if o.is_empty() {
            return *self;
        }
        Box2 {
            lx: self.lx.min(o.lx),
            ly: self.ly.min(o.ly),
            ux: self.ux.max(o.ux),
            uy: self.uy.max(o.uy),
        }
    }

    pub fn union_point(&self, v: Vec2) -> Box2 {
        if self.is_empty() {
            return Box2::new(v, v);
        }
        Box2 {
            lx: self.lx.min(v.x),
            ly: self.ly.min(v.y),
            ux: self.ux.max(v.x),
            uy: self.uy.max(v.y),
        }
    }

    pub fn intersection(&self, o: &Box2) -> Box2 {
        if !self.intersects(o) {
            return Box2::EMPTY;
        }
        Box2 {
            lx: self.lx.max(o.lx),
            ly: self.ly.max(o.ly),
            ux: self.ux.min(o.ux),
            uy: self.uy.min(o.uy),
        }
    }

    /// Closed-box overlap test; touching boxes intersect.
    #[inline]
    pub fn intersects(&self, o: &Box2) -> bool {
        !self.is_empty()
            && !o.is_empty()
            && o.ux >= self.lx
            && o.uy >= self.ly
            && self.ux >= o.lx
            && self.uy >= o.ly
    }

    #[inline]
    pub fn contains(&self, v: Vec2) -> bool {
        v.x >= self.lx && v.y >= self.ly && v.x <= self.ux && v.y <= self.uy
    }

    /// Grow by `t` on every side; shrinking past zero extent yields `EMPTY`.
    pub fn expand(&self, t: f64) -> Box2 {
        self.expand_vec(Vec2::new(t, t))
    }

    pub fn expand_vec(&self, v: Vec2) -> Box2 {
        if self.is_empty() {
            return *self;
        }
        let b = Box2 {
            lx: self.lx - v.x,
            ly: self.ly - v.y,
            ux: self.ux + v.x,
            uy: self.uy + v.y,
        };
        if b.is_empty() {
            Box2::EMPTY
        } else {
            b
        }
    }

    /// Point at normalized coordinates `t` (per axis) inside the box.
    #[inline]
    pub fn lerp(&self, t: Vec2) -> Vec2 {
        self.lower() + self.size().mul_elem(t)
    }

    pub fn translate(&self, v: Vec2) -> Box2 {
        Box2::new(self.lower() + v, self.upper() + v)
    }

    /// Counterclockwise ring along the box edges, starting at the lower corner.
    pub fn outline(&self) -> Ring2 {
        let a = self.lower();
        let b = Vec2::new(self.ux, self.ly);
        let c = self.upper();
        let d = Vec2::new(self.lx, self.uy);
        Ring2::new([
            Curve2::Line(Line2::new(a, b)),
            Curve2::Line(Line2::new(b, c)),
            Curve2::Line(Line2::new(c, d)),
            Curve2::Line(Line2::new(d, a)),
        ])
    }
}
