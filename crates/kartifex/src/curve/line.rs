use super::Segment;
use crate::bounds::Box2;
use crate::vec::{Mat3, Vec2};

/// Straight segment `p0 → p1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line2 {
    pub p0: Vec2,
    pub p1: Vec2,
}

impl Line2 {
    #[inline]
    pub const fn new(p0: Vec2, p1: Vec2) -> Self {
        Self { p0, p1 }
    }

    #[inline]
    pub fn start(&self) -> Vec2 {
        self.p0
    }

    #[inline]
    pub fn end(&self) -> Vec2 {
        self.p1
    }

    #[inline]
    pub fn position(&self, t: f64) -> Vec2 {
        if t == 0.0 {
            self.p0
        } else if t == 1.0 {
            self.p1
        } else {
            self.p0.lerp(self.p1, t)
        }
    }

    #[inline]
    pub fn direction(&self, _t: f64) -> Vec2 {
        self.p1 - self.p0
    }

    pub fn signed_area(&self) -> f64 {
        (self.p0.x * self.p1.y - self.p1.x * self.p0.y) / 2.0
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.p1 - self.p0).length()
    }

    #[inline]
    pub fn is_flat(&self, _epsilon: f64) -> bool {
        true
    }

    #[inline]
    pub fn endpoints(&self, start: Vec2, end: Vec2) -> Line2 {
        Line2::new(start, end)
    }

    pub fn split(&self, t: f64) -> [Line2; 2] {
        assert!(t > 0.0 && t < 1.0, "split parameter {t} must lie in (0, 1)");
        let m = self.position(t);
        [Line2::new(self.p0, m), Line2::new(m, self.p1)]
    }

    /// Orthogonal projection parameter, unclamped. A zero-length segment reports 0.
    pub fn nearest_point(&self, p: Vec2) -> f64 {
        let d = self.p1 - self.p0;
        let l = d.length_squared();
        if l == 0.0 {
            0.0
        } else {
            (p - self.p0).dot(d) / l
        }
    }

    #[inline]
    pub fn bounds(&self) -> Box2 {
        Box2::new(self.p0, self.p1)
    }

    #[inline]
    pub fn inflections(&self) -> Vec<f64> {
        Vec::new()
    }

    pub fn subdivide(&self, _error: f64) -> Vec<Vec2> {
        vec![self.p0, self.p1]
    }

    pub fn transform(&self, m: &Mat3) -> Line2 {
        Line2::new(self.p0.transform(m), self.p1.transform(m))
    }

    #[inline]
    pub fn reverse(&self) -> Line2 {
        Line2::new(self.p1, self.p0)
    }
}

impl Segment for Line2 {
    fn position(&self, t: f64) -> Vec2 {
        Line2::position(self, t)
    }
    fn split(&self, t: f64) -> [Self; 2] {
        Line2::split(self, t)
    }
    fn endpoints(&self, start: Vec2, end: Vec2) -> Self {
        Line2::endpoints(self, start, end)
    }
    fn inflections(&self) -> Vec<f64> {
        Vec::new()
    }
    fn start(&self) -> Vec2 {
        self.p0
    }
    fn end(&self) -> Vec2 {
        self.p1
    }
}
