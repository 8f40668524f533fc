use super::{gravesen_length, signed_distance, Segment};
use crate::bounds::Box2;
use crate::cfg::SCALAR_EPSILON;
use crate::equations::solve_cubic;
use crate::scalars::inside;
use crate::vec::{Mat3, Vec2};

/// Extrema closer than this to an endpoint are not reported.
const INFLECTION_EPSILON: f64 = 1e-10;

/// Relative tolerance for [`QuadraticBezier2::length`].
const LENGTH_TOLERANCE: f64 = 1e-9;

/// Quadratic Bézier `p0 → p2` with control point `p1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadraticBezier2 {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
}

/// `sign` that maps zero to -1, as the nearest-point distance comparisons expect.
#[inline]
pub(super) fn nonzero_sign(n: f64) -> f64 {
    if n > 0.0 {
        1.0
    } else {
        -1.0
    }
}

impl QuadraticBezier2 {
    #[inline]
    pub const fn new(p0: Vec2, p1: Vec2, p2: Vec2) -> Self {
        Self { p0, p1, p2 }
    }

    #[inline]
    pub fn start(&self) -> Vec2 {
        self.p0
    }

    #[inline]
    pub fn end(&self) -> Vec2 {
        self.p2
    }

    pub fn position(&self, t: f64) -> Vec2 {
        if t == 0.0 {
            return self.p0;
        } else if t == 1.0 {
            return self.p2;
        }
        let mt = 1.0 - t;
        self.p0 * (mt * mt) + self.p1 * (2.0 * t * mt) + self.p2 * (t * t)
    }

    pub fn direction(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        (self.p1 - self.p0) * (2.0 * mt) + (self.p2 - self.p1) * (2.0 * t)
    }

    pub fn signed_area(&self) -> f64 {
        let (p0, p1, p2) = (self.p0, self.p1, self.p2);
        (2.0 * (p0.cross(p1) + p1.cross(p2)) + p0.cross(p2)) / 6.0
    }

    pub fn length(&self) -> f64 {
        gravesen_length(
            self,
            |c| {
                let chord = (c.p2 - c.p0).length();
                let polygon = (c.p1 - c.p0).length() + (c.p2 - c.p1).length();
                (chord, polygon)
            },
            2.0,
            LENGTH_TOLERANCE,
        )
    }

    pub fn is_flat(&self, epsilon: f64) -> bool {
        (signed_distance(self.p1, self.p0, self.p2) / 2.0).abs() < epsilon
    }

    /// Keeps the start tangent direction and places the new control point where
    /// it meets the end tangent through `end`. Parallel tangents fall back to the
    /// chord midpoint.
    pub fn endpoints(&self, start: Vec2, end: Vec2) -> QuadraticBezier2 {
        let ad = self.p1 - self.p0;
        let bd = self.p1 - self.p2;
        let d = end - start;
        let det = bd.x * ad.y - bd.y * ad.x;
        let u = (d.y * bd.x - d.x * bd.y) / det;
        if det.abs() < SCALAR_EPSILON || !u.is_finite() {
            return QuadraticBezier2::new(start, start.lerp(end, 0.5), end);
        }
        QuadraticBezier2::new(start, start + ad * u, end)
    }

    pub fn split(&self, t: f64) -> [QuadraticBezier2; 2] {
        assert!(t > 0.0 && t < 1.0, "split parameter {t} must lie in (0, 1)");
        let e = self.p0.lerp(self.p1, t);
        let f = self.p1.lerp(self.p2, t);
        let g = self.position(t);
        [QuadraticBezier2::new(self.p0, e, g), QuadraticBezier2::new(g, f, self.p2)]
    }

    pub fn nearest_point(&self, p: Vec2) -> f64 {
        let qa = self.p0 - p;
        let ab = self.p1 - self.p0;
        let bc = self.p2 - self.p1;
        let qc = self.p2 - p;
        let ac = self.p2 - self.p0;
        let br = self.p0 + self.p2 - self.p1 - self.p1;

        let mut min_distance = nonzero_sign(ab.cross(qa)) * qa.length();
        let mut param = -qa.dot(ab) / ab.dot(ab);
        let distance = nonzero_sign(bc.cross(qc)) * qc.length();
        if distance.abs() < min_distance.abs() {
            min_distance = distance;
            param = ((p - self.p1).dot(bc) / bc.dot(bc)).max(1.0);
        }

        let a = br.dot(br);
        let b = 3.0 * ab.dot(br);
        let c = 2.0 * ab.dot(ab) + qa.dot(br);
        let d = qa.dot(ab);
        for t in solve_cubic(a, b, c, d) {
            if t > 0.0 && t < 1.0 {
                let q = self.position(t) - p;
                let distance = nonzero_sign(ac.cross(q)) * q.length();
                if distance.abs() < min_distance.abs() {
                    min_distance = distance;
                    param = t;
                }
            }
        }
        param
    }

    pub fn bounds(&self) -> Box2 {
        super::bounds(self)
    }

    pub fn inflections(&self) -> Vec<f64> {
        let div = self.p0 - self.p1 * 2.0 + self.p2;
        if div == Vec2::ORIGIN {
            return Vec::new();
        }
        let v = (self.p0 - self.p1).div_elem(div);
        let mut ts: Vec<f64> = [v.x, v.y]
            .into_iter()
            .filter(|&t| inside(INFLECTION_EPSILON, t, 1.0 - INFLECTION_EPSILON))
            .collect();
        ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        ts.dedup();
        ts
    }

    pub fn subdivide(&self, error: f64) -> Vec<Vec2> {
        super::subdivide(
            self,
            |c| (c.p0.lerp(c.p2, 0.5) - c.p1).length_squared(),
            error * error,
        )
    }

    pub fn transform(&self, m: &Mat3) -> QuadraticBezier2 {
        QuadraticBezier2::new(self.p0.transform(m), self.p1.transform(m), self.p2.transform(m))
    }

    #[inline]
    pub fn reverse(&self) -> QuadraticBezier2 {
        QuadraticBezier2::new(self.p2, self.p1, self.p0)
    }

    /// Exact degree elevation.
    pub fn to_cubic(&self) -> super::CubicBezier2 {
        super::CubicBezier2::new(
            self.p0,
            self.p0.lerp(self.p1, 2.0 / 3.0),
            self.p2.lerp(self.p1, 2.0 / 3.0),
            self.p2,
        )
    }
}

impl Segment for QuadraticBezier2 {
    fn position(&self, t: f64) -> Vec2 {
        QuadraticBezier2::position(self, t)
    }
    fn split(&self, t: f64) -> [Self; 2] {
        QuadraticBezier2::split(self, t)
    }
    fn endpoints(&self, start: Vec2, end: Vec2) -> Self {
        QuadraticBezier2::endpoints(self, start, end)
    }
    fn inflections(&self) -> Vec<f64> {
        QuadraticBezier2::inflections(self)
    }
    fn start(&self) -> Vec2 {
        self.p0
    }
    fn end(&self) -> Vec2 {
        self.p2
    }
}
