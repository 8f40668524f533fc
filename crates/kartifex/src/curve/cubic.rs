use super::quadratic::nonzero_sign;
use super::{gravesen_length, range, signed_distance, QuadraticBezier2, Segment};
use crate::bounds::Box2;
use crate::cfg::SCALAR_EPSILON;
use crate::equations::solve_quadratic;
use crate::scalars::inside;
use crate::vec::{Mat3, Vec2};

/// Some near-degenerate cubics need the coarser bound.
const INFLECTION_EPSILON: f64 = 1e-7;

const LENGTH_TOLERANCE: f64 = 1e-9;

/// Newton restarts for [`CubicBezier2::nearest_point`], spread evenly over `[0, 1]`.
const SEARCH_STARTS: usize = 4;
const SEARCH_STEPS: usize = 8;

/// Parameter width below which [`CubicBezier2::approximate`] stops halving.
const MIN_APPROXIMATION_SPAN: f64 = 1e-6;

/// Cubic Bézier `p0 → p3` with control points `p1`, `p2`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezier2 {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl CubicBezier2 {
    #[inline]
    pub const fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    #[inline]
    pub fn start(&self) -> Vec2 {
        self.p0
    }

    #[inline]
    pub fn end(&self) -> Vec2 {
        self.p3
    }

    pub fn position(&self, t: f64) -> Vec2 {
        if t == 0.0 {
            return self.p0;
        } else if t == 1.0 {
            return self.p3;
        }
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let t2 = t * t;
        self.p0 * (mt2 * mt) + self.p1 * (3.0 * mt2 * t) + self.p2 * (3.0 * mt * t2) + self.p3 * (t2 * t)
    }

    pub fn direction(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        (self.p1 - self.p0) * (3.0 * mt * mt)
            + (self.p2 - self.p1) * (6.0 * mt * t)
            + (self.p3 - self.p2) * (3.0 * t * t)
    }

    pub fn signed_area(&self) -> f64 {
        let (p0, p1, p2, p3) = (self.p0, self.p1, self.p2, self.p3);
        (p3.x * (-p0.y - 3.0 * p1.y - 6.0 * p2.y) - 3.0 * p2.x * (p0.y + p1.y - 2.0 * p3.y)
            + 3.0 * p1.x * (-2.0 * p0.y + p2.y + p3.y)
            + p0.x * (6.0 * p1.y + 3.0 * p2.y + p3.y))
            / 20.0
    }

    pub fn length(&self) -> f64 {
        gravesen_length(
            self,
            |c| {
                let chord = (c.p3 - c.p0).length();
                let polygon = (c.p1 - c.p0).length() + (c.p2 - c.p1).length() + (c.p3 - c.p2).length();
                (chord, polygon)
            },
            3.0,
            LENGTH_TOLERANCE,
        )
    }

    /// Sederberg's fat-line bound on the distance of the curve from its chord.
    pub fn is_flat(&self, epsilon: f64) -> bool {
        let d1 = signed_distance(self.p1, self.p0, self.p3);
        let d2 = signed_distance(self.p2, self.p0, self.p3);
        let k = if d1 * d2 < 0.0 { 4.0 / 9.0 } else { 3.0 / 4.0 };
        (d1 * k).abs() < epsilon && (d2 * k).abs() < epsilon
    }

    /// Translates each control point along with its endpoint.
    pub fn endpoints(&self, start: Vec2, end: Vec2) -> CubicBezier2 {
        CubicBezier2::new(start, self.p1 + (start - self.p0), self.p2 + (end - self.p3), end)
    }

    pub fn split(&self, t: f64) -> [CubicBezier2; 2] {
        assert!(t > 0.0 && t < 1.0, "split parameter {t} must lie in (0, 1)");
        let e = self.p0.lerp(self.p1, t);
        let f = self.p1.lerp(self.p2, t);
        let g = self.p2.lerp(self.p3, t);
        let h = e.lerp(f, t);
        let j = f.lerp(g, t);
        let k = self.position(t);
        [CubicBezier2::new(self.p0, e, h, k), CubicBezier2::new(k, j, g, self.p3)]
    }

    /// Closest-point search by Newton iteration from several starts; the end
    /// overhangs report parameters outside `[0, 1]`.
    pub fn nearest_point(&self, p: Vec2) -> f64 {
        let qa = self.p0 - p;
        let ab = self.p1 - self.p0;
        let bc = self.p2 - self.p1;
        let cd = self.p3 - self.p2;
        let qd = self.p3 - p;
        let br = bc - ab;
        let a_s = cd - bc - br;

        let mut min_distance = nonzero_sign(ab.cross(qa)) * qa.length();
        let mut param = -qa.dot(ab) / ab.dot(ab);
        let distance = nonzero_sign(cd.cross(qd)) * qd.length();
        if distance.abs() < min_distance.abs() {
            min_distance = distance;
            param = ((p - self.p2).dot(cd) / cd.dot(cd)).max(1.0);
        }

        for i in 0..SEARCH_STARTS {
            let mut t = i as f64 / (SEARCH_STARTS - 1) as f64;
            for step in 0..=SEARCH_STEPS {
                let qpt = self.position(t) - p;
                let distance = nonzero_sign(self.direction(t).cross(qpt)) * qpt.length();
                if distance.abs() < min_distance.abs() {
                    min_distance = distance;
                    param = t;
                }
                if step == SEARCH_STEPS {
                    break;
                }
                let d1 = a_s * (3.0 * t * t) + br * (6.0 * t) + ab * 3.0;
                let d2 = a_s * (6.0 * t) + br * 6.0;
                let dt = qpt.dot(d1) / (d1.dot(d1) + qpt.dot(d2));
                if dt.abs() < SCALAR_EPSILON {
                    break;
                }
                t -= dt;
                if !(0.0..=1.0).contains(&t) {
                    break;
                }
            }
        }
        param
    }

    pub fn bounds(&self) -> Box2 {
        super::bounds(self)
    }

    pub fn inflections(&self) -> Vec<f64> {
        // derivative / 3 = a2·t² + a1·t + a0, per axis
        let a0 = self.p1 - self.p0;
        let a1 = (self.p2 - self.p1 - a0) * 2.0;
        let a2 = self.p3 - self.p2 * 3.0 + self.p1 * 3.0 - self.p0;
        let mut ts: Vec<f64> = solve_quadratic(a2.x, a1.x, a0.x)
            .into_iter()
            .chain(solve_quadratic(a2.y, a1.y, a0.y))
            .filter(|&t| inside(INFLECTION_EPSILON, t, 1.0 - INFLECTION_EPSILON))
            .collect();
        ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        ts.dedup();
        ts
    }

    pub fn subdivide(&self, error: f64) -> Vec<Vec2> {
        super::subdivide(
            self,
            |c| {
                let d1 = (c.p0.lerp(c.p3, 1.0 / 3.0) - c.p1).length_squared();
                let d2 = (c.p0.lerp(c.p3, 2.0 / 3.0) - c.p2).length_squared();
                d1.max(d2)
            },
            error * error,
        )
    }

    pub fn transform(&self, m: &Mat3) -> CubicBezier2 {
        CubicBezier2::new(
            self.p0.transform(m),
            self.p1.transform(m),
            self.p2.transform(m),
            self.p3.transform(m),
        )
    }

    #[inline]
    pub fn reverse(&self) -> CubicBezier2 {
        CubicBezier2::new(self.p3, self.p2, self.p1, self.p0)
    }

    /// Squared upper bound on the distance between this cubic and [`Self::to_quadratic`].
    ///
    /// The deviation is `√3/36 · |p3 - 3p2 + 3p1 - p0|`.
    fn quadratic_error(&self) -> f64 {
        (self.p3 - self.p2 * 3.0 + self.p1 * 3.0 - self.p0).length_squared() / 432.0
    }

    /// Single quadratic sharing the endpoints, control point at `(3(p1 + p2) - (p0 + p3)) / 4`.
    pub fn to_quadratic(&self) -> QuadraticBezier2 {
        let p1 = ((self.p1 + self.p2) * 3.0 - (self.p0 + self.p3)) / 4.0;
        QuadraticBezier2::new(self.p0, p1, self.p3)
    }

    /// Quadratics within `error` of this cubic, in parameter order.
    pub fn approximate(&self, error: f64) -> Vec<QuadraticBezier2> {
        let threshold = error * error;
        let mut result = Vec::new();
        let mut spans = vec![(0.0, 1.0)];
        while let Some((t0, t1)) = spans.pop() {
            let c = range(self, t0, t1);
            if t1 - t0 < MIN_APPROXIMATION_SPAN || c.quadratic_error() <= threshold {
                result.push(c.to_quadratic());
            } else {
                let mid = (t0 + t1) / 2.0;
                spans.push((mid, t1));
                spans.push((t0, mid));
            }
        }
        result
    }
}

impl Segment for CubicBezier2 {
    fn position(&self, t: f64) -> Vec2 {
        CubicBezier2::position(self, t)
    }
    fn split(&self, t: f64) -> [Self; 2] {
        CubicBezier2::split(self, t)
    }
    fn endpoints(&self, start: Vec2, end: Vec2) -> Self {
        CubicBezier2::endpoints(self, start, end)
    }
    fn inflections(&self) -> Vec<f64> {
        CubicBezier2::inflections(self)
    }
    fn start(&self) -> Vec2 {
        self.p0
    }
    fn end(&self) -> Vec2 {
        self.p3
    }
}
