//! Parametric curves: line segments, quadratic and cubic Béziers.
//!
//! Purpose
//! - `Curve2` is the sum type every higher layer (intersection, rings, regions)
//!   works with; the concrete variants carry their control points and the
//!   closed-form pieces (area, inflections, nearest point) that differ per degree.
//! - Parameter-space operations shared by all variants (`range`, `split_at`,
//!   `bounds`, error-driven `subdivide`) are written once over [`Segment`].
//!
//! Conventions
//! - `position(0)` and `position(1)` return the stored endpoints exactly, so
//!   split points computed through `position` agree bit-for-bit with the
//!   endpoints of the sub-curves produced by `split`/`range`.
//! - Curves are immutable values; every derived curve is a new value.

mod cubic;
mod line;
mod quadratic;
mod sampler;

pub use cubic::CubicBezier2;
pub use line::Line2;
pub use quadratic::QuadraticBezier2;
pub use sampler::{Sample, Samples};

use crate::bounds::Box2;
use crate::cfg::SamplerCfg;
use crate::vec::{Mat3, Vec2};

/// Halving depth cap for [`subdivide`]; a non-finite error metric would otherwise never settle.
const MAX_SUBDIVISION_DEPTH: u32 = 24;

/// Signed distance from `p` to the infinite line through `a` and `b`.
///
/// Positive on the left of `a → b`.
#[inline]
pub fn signed_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let d = b - a;
    (p.cross(d) + b.cross(a)) / d.length()
}

/// What the shared parameter-space algorithms need from a curve.
pub(crate) trait Segment: Sized + Copy {
    fn position(&self, t: f64) -> Vec2;
    fn split(&self, t: f64) -> [Self; 2];
    fn endpoints(&self, start: Vec2, end: Vec2) -> Self;
    fn inflections(&self) -> Vec<f64>;
    fn start(&self) -> Vec2;
    fn end(&self) -> Vec2;
}

/// The curve restricted to `[t0, t1]`, re-parameterized over `[0, 1]`.
pub(crate) fn range<C: Segment>(c: &C, t0: f64, t1: f64) -> C {
    assert!(t0 < t1, "range [{t0}, {t1}] must be non-empty and ordered");
    if t0 == 0.0 && t1 == 1.0 {
        *c
    } else if t0 == 0.0 {
        c.split(t1)[0]
    } else if t1 == 1.0 {
        c.split(t0)[1]
    } else {
        let [_, hi] = c.split(t0);
        let [mid, _] = hi.split((t1 - t0) / (1.0 - t0));
        mid.endpoints(c.position(t0), c.position(t1))
    }
}

/// Split at every distinct parameter of `ts` strictly inside `(0, 1)`.
pub(crate) fn split_at<C: Segment>(c: &C, ts: &[f64]) -> Vec<C> {
    let mut ts: Vec<f64> = ts.iter().copied().filter(|&t| t > 0.0 && t < 1.0).collect();
    ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    ts.dedup();
    match ts.len() {
        0 => vec![*c],
        1 => c.split(ts[0]).to_vec(),
        n => {
            let mut out = Vec::with_capacity(n + 1);
            out.push(range(c, 0.0, ts[0]));
            for w in ts.windows(2) {
                out.push(range(c, w[0], w[1]));
            }
            out.push(range(c, ts[n - 1], 1.0));
            out
        }
    }
}

/// Endpoints plus every axis extremum.
pub(crate) fn bounds<C: Segment>(c: &C) -> Box2 {
    c.inflections()
        .into_iter()
        .fold(Box2::new(c.start(), c.end()), |b, t| b.union_point(c.position(t)))
}

/// Halve until `error(piece) <= max_error`; returns the piece starts plus the final end.
pub(crate) fn subdivide<C: Segment>(c: &C, error: impl Fn(&C) -> f64, max_error: f64) -> Vec<Vec2> {
    let mut points = Vec::new();
    let mut stack = vec![(*c, 0u32)];
    while let Some((piece, depth)) = stack.pop() {
        if depth >= MAX_SUBDIVISION_DEPTH || error(&piece) <= max_error {
            points.push(piece.start());
        } else {
            let [lo, hi] = piece.split(0.5);
            stack.push((hi, depth + 1));
            stack.push((lo, depth + 1));
        }
    }
    points.push(c.end());
    points
}

/// Curve length by Gravesen's estimate: a weighted mean of chord and control
/// polygon, subdividing until the two agree to `tolerance` (relative).
pub(crate) fn gravesen_length<C: Segment>(
    c: &C,
    hull: impl Fn(&C) -> (f64, f64),
    degree: f64,
    tolerance: f64,
) -> f64 {
    const MAX_DEPTH: u32 = 16;
    let mut total = 0.0;
    let mut stack = vec![(*c, 0u32)];
    while let Some((piece, depth)) = stack.pop() {
        let (chord, polygon) = hull(&piece);
        if depth >= MAX_DEPTH || polygon - chord <= tolerance * polygon.max(f64::MIN_POSITIVE) {
            total += (2.0 * chord + (degree - 1.0) * polygon) / (degree + 1.0);
        } else {
            let [lo, hi] = piece.split(0.5);
            stack.push((hi, depth + 1));
            stack.push((lo, depth + 1));
        }
    }
    total
}

/// A line segment, quadratic or cubic Bézier.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Curve2 {
    Line(Line2),
    Quadratic(QuadraticBezier2),
    Cubic(CubicBezier2),
}

macro_rules! each {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            Curve2::Line($c) => $body,
            Curve2::Quadratic($c) => $body,
            Curve2::Cubic($c) => $body,
        }
    };
}

macro_rules! each_wrap {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            Curve2::Line($c) => Curve2::Line($body),
            Curve2::Quadratic($c) => Curve2::Quadratic($body),
            Curve2::Cubic($c) => Curve2::Cubic($body),
        }
    };
}

/// Line segment from `p0` to `p1`.
#[inline]
pub fn line(p0: Vec2, p1: Vec2) -> Curve2 {
    Curve2::Line(Line2::new(p0, p1))
}

/// Quadratic Bézier with control point `p1`.
#[inline]
pub fn quadratic(p0: Vec2, p1: Vec2, p2: Vec2) -> Curve2 {
    Curve2::Quadratic(QuadraticBezier2::new(p0, p1, p2))
}

/// Cubic Bézier with control points `p1`, `p2`.
#[inline]
pub fn cubic(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Curve2 {
    Curve2::Cubic(CubicBezier2::new(p0, p1, p2, p3))
}

impl Curve2 {
    #[inline]
    pub fn start(&self) -> Vec2 {
        each!(self, c => c.p0)
    }

    #[inline]
    pub fn end(&self) -> Vec2 {
        each!(self, c => Segment::end(c))
    }

    /// Position at `t`; `t` may lie outside `[0, 1]`.
    #[inline]
    pub fn position(&self, t: f64) -> Vec2 {
        each!(self, c => c.position(t))
    }

    /// Unnormalized tangent at `t`.
    #[inline]
    pub fn direction(&self, t: f64) -> Vec2 {
        each!(self, c => c.direction(t))
    }

    /// Area between the curve and the origin; summed over a ring this is the
    /// ring's signed area (positive for counterclockwise).
    pub fn signed_area(&self) -> f64 {
        each!(self, c => c.signed_area())
    }

    pub fn length(&self) -> f64 {
        each!(self, c => c.length())
    }

    /// Whether the curve deviates from its chord by less than `epsilon`.
    pub fn is_flat(&self, epsilon: f64) -> bool {
        each!(self, c => c.is_flat(epsilon))
    }

    /// Same shape with the endpoints moved, keeping the end tangents.
    pub fn endpoints(&self, start: Vec2, end: Vec2) -> Curve2 {
        each_wrap!(self, c => c.endpoints(start, end))
    }

    /// Split at `t`, which must lie in `(0, 1)`.
    pub fn split(&self, t: f64) -> [Curve2; 2] {
        match self {
            Curve2::Line(c) => c.split(t).map(Curve2::Line),
            Curve2::Quadratic(c) => c.split(t).map(Curve2::Quadratic),
            Curve2::Cubic(c) => c.split(t).map(Curve2::Cubic),
        }
    }

    /// Split at each distinct parameter in `(0, 1)`; `0` and `1` are ignored.
    pub fn split_at(&self, ts: &[f64]) -> Vec<Curve2> {
        match self {
            Curve2::Line(c) => split_at(c, ts).into_iter().map(Curve2::Line).collect(),
            Curve2::Quadratic(c) => split_at(c, ts).into_iter().map(Curve2::Quadratic).collect(),
            Curve2::Cubic(c) => split_at(c, ts).into_iter().map(Curve2::Cubic).collect(),
        }
    }

    /// The sub-curve over `[t0, t1]`. Panics unless `t0 < t1`.
    pub fn range(&self, t0: f64, t1: f64) -> Curve2 {
        each_wrap!(self, c => range(c, t0, t1))
    }

    /// Parameter of the closest point to `p`; may lie outside `[0, 1]`.
    pub fn nearest_point(&self, p: Vec2) -> f64 {
        each!(self, c => c.nearest_point(p))
    }

    pub fn bounds(&self) -> Box2 {
        each!(self, c => bounds(c))
    }

    /// Parameters in `(0, 1)` where one coordinate reaches an extremum.
    /// Between consecutive values the curve is monotonic in both axes.
    pub fn inflections(&self) -> Vec<f64> {
        each!(self, c => Segment::inflections(c))
    }

    /// Polyline through the curve whose control-point deviation stays under `error`.
    pub fn subdivide(&self, error: f64) -> Vec<Vec2> {
        each!(self, c => c.subdivide(error))
    }

    pub fn transform(&self, m: &Mat3) -> Curve2 {
        each_wrap!(self, c => c.transform(m))
    }

    pub fn reverse(&self) -> Curve2 {
        each_wrap!(self, c => c.reverse())
    }

    /// Parameter pairs `(t0, t1)` where `self` and `other` meet.
    pub fn intersections(&self, other: &Curve2) -> Vec<Vec2> {
        crate::intersect::intersections(self, other)
    }

    /// Lazy adaptive sampling within `distance_tolerance`.
    pub fn sample(&self, distance_tolerance: f64) -> Samples {
        Samples::new(self, &SamplerCfg::with_tolerance(distance_tolerance))
    }

    pub fn sample_with(&self, cfg: &SamplerCfg) -> Samples {
        Samples::new(self, cfg)
    }

    pub fn adaptive_positions(&self, distance_tolerance: f64) -> Vec<Vec2> {
        self.sample(distance_tolerance).map(|s| s.position).collect()
    }

    pub fn adaptive_positions_and_directions(&self, distance_tolerance: f64) -> Vec<(Vec2, Vec2)> {
        self.sample(distance_tolerance)
            .map(|s| (s.position, s.direction))
            .collect()
    }

    pub fn adaptive_positions_with_t(&self, distance_tolerance: f64) -> Vec<(Vec2, f64)> {
        self.sample(distance_tolerance).map(|s| (s.position, s.t)).collect()
    }
}

impl Segment for Curve2 {
    fn position(&self, t: f64) -> Vec2 {
        Curve2::position(self, t)
    }
    fn split(&self, t: f64) -> [Self; 2] {
        Curve2::split(self, t)
    }
    fn endpoints(&self, start: Vec2, end: Vec2) -> Self {
        Curve2::endpoints(self, start, end)
    }
    fn inflections(&self) -> Vec<f64> {
        Curve2::inflections(self)
    }
    fn start(&self) -> Vec2 {
        Curve2::start(self)
    }
    fn end(&self) -> Vec2 {
        Curve2::end(self)
    }
}

impl From<Line2> for Curve2 {
    fn from(c: Line2) -> Self {
        Curve2::Line(c)
    }
}

impl From<QuadraticBezier2> for Curve2 {
    fn from(c: QuadraticBezier2) -> Self {
        Curve2::Quadratic(c)
    }
}

impl From<CubicBezier2> for Curve2 {
    fn from(c: CubicBezier2) -> Self {
        Curve2::Cubic(c)
    }
}

#[cfg(test)]
mod tests;
