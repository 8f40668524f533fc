//! Closed-form intersections of a line segment with lines, quadratics and cubics.
//!
//! Results are raw `(s, t)` pairs (line parameter, curve parameter); callers
//! filter and dedupe them with [`super::normalize`].

use super::collinear_intersection;
use crate::cfg::SPATIAL_EPSILON;
use crate::curve::{CubicBezier2, Curve2, Line2, QuadraticBezier2};
use crate::equations::{solve_cubic, solve_quadratic};
use crate::vec::Vec2;

/// Cross products below this count as parallel.
const PARALLEL_EPSILON: f64 = 1e-6;

/// `signum` with `0 ↦ 0`.
#[inline]
fn sign(n: f64) -> f64 {
    if n > 0.0 {
        1.0
    } else if n < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Line against any curve. Flat curves are intersected through their chord and
/// the curve parameter is recovered by projection.
pub fn line_curve(a: &Line2, b: &Curve2) -> Vec<Vec2> {
    match b {
        Curve2::Line(l) => line_line(a, l),
        _ if b.is_flat(SPATIAL_EPSILON) => line_line(a, &Line2::new(b.start(), b.end()))
            .into_iter()
            .map(|i| Vec2::new(i.x, b.nearest_point(a.position(i.x))))
            .collect(),
        Curve2::Quadratic(q) => line_quadratic(a, q),
        Curve2::Cubic(c) => line_cubic(a, c),
    }
}

/// Segment/segment intersection. Near-parallel segments that overlap report
/// the overlap endpoints.
pub fn line_line(a: &Line2, b: &Line2) -> Vec<Vec2> {
    let av = a.p1 - a.p0;
    let bv = b.p1 - b.p0;
    let d = av.cross(bv);
    if d.abs() < PARALLEL_EPSILON {
        let ca = Curve2::Line(*a);
        let cb = Curve2::Line(*b);
        let ints = collinear_intersection(&ca, &cb);
        if ints
            .iter()
            .all(|v| Vec2::approx_eq(a.position(v.x), b.position(v.y), SPATIAL_EPSILON))
        {
            return ints;
        } else if d == 0.0 {
            return Vec::new();
        }
    }
    let asb = a.p0 - b.p0;
    let s = bv.cross(asb) / d;
    let t = av.cross(asb) / d;
    vec![Vec2::new(s, t)]
}

/// Substitutes the quadratic into the line's implicit equation.
pub fn line_quadratic(p: &Line2, q: &QuadraticBezier2) -> Vec<Vec2> {
    // (p0 - 2p1 + p2) t² + (-2p0 + 2p1) t + p0
    let a = q.p0 - q.p1 * 2.0 + q.p2;
    let b = q.p0 * -2.0 + q.p1 * 2.0;
    let c = q.p0;
    let dir = p.p1 - p.p0;
    let n = Vec2::new(-dir.y, dir.x);
    let roots = solve_quadratic(n.dot(a), n.dot(b), n.dot(c) + p.p0.cross(p.p1));

    // projection onto the whole direction, exact for lines of any slope
    let dir_sq = dir.length_squared();
    roots
        .into_iter()
        .map(|t| Vec2::new((q.position(t) - p.p0).dot(dir) / dir_sq, t))
        .collect()
}

/// Substitutes the cubic into the line's implicit equation.
pub fn line_cubic(p: &Line2, q: &CubicBezier2) -> Vec<Vec2> {
    // (-p0 + 3p1 - 3p2 + p3) t³ + (3p0 - 6p1 + 3p2) t² + (-3p0 + 3p1) t + p0
    let a = -q.p0 + q.p1 * 3.0 - q.p2 * 3.0 + q.p3;
    let b = q.p0 * 3.0 - q.p1 * 6.0 + q.p2 * 3.0;
    let c = q.p0 * -3.0 + q.p1 * 3.0;
    let d = q.p0;
    let dir = p.p1 - p.p0;
    let dir_len = dir.length();
    let n = Vec2::new(-dir.y, dir.x);
    let roots = solve_cubic(n.dot(a), n.dot(b), n.dot(c), n.dot(d) + p.p0.cross(p.p1));

    roots
        .into_iter()
        .map(|t| {
            let v = q.position(t) - p.p0;
            let s = v.length() / dir_len * sign(dir.dot(v));
            Vec2::new(s, t)
        })
        .collect()
}
