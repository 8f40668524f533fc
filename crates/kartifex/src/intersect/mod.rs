//! Pairwise curve intersection.
//!
//! Purpose
//! - `intersections(a, b)` returns every parameter pair `(t0, t1) ∈ [0, 1]²`
//!   (packed into a `Vec2` as `x = t0`, `y = t1`) where the curves meet,
//!   sorted by `t0` with near-duplicates merged.
//!
//! Strategy
//! - Bounding boxes (expanded by `SPATIAL_EPSILON`) cull disjoint pairs.
//! - Any pair involving a line is solved in closed form ([`analytic`]).
//! - Curve/curve pairs use Bézier fat-line clipping ([`fatline`]) or
//!   recursive subdivision ([`subdivision`]). The two disagree on some
//!   near-tangent inputs; fat-line clipping is the default, the `subdivision`
//!   cargo feature flips it. Both remain callable via [`intersections_with`].
//! - Both iterative strategies check once, after 32 rounds, whether the curves
//!   overlap along a stretch and if so report the overlap endpoints.

pub mod analytic;
pub mod fatline;
pub mod subdivision;

use crate::bounds::Box2;
use crate::cfg::{INTERSECTION_DEDUP_EPSILON, MAX_CUBIC_CUBIC_INTERSECTIONS, PARAMETRIC_EPSILON, SCALAR_EPSILON, SPATIAL_EPSILON};
use crate::curve::Curve2;
use crate::scalars::{lerp, round_unit};
use crate::vec::Vec2;

/// Rounds before the iterative strategies test for overlapping curves.
pub(crate) const COLLINEAR_CHECK_ITERATIONS: usize = 32;

/// Parameter square `[0, 1]²`.
pub(crate) const PARAMETRIC_BOUNDS: Box2 = Box2 {
    lx: 0.0,
    ly: 0.0,
    ux: 1.0,
    uy: 1.0,
};

/// Curve/curve intersection algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Sederberg's Bézier clipping with quantized sub-ranges.
    FatLine,
    /// Halving monotonic pieces until flat, then intersecting chords.
    Subdivision,
}

impl Default for Strategy {
    fn default() -> Self {
        if cfg!(feature = "subdivision") {
            Strategy::Subdivision
        } else {
            Strategy::FatLine
        }
    }
}

/// Intersections with the default [`Strategy`].
pub fn intersections(a: &Curve2, b: &Curve2) -> Vec<Vec2> {
    intersections_with(a, b, Strategy::default())
}

pub fn intersections_with(a: &Curve2, b: &Curve2, strategy: Strategy) -> Vec<Vec2> {
    if is_point(a) || is_point(b) {
        tracing::trace!("skipping zero-length curve");
        return Vec::new();
    }
    if !a.bounds().expand(SPATIAL_EPSILON).intersects(&b.bounds()) {
        return Vec::new();
    }
    match (a, b) {
        (Curve2::Line(l), _) => normalize(analytic::line_curve(l, b)),
        (_, Curve2::Line(l)) => {
            let mut result: Vec<Vec2> = normalize(analytic::line_curve(l, a))
                .into_iter()
                .map(Vec2::swap)
                .collect();
            sort_by_t0(&mut result);
            result
        }
        _ => match strategy {
            Strategy::FatLine => fatline::curve_curve(a, b),
            Strategy::Subdivision => subdivision::curve_curve(a, b),
        },
    }
}

fn is_point(c: &Curve2) -> bool {
    let b = c.bounds();
    b.width() < SCALAR_EPSILON && b.height() < SCALAR_EPSILON
}

fn sort_by_t0(v: &mut [Vec2]) {
    v.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
}

fn sort_by_t1(v: &mut [Vec2]) {
    v.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal));
}

/// Snap parameters near 0/1, drop pairs outside `[0, 1]²`, merge duplicates on
/// either parameter and sort by `t0`.
pub fn normalize(intersections: Vec<Vec2>) -> Vec<Vec2> {
    let mut result: Vec<Vec2> = intersections
        .into_iter()
        .map(|i| i.map(|n| round_unit(n, PARAMETRIC_EPSILON)))
        .filter(|&i| PARAMETRIC_BOUNDS.contains(i))
        .collect();
    if result.len() > 1 {
        sort_by_t1(&mut result);
        result.dedup_by(|i, kept| (i.y - kept.y).abs() < INTERSECTION_DEDUP_EPSILON);
    }
    if result.len() > 1 {
        sort_by_t0(&mut result);
        result.dedup_by(|i, kept| (i.x - kept.x).abs() < INTERSECTION_DEDUP_EPSILON);
    }
    result
}

/// Overlap endpoints of two curves assumed to lie on top of each other.
///
/// For each end of `a` the nearest parameter on `b` is taken; an end hanging
/// past `b` is replaced by the matching end of `b` projected onto `a`.
pub fn collinear_intersection(a: &Curve2, b: &Curve2) -> Vec<Vec2> {
    let mut result = Vec::with_capacity(2);
    for i in [0.0, 1.0] {
        let tb = b.nearest_point(a.position(i));
        if tb <= 0.0 {
            // a overhangs the start of b
            let s = round_unit(a.nearest_point(b.start()), PARAMETRIC_EPSILON);
            if (0.0..=1.0).contains(&s) {
                result.push(Vec2::new(s, 0.0));
            }
        } else if tb >= 1.0 {
            // a overhangs the end of b
            let s = round_unit(a.nearest_point(b.end()), PARAMETRIC_EPSILON);
            if (0.0..=1.0).contains(&s) {
                result.push(Vec2::new(s, 1.0));
            }
        } else {
            result.push(Vec2::new(i, tb));
        }
    }
    if result.len() == 2 && Vec2::approx_eq(result[0], result[1], PARAMETRIC_EPSILON) {
        result.pop();
    }
    result
}

/// Whether `a` and `b` coincide between the two pairs of `is`.
pub(crate) fn is_collinear(a: &Curve2, b: &Curve2, is: &[Vec2]) -> bool {
    if is.len() != 2 {
        return false;
    }
    let n = MAX_CUBIC_CUBIC_INTERSECTIONS;
    (0..=n).all(|i| {
        let t = i as f64 / n as f64;
        let pa = a.position(lerp(is[0].x, is[1].x, t));
        let pb = b.position(lerp(is[0].y, is[1].y, t));
        Vec2::approx_eq(pa, pb, SPATIAL_EPSILON)
    })
}
