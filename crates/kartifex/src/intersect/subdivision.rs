//! Curve/curve intersection by recursive halving.
//!
//! Slow but simple: monotonic pieces are halved until flat (or tiny), then
//! their chords are intersected.

use super::analytic::line_line;
use super::{collinear_intersection, is_collinear, normalize, COLLINEAR_CHECK_ITERATIONS, PARAMETRIC_BOUNDS};
use crate::bounds::Box2;
use crate::cfg::{PARAMETRIC_EPSILON, SPATIAL_EPSILON};
use crate::curve::{Curve2, Line2};
use crate::vec::Vec2;

const MAX_ITERATIONS: usize = 1 << 18;

/// A monotonic stretch `[t_lo, t_hi]` of a curve with cached end positions.
#[derive(Clone, Copy, Debug)]
pub struct CurveInterval {
    pub curve: Curve2,
    pub t_lo: f64,
    pub t_hi: f64,
    pub p_lo: Vec2,
    pub p_hi: Vec2,
    pub is_flat: bool,
}

impl CurveInterval {
    pub fn new(curve: &Curve2, t_lo: f64, t_hi: f64, p_lo: Vec2, p_hi: Vec2) -> Self {
        let is_flat = Vec2::approx_eq(p_lo, p_hi, SPATIAL_EPSILON)
            || t_hi - t_lo < PARAMETRIC_EPSILON
            || curve.range(t_lo, t_hi).is_flat(SPATIAL_EPSILON);
        Self {
            curve: *curve,
            t_lo,
            t_hi,
            p_lo,
            p_hi,
            is_flat,
        }
    }

    /// One interval per monotonic piece of `c`.
    pub fn from_curve(c: &Curve2) -> Vec<CurveInterval> {
        let ts = c.inflections();
        let bounds: Vec<f64> = std::iter::once(0.0).chain(ts).chain(std::iter::once(1.0)).collect();
        bounds
            .windows(2)
            .map(|w| CurveInterval::new(c, w[0], w[1], c.position(w[0]), c.position(w[1])))
            .collect()
    }

    pub fn bounds(&self) -> Box2 {
        Box2::new(self.p_lo, self.p_hi)
    }

    pub fn intersects(&self, o: &CurveInterval) -> bool {
        self.bounds().expand(SPATIAL_EPSILON).intersects(&o.bounds())
    }

    pub fn split(&self) -> Vec<CurveInterval> {
        if self.is_flat {
            return vec![*self];
        }
        let t_mid = (self.t_lo + self.t_hi) / 2.0;
        let p_mid = self.curve.position(t_mid);
        vec![
            CurveInterval::new(&self.curve, self.t_lo, t_mid, self.p_lo, p_mid),
            CurveInterval::new(&self.curve, t_mid, self.t_hi, p_mid, self.p_hi),
        ]
    }

    /// Chord/chord hits mapped back to curve parameters.
    pub fn intersections(&self, o: &CurveInterval, acc: &mut Vec<Vec2>) {
        let hits = line_line(&Line2::new(self.p_lo, self.p_hi), &Line2::new(o.p_lo, o.p_hi));
        let lo = Vec2::new(self.t_lo, o.t_lo);
        let hi = Vec2::new(self.t_hi, o.t_hi);
        for i in hits {
            if PARAMETRIC_BOUNDS.expand(PARAMETRIC_EPSILON).contains(i) {
                acc.push(lo.lerp_vec(hi, i));
            }
        }
    }
}

pub fn curve_curve(a: &Curve2, b: &Curve2) -> Vec<Vec2> {
    let bs = CurveInterval::from_curve(b);
    let mut queue: Vec<(CurveInterval, CurveInterval)> = CurveInterval::from_curve(a)
        .into_iter()
        .flat_map(|ap| bs.iter().map(move |bp| (ap, *bp)))
        .collect();

    let mut collinear_checked = false;
    let mut iterations = 0;
    let mut acc = Vec::new();
    while let Some((ca, cb)) = queue.pop() {
        if iterations > COLLINEAR_CHECK_ITERATIONS && !collinear_checked {
            collinear_checked = true;
            let is = collinear_intersection(a, b);
            if is_collinear(a, b, &is) {
                tracing::trace!("curves overlap; reporting overlap endpoints");
                return normalize(is);
            }
        }
        if iterations > MAX_ITERATIONS {
            tracing::trace!(iterations, "subdivision did not converge");
            break;
        }
        iterations += 1;

        if !ca.intersects(&cb) {
            continue;
        }
        if ca.is_flat && cb.is_flat {
            ca.intersections(&cb, &mut acc);
        } else {
            for ap in ca.split() {
                for bp in cb.split() {
                    queue.push((ap, bp));
                }
            }
        }
    }
    normalize(acc)
}
