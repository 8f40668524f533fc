//! Curve/curve intersection by Bézier clipping (Sederberg & Nishita, "Curve
//! intersection using Bézier clipping", 1990).
//!
//! Each curve is bounded by a "fat line": its chord widened to enclose the
//! control polygon. Alternately, each curve's control hull (in signed-distance
//! space of the other's chord) is clipped against the other's fat line, which
//! shrinks the candidate parameter range. When clipping stalls the ranges are
//! halved.
//!
//! As published the method over-clips once one range gets tiny, missing
//! intersections. Sub-ranges are therefore quantized to
//! `FAT_LINE_PARAMETRIC_RESOLUTION` and fat lines widened by
//! `FAT_LINE_SPATIAL_EPSILON`.

use super::{collinear_intersection, is_collinear, normalize, COLLINEAR_CHECK_ITERATIONS, PARAMETRIC_BOUNDS};
use crate::bounds::{Box2, Interval};
use crate::cfg::{FAT_LINE_PARAMETRIC_RESOLUTION, FAT_LINE_SPATIAL_EPSILON, PARAMETRIC_EPSILON, SPATIAL_EPSILON};
use crate::curve::{signed_distance, Curve2, Line2};
use crate::scalars::lerp;
use crate::vec::Vec2;

/// Pairs whose clipping shrinks neither range below this ratio are halved instead.
const SPLIT_RATIO: f64 = 0.8;

/// Chord/chord hits are kept this far outside the unit square.
const CHORD_SLACK: f64 = 0.1;

/// Hard cap on clipping rounds; never reached on finite input.
const MAX_ITERATIONS: usize = 1 << 16;

/// Signed-distance band `[lo, hi]` around the chord that contains the curve.
pub fn fat_line_width(c: &Curve2) -> Interval {
    match c {
        Curve2::Line(_) => Interval::new(0.0, 0.0),
        Curve2::Quadratic(b) => Interval::new(0.0, signed_distance(b.p1, b.p0, b.p2) / 2.0),
        Curve2::Cubic(b) => {
            let d1 = signed_distance(b.p1, b.p0, b.p3);
            let d2 = signed_distance(b.p2, b.p0, b.p3);
            let k = if d1 * d2 < 0.0 { 4.0 / 9.0 } else { 3.0 / 4.0 };
            Interval::new(0.0_f64.min(d1.min(d2)) * k, 0.0_f64.max(d1.max(d2)) * k)
        }
    }
}

/// Closed convex hull of `c`'s control points in `(t, distance to a→b)` space.
pub fn convex_hull(a: Vec2, b: Vec2, c: &Curve2) -> Vec<Vec2> {
    match c {
        Curve2::Line(l) => {
            let p0 = Vec2::new(0.0, signed_distance(l.p0, a, b));
            let p1 = Vec2::new(1.0, signed_distance(l.p1, a, b));
            vec![p0, p1, p0]
        }
        Curve2::Quadratic(q) => {
            let p0 = Vec2::new(0.0, signed_distance(q.p0, a, b));
            let p1 = Vec2::new(0.5, signed_distance(q.p1, a, b));
            let p2 = Vec2::new(1.0, signed_distance(q.p2, a, b));
            vec![p0, p1, p2, p0]
        }
        Curve2::Cubic(q) => {
            let p0 = Vec2::new(0.0, signed_distance(q.p0, a, b));
            let p1 = Vec2::new(1.0 / 3.0, signed_distance(q.p1, a, b));
            let p2 = Vec2::new(2.0 / 3.0, signed_distance(q.p2, a, b));
            let p3 = Vec2::new(1.0, signed_distance(q.p3, a, b));
            let d1 = signed_distance(p1, p0, p3);
            let d2 = signed_distance(p2, p0, p3);
            if d1 * d2 < 0.0 {
                vec![p0, p1, p3, p2, p0]
            } else {
                let k = d1 / d2;
                if k >= 2.0 {
                    vec![p0, p1, p3, p0]
                } else if k <= 0.5 {
                    vec![p0, p2, p3, p0]
                } else {
                    vec![p0, p1, p2, p3, p0]
                }
            }
        }
    }
}

/// Parameter range of the hull lying inside the band `fat_line`.
pub fn clip_hull(fat_line: Interval, hull: &[Vec2]) -> Interval {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in &hull[..hull.len() - 1] {
        if fat_line.contains(p.y) {
            lo = lo.min(p.x);
            hi = hi.max(p.x);
        }
    }
    for y in [fat_line.lo, fat_line.hi] {
        for w in hull.windows(2) {
            let (a, b) = (w[0], w[1]);
            if Interval::new(a.y, b.y).contains(y) {
                if a.y == b.y {
                    lo = lo.min(a.x.min(b.x));
                    hi = hi.max(a.x.max(b.x));
                } else {
                    let t = lerp(a.x, b.x, (y - a.y) / (b.y - a.y));
                    lo = lo.min(t);
                    hi = hi.max(t);
                }
            }
        }
    }
    if hi < lo {
        Interval::EMPTY
    } else {
        Interval::new(lo, hi)
    }
}

/// Snap a range outward to the resolution grid, keeping at least one cell
/// and staying inside `[0, 1]`.
pub fn quantize(t: Interval) -> Interval {
    let r = FAT_LINE_PARAMETRIC_RESOLUTION;
    let lo = (1.0 - r).min((t.lo / r).floor() * r).max(0.0);
    let hi = (lo + r).max((t.hi / r).ceil() * r).min(1.0);
    Interval::new(lo, hi)
}

/// A curve restricted to a parameter range, with its fat-line band.
#[derive(Clone, Copy, Debug)]
pub struct FatLine {
    pub curve: Curve2,
    pub t: Interval,
    pub range: Curve2,
    pub width: Interval,
}

impl FatLine {
    pub fn new(curve: &Curve2, t: Interval) -> Self {
        let t = quantize(t);
        let range = curve.range(t.lo, t.hi);
        Self {
            curve: *curve,
            t,
            range,
            width: fat_line_width(&range),
        }
    }

    /// One fat line per monotonic piece of `c`.
    pub fn from_curve(c: &Curve2) -> Vec<FatLine> {
        let ts = c.inflections();
        let bounds: Vec<f64> = std::iter::once(0.0).chain(ts).chain(std::iter::once(1.0)).collect();
        bounds
            .windows(2)
            .map(|w| FatLine::new(c, Interval::new(w[0], w[1])))
            .collect()
    }

    #[inline]
    fn mid(&self) -> f64 {
        self.t.lerp(0.5)
    }

    pub fn is_flat(&self) -> bool {
        self.t.size() < PARAMETRIC_EPSILON || self.width.size() <= SPATIAL_EPSILON
    }

    /// Chord box; encloses the range because ranges are monotonic.
    pub fn bounds(&self) -> Box2 {
        Box2::new(self.range.start(), self.range.end())
    }

    pub fn intersects(&self, o: &FatLine) -> bool {
        self.bounds().expand(SPATIAL_EPSILON * 10.0).intersects(&o.bounds())
    }

    pub fn split(&self) -> Vec<FatLine> {
        if self.is_flat() {
            vec![*self]
        } else {
            let mid = self.mid();
            vec![
                FatLine::new(&self.curve, Interval::new(self.t.lo, mid)),
                FatLine::new(&self.curve, Interval::new(mid, self.t.hi)),
            ]
        }
    }

    pub fn line(&self) -> Line2 {
        Line2::new(self.range.start(), self.range.end())
    }
}

/// Chord/chord intersection of two flat ranges, mapped back to curve parameters.
fn add_intersections(a: &FatLine, b: &FatLine, acc: &mut Vec<Vec2>) {
    let la = a.line();
    let lb = b.line();
    let av = la.p1 - la.p0;
    let bv = lb.p1 - lb.p0;
    let asb = la.p0 - lb.p0;
    let d = av.cross(bv);
    let i = Vec2::new(bv.cross(asb) / d, av.cross(asb) / d);
    if PARAMETRIC_BOUNDS.expand(CHORD_SLACK).contains(i) {
        acc.push(Box2::from_intervals(a.t, b.t).lerp(i));
    }
}

/// Clip `subject` to the part whose hull lies inside `clipper`'s widened band.
fn clip(subject: &FatLine, clipper: &FatLine) -> Option<FatLine> {
    let hull = convex_hull(clipper.range.start(), clipper.range.end(), &subject.range);
    let band = clipper.width.expand(FAT_LINE_SPATIAL_EPSILON);
    let normalized = clip_hull(band, &hull);
    if normalized.is_empty() {
        None
    } else {
        Some(FatLine::new(&subject.curve, subject.t.lerp_interval(&normalized)))
    }
}

pub fn curve_curve(a: &Curve2, b: &Curve2) -> Vec<Vec2> {
    let bs = FatLine::from_curve(b);
    let mut queue: Vec<(FatLine, FatLine)> = FatLine::from_curve(a)
        .into_iter()
        .flat_map(|ap| bs.iter().map(move |bp| (ap, *bp)))
        .collect();

    let mut iterations = 0;
    let mut collinear_checked = false;
    let mut acc = Vec::new();
    while let Some((mut la, mut lb)) = queue.pop() {
        if iterations > COLLINEAR_CHECK_ITERATIONS && !collinear_checked {
            collinear_checked = true;
            let is = collinear_intersection(a, b);
            if is_collinear(a, b, &is) {
                tracing::trace!("curves overlap; reporting overlap endpoints");
                return normalize(is);
            }
        }
        if iterations > MAX_ITERATIONS {
            tracing::trace!(iterations, "fat-line clipping did not converge");
            break;
        }
        loop {
            iterations += 1;
            if !la.intersects(&lb) {
                break;
            }
            if la.is_flat() && lb.is_flat() {
                add_intersections(&la, &lb, &mut acc);
                break;
            }
            let a_size = la.t.size();
            let b_size = lb.t.size();

            let Some(lb_clipped) = clip(&lb, &la) else {
                break;
            };
            lb = lb_clipped;
            let Some(la_clipped) = clip(&la, &lb) else {
                break;
            };
            la = la_clipped;

            let ka = la.t.size() / a_size;
            let kb = lb.t.size() / b_size;
            if ka.max(kb) > SPLIT_RATIO {
                for ap in la.split() {
                    for bp in lb.split() {
                        queue.push((ap, bp));
                    }
                }
                break;
            }
        }
    }
    normalize(acc)
}
