use crate::bounds::Box2;
use crate::cfg::{PARAMETRIC_EPSILON, SPATIAL_EPSILON};
use crate::curve::{cubic, Curve2, Line2};
use crate::intersect::{analytic::line_curve, PARAMETRIC_BOUNDS};
use crate::scalars::round_unit;
use crate::vec::{Mat3, Vec2};

use super::Region2;

/// Where a point lies relative to a ring or region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TestResult {
    Inside,
    Outside,
    /// On the boundary, within `SPATIAL_EPSILON`, of this curve.
    Edge(Curve2),
}

impl TestResult {
    /// Inside or on an edge.
    #[inline]
    pub fn is_inside(&self) -> bool {
        !matches!(self, TestResult::Outside)
    }
}

/// Closed loop of monotonic curves.
///
/// Every curve ends exactly where the next begins and the last ends at the
/// first's start. Orientation and area come from the signed area at
/// construction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Curve2>", into = "Vec<Curve2>"))]
pub struct Ring2 {
    pub curves: Vec<Curve2>,
    pub bounds: Box2,
    pub is_clockwise: bool,
    /// Absolute enclosed area.
    pub area: f64,
}

impl Ring2 {
    /// Split `curves` at their inflections and close the loop.
    ///
    /// Each curve's end is re-anchored to the following curve's start, so
    /// input that is only approximately closed becomes exactly closed.
    pub fn new(curves: impl IntoIterator<Item = Curve2>) -> Self {
        let mut bounds = Box2::EMPTY;
        let mut signed_area = 0.0;
        let mut list = Vec::new();
        for c in curves {
            for piece in c.split_at(&c.inflections()) {
                bounds = bounds.union_point(piece.start()).union_point(piece.end());
                signed_area += piece.signed_area();
                list.push(piece);
            }
        }
        let n = list.len();
        for i in 0..n {
            let next = list[(i + 1) % n].start();
            list[i] = list[i].endpoints(list[i].start(), next);
        }
        let ring = Self {
            curves: list,
            bounds,
            is_clockwise: signed_area < 0.0,
            area: signed_area.abs(),
        };
        debug_assert!(ring.is_closed());
        ring
    }

    pub fn of(curves: &[Curve2]) -> Self {
        Self::new(curves.iter().copied())
    }

    /// Unit square `[0, 1]²`, counterclockwise.
    pub fn square() -> Self {
        Box2::new(Vec2::ORIGIN, Vec2::new(1.0, 1.0)).outline()
    }

    /// Unit circle at the origin from four cubic arcs, counterclockwise.
    pub fn circle() -> Self {
        let k = 4.0 / 3.0 * (2.0_f64.sqrt() - 1.0);
        let v = Vec2::new;
        Self::new([
            cubic(v(1.0, 0.0), v(1.0, k), v(k, 1.0), v(0.0, 1.0)),
            cubic(v(0.0, 1.0), v(-k, 1.0), v(-1.0, k), v(-1.0, 0.0)),
            cubic(v(-1.0, 0.0), v(-1.0, -k), v(-k, -1.0), v(0.0, -1.0)),
            cubic(v(0.0, -1.0), v(k, -1.0), v(1.0, -k), v(1.0, 0.0)),
        ])
    }

    pub fn is_closed(&self) -> bool {
        let n = self.curves.len();
        (0..n).all(|i| self.curves[i].end() == self.curves[(i + 1) % n].start())
    }

    /// Signed area; negative for clockwise rings.
    pub fn signed_area(&self) -> f64 {
        if self.is_clockwise {
            -self.area
        } else {
            self.area
        }
    }

    pub fn transform(&self, m: &Mat3) -> Self {
        Self::new(self.curves.iter().map(|c| c.transform(m)))
    }

    /// The same loop traversed the other way.
    pub fn reverse(&self) -> Self {
        Self::new(self.curves.iter().rev().map(Curve2::reverse))
    }

    pub fn region(&self) -> Region2 {
        Region2::of(self.clone())
    }

    /// Classify `p` by casting a ray towards `+x` and counting crossings.
    ///
    /// Curves are monotonic, so each crosses the ray at most once unless it
    /// runs along it. A crossing at the ray's origin means `p` is on that curve.
    pub fn test(&self, p: Vec2) -> TestResult {
        if !self.bounds.expand(SPATIAL_EPSILON).contains(p) {
            return TestResult::Outside;
        }
        let ray = Line2::new(p, Vec2::new(self.bounds.ux + 1.0, p.y));
        let mut count = 0usize;
        for c in &self.curves {
            let b = c.bounds();
            let flat = b.height() == 0.0;
            if p.x < b.lx {
                // entirely to the right; crossing counted on [bottom, top)
                if p.y >= b.ly && p.y < b.uy {
                    count += 1;
                }
            } else if b.expand_vec(Vec2::new(SPATIAL_EPSILON, 0.0)).contains(p) {
                let hit = line_curve(&ray, c)
                    .into_iter()
                    .map(|i| i.map(|n| round_unit(n, PARAMETRIC_EPSILON)))
                    .filter(|&i| PARAMETRIC_BOUNDS.contains(i))
                    .min_by(|a, b| a.x.total_cmp(&b.x));
                if let Some(i) = hit {
                    if i.x == 0.0 {
                        return TestResult::Edge(*c);
                    } else if !flat && p.y < b.uy {
                        count += 1;
                    }
                }
            }
        }
        if count % 2 == 1 {
            TestResult::Inside
        } else {
            TestResult::Outside
        }
    }

    /// Inside or on the boundary.
    pub fn contains(&self, p: Vec2) -> bool {
        self.test(p).is_inside()
    }
}

impl From<Vec<Curve2>> for Ring2 {
    fn from(curves: Vec<Curve2>) -> Self {
        Ring2::new(curves)
    }
}

impl From<Ring2> for Vec<Curve2> {
    fn from(ring: Ring2) -> Self {
        ring.curves
    }
}
