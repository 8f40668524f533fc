//! Mutual splitting of two regions at their boundary intersections.
//!
//! A sweep over curve x-extents pairs each curve with the curves of the other
//! region it may touch. Intersection points that land within tolerance of one
//! another are merged through [`VertexUnion`], so afterwards both regions
//! share bit-identical vertices wherever they meet.

use std::collections::{BTreeMap, BTreeSet};

use crate::cfg::{PARAMETRIC_EPSILON, SPATIAL_EPSILON};
use crate::curve::Curve2;
use crate::scalars::approx_eq;
use crate::sweep::SweepQueue;
use crate::vec::Vec2;

use super::{Region2, Ring2};

#[derive(Clone, Debug)]
pub struct SplitResult {
    pub a: Region2,
    pub b: Region2,
    /// Canonical vertices where the two boundaries meet.
    pub splits: BTreeSet<Vec2>,
}

/// Union-find over points; the lexicographically smallest point of a set is its root.
#[derive(Clone, Debug, Default)]
pub(crate) struct VertexUnion {
    parent: BTreeMap<Vec2, Vec2>,
    roots: BTreeSet<Vec2>,
}

impl VertexUnion {
    pub fn join(&mut self, a: Vec2, b: Vec2) {
        let a = self.adjust(a);
        let b = self.adjust(b);
        if a < b {
            self.parent.insert(b, a);
            self.roots.insert(a);
        } else if b < a {
            self.parent.insert(a, b);
            self.roots.insert(b);
        } else {
            self.roots.insert(b);
        }
    }

    /// Root of `p`'s set (`p` itself if never joined).
    pub fn adjust(&mut self, p: Vec2) -> Vec2 {
        let mut curr = p;
        while let Some(&next) = self.parent.get(&curr) {
            curr = next;
        }
        if curr != p {
            self.parent.insert(p, curr);
        }
        curr
    }

    /// `c` with both endpoints moved to their roots; `None` if that collapses it.
    pub fn adjust_curve(&mut self, c: &Curve2) -> Option<Curve2> {
        let start = self.adjust(c.start());
        let end = self.adjust(c.end());
        if start == end {
            None
        } else if start == c.start() && end == c.end() {
            Some(*c)
        } else {
            Some(c.endpoints(start, end))
        }
    }

    pub fn roots(&self) -> BTreeSet<Vec2> {
        self.roots
            .iter()
            .filter(|r| !self.parent.contains_key(*r))
            .copied()
            .collect()
    }
}

fn curves(region: &Region2) -> Vec<Curve2> {
    region.rings().iter().flat_map(|r| r.curves.iter().copied()).collect()
}

/// Split both regions at every point where their boundaries meet.
pub fn split(a: &Region2, b: &Region2) -> SplitResult {
    let cs = [curves(a), curves(b)];
    let mut queues = [SweepQueue::new(), SweepQueue::new()];
    for (q, list) in queues.iter_mut().zip(&cs) {
        for (i, c) in list.iter().enumerate() {
            // curves are monotonic, so their endpoints span their x-extent
            q.add(i, c.start().x, c.end().x);
        }
    }

    let mut union = VertexUnion::default();
    let mut params: [Vec<Vec<f64>>; 2] = [vec![Vec::new(); cs[0].len()], vec![Vec::new(); cs[1].len()]];
    while let Some(idx) = SweepQueue::next_of(&mut queues) {
        let Some(taken) = queues[idx].take() else {
            break;
        };
        for &other in queues[1 - idx].active() {
            let (i0, i1) = if idx == 0 { (taken, other) } else { (other, taken) };
            let (c0, c1) = (&cs[0][i0], &cs[1][i1]);
            for t in c0.intersections(c1) {
                params[0][i0].push(t.x);
                params[1][i1].push(t.y);
                union.join(c0.position(t.x), c1.position(t.y));
            }
        }
    }

    let [pa, pb] = params;
    let da: Vec<Vec<f64>> = cs[0].iter().zip(pa).map(|(c, ts)| dedupe(c, ts, &mut union)).collect();
    let db: Vec<Vec<f64>> = cs[1].iter().zip(pb).map(|(c, ts)| dedupe(c, ts, &mut union)).collect();

    SplitResult {
        a: split_region(a, &da, &mut union),
        b: split_region(b, &db, &mut union),
        splits: union.roots(),
    }
}

/// Sorted split parameters of `c`, dropping those that would leave a piece
/// shorter than tolerance. Dropped points are merged with their neighbour.
fn dedupe(c: &Curve2, mut ts: Vec<f64>, union: &mut VertexUnion) -> Vec<f64> {
    ts.sort_by(f64::total_cmp);
    let mut result: Vec<f64> = Vec::with_capacity(ts.len());
    for t1 in ts {
        let t0 = result.last().copied().unwrap_or(0.0);
        if approx_eq(t0, t1, PARAMETRIC_EPSILON)
            || Vec2::approx_eq(c.position(t0), c.position(t1), SPATIAL_EPSILON)
        {
            union.join(c.position(t0), c.position(t1));
        } else if approx_eq(t1, 1.0, PARAMETRIC_EPSILON) || Vec2::approx_eq(c.position(t1), c.end(), SPATIAL_EPSILON) {
            union.join(c.position(t1), c.end());
        } else {
            result.push(t1);
        }
    }
    result
}

fn split_region(region: &Region2, params: &[Vec<f64>], union: &mut VertexUnion) -> Region2 {
    let mut offset = 0;
    let mut rings = Vec::new();
    for ring in region.rings() {
        let mut pieces = Vec::new();
        for (c, ts) in ring.curves.iter().zip(&params[offset..]) {
            for piece in c.split_at(ts) {
                if let Some(adjusted) = union.adjust_curve(&piece) {
                    pieces.push(adjusted);
                }
            }
        }
        offset += ring.curves.len();
        if !pieces.is_empty() {
            rings.push(Ring2::new(pieces));
        }
    }
    Region2::new(rings)
}
