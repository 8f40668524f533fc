use crate::bounds::Box2;
use crate::cfg::ClipCfg;
use crate::vec::{Mat3, Vec2};

use super::clip::{self, Operation};
use super::{Ring2, TestResult};

/// A filled area bounded by non-crossing rings.
///
/// Whether a ring is a fill or a hole follows from how many other rings
/// enclose it: even depth fills, odd depth cuts a hole. Construction reorients
/// every ring to match, so fills run counterclockwise and holes clockwise.
/// Rings are kept sorted by ascending area so the innermost ring containing a
/// point is found first.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<Ring2>", into = "Vec<Ring2>"))]
pub struct Region2 {
    rings: Vec<Ring2>,
}

impl Region2 {
    pub fn new(rings: impl IntoIterator<Item = Ring2>) -> Self {
        let mut rings: Vec<Ring2> = rings.into_iter().collect();
        rings.sort_by(|a, b| a.area.total_cmp(&b.area));
        let holes: Vec<Option<bool>> = (0..rings.len())
            .map(|i| nesting_depth(&rings, i).map(|d| d % 2 == 1))
            .collect();
        for (ring, hole) in rings.iter_mut().zip(holes) {
            // undecidable rings keep their orientation
            if let Some(hole) = hole {
                if ring.is_clockwise != hole {
                    *ring = ring.reverse();
                }
            }
        }
        Self { rings }
    }

    /// Wrap a single ring as a filled region, counterclockwise.
    pub fn of(ring: Ring2) -> Self {
        Self::new([ring])
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    pub fn rings(&self) -> &[Ring2] {
        &self.rings
    }

    pub fn into_rings(self) -> Vec<Ring2> {
        self.rings
    }

    pub fn bounds(&self) -> Box2 {
        self.rings.iter().fold(Box2::EMPTY, |acc, r| acc.union(&r.bounds))
    }

    /// The smallest ring not reporting `Outside` decides, which matches the
    /// crossing parity over all rings since construction orients holes
    /// clockwise. Points on any ring are on the region's edge.
    pub fn test(&self, p: Vec2) -> TestResult {
        for ring in &self.rings {
            match ring.test(p) {
                TestResult::Outside => continue,
                TestResult::Inside if ring.is_clockwise => return TestResult::Outside,
                r => return r,
            }
        }
        TestResult::Outside
    }

    /// Inside or on the boundary.
    pub fn contains(&self, p: Vec2) -> bool {
        self.test(p).is_inside()
    }

    pub fn transform(&self, m: &Mat3) -> Self {
        Self::new(self.rings.iter().map(|r| r.transform(m)))
    }

    pub fn union(&self, other: &Region2) -> Region2 {
        self.union_with(other, ClipCfg::default())
    }

    pub fn intersection(&self, other: &Region2) -> Region2 {
        self.intersection_with(other, ClipCfg::default())
    }

    /// `self` minus `other`.
    pub fn difference(&self, other: &Region2) -> Region2 {
        self.difference_with(other, ClipCfg::default())
    }

    pub fn union_with(&self, other: &Region2, cfg: ClipCfg) -> Region2 {
        clip::operation(self, other, Operation::Union, cfg)
    }

    pub fn intersection_with(&self, other: &Region2, cfg: ClipCfg) -> Region2 {
        clip::operation(self, other, Operation::Intersection, cfg)
    }

    pub fn difference_with(&self, other: &Region2, cfg: ClipCfg) -> Region2 {
        clip::operation(self, other, Operation::Difference, cfg)
    }
}

/// Number of rings enclosing `rings[i]`, judged at the midpoint of its first
/// curve that does not touch any other ring. Only rings at least as large
/// can enclose it.
fn nesting_depth(rings: &[Ring2], i: usize) -> Option<usize> {
    let ring = &rings[i];
    ring.curves.iter().find_map(|c| {
        let p = c.position(0.5);
        let mut depth = 0;
        for (_, other) in rings.iter().enumerate().filter(|&(j, r)| j != i && r.area >= ring.area) {
            match other.test(p) {
                TestResult::Inside => depth += 1,
                TestResult::Outside => {}
                TestResult::Edge(_) => return None,
            }
        }
        Some(depth)
    })
}

impl From<Vec<Ring2>> for Region2 {
    fn from(rings: Vec<Ring2>) -> Self {
        Region2::new(rings)
    }
}

impl From<Region2> for Vec<Ring2> {
    fn from(region: Region2) -> Self {
        region.rings
    }
}
