//! Boolean operations on regions.
//!
//! Both regions are split at their mutual intersections and cut into arcs
//! running between split vertices. Each arc is classified against the other
//! region, the arcs the operation keeps become edges of a directed graph over
//! the split vertices, and cycles of that graph are the output rings.
//!
//! The graph is not a multigraph: parallel arcs share one edge (a list of arc
//! ids) and cycles are expanded into every arc combination. When arcs remain
//! after cycle extraction, the graph is repaired by pairing dangling vertices
//! with shortest paths over the unused arcs and the reversed used arcs, then
//! extraction runs again.

use std::collections::BTreeSet;
use std::f64::consts::E;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::cfg::ClipCfg;
use crate::curve::Curve2;
use crate::graph::{cycles, shortest_path, DirectedGraph, GraphError};
use crate::vec::Vec2;

use super::combinatorics::{combinations, permutations};
use super::split::split;
use super::{Region2, Ring2, TestResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Operation {
    Union,
    Intersection,
    Difference,
}

/// Position of an arc relative to the other region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Outside,
    Inside,
    /// On the other boundary, running the same way.
    SameEdge,
    /// On the other boundary, running the opposite way.
    DiffEdge,
}

impl Operation {
    fn keep_a(self, s: Side) -> bool {
        match self {
            Operation::Union => matches!(s, Side::Outside | Side::SameEdge),
            Operation::Intersection => matches!(s, Side::Inside | Side::SameEdge),
            Operation::Difference => matches!(s, Side::Outside | Side::DiffEdge),
        }
    }

    fn keep_b(self, s: Side) -> bool {
        match self {
            Operation::Union => s == Side::Outside,
            Operation::Intersection | Operation::Difference => s == Side::Inside,
        }
    }
}

type ArcId = usize;

/// Consecutive ring curves between two split vertices.
#[derive(Clone, Debug)]
struct Arc {
    curves: Vec<Curve2>,
    head: Vec2,
    tail: Vec2,
    /// Sum of chord lengths.
    length: f64,
    signed_area: f64,
}

impl Arc {
    fn new(curves: Vec<Curve2>) -> Self {
        let head = curves.first().map_or(Vec2::ORIGIN, Curve2::start);
        let tail = curves.last().map_or(Vec2::ORIGIN, Curve2::end);
        let length: f64 = curves.iter().map(|c| (c.end() - c.start()).length()).sum();
        let signed_area: f64 = curves.iter().map(Curve2::signed_area).sum();
        Self {
            curves,
            head,
            tail,
            length,
            signed_area,
        }
    }

    fn reverse(&self) -> Self {
        Arc::new(self.curves.iter().rev().map(Curve2::reverse).collect())
    }

    /// Point at fraction `t` of the arc's chord length.
    fn position(&self, t: f64) -> Vec2 {
        let threshold = self.length * t;
        let mut offset = 0.0;
        for c in &self.curves {
            let l = (c.end() - c.start()).length();
            if threshold >= offset && threshold <= offset + l {
                let local = if l > 0.0 { (threshold - offset) / l } else { 0.0 };
                return c.position(local);
            }
            offset += l;
        }
        self.tail
    }
}

/// Whether `c` runs along the top of the region it bounds (leftwards, or
/// upwards when vertical).
fn is_top(c: &Curve2) -> bool {
    let delta = c.end().x - c.start().x;
    if delta == 0.0 {
        c.end().y > c.start().y
    } else {
        delta < 0.0
    }
}

fn classify(region: &Region2, arc: &Arc) -> Side {
    // a point well inside the arc, away from the shared vertices
    match region.test(arc.position(1.0 / E)) {
        TestResult::Outside => Side::Outside,
        TestResult::Inside => Side::Inside,
        TestResult::Edge(c) => {
            if arc.curves.first().is_some_and(is_top) == is_top(&c) {
                Side::SameEdge
            } else {
                Side::DiffEdge
            }
        }
    }
}

/// Cut every ring at `vertices`; a ring without any becomes a single closed arc.
fn partition(region: &Region2, vertices: &BTreeSet<Vec2>) -> Vec<Arc> {
    let mut result = Vec::new();
    for ring in region.rings() {
        let cs = &ring.curves;
        let Some(offset) = cs.iter().position(|c| vertices.contains(&c.start())) else {
            if !cs.is_empty() {
                result.push(Arc::new(cs.clone()));
            }
            continue;
        };
        let mut acc: Vec<Curve2> = Vec::new();
        for c in cs[offset..].iter().chain(&cs[..offset]) {
            if vertices.contains(&c.start()) && !acc.is_empty() {
                result.push(Arc::new(std::mem::take(&mut acc)));
            }
            acc.push(*c);
        }
        if !acc.is_empty() {
            result.push(Arc::new(acc));
        }
    }
    result
}

/// Arc ids along a vertex path in a graph with one arc per edge.
fn path_arcs(graph: &DirectedGraph<Vec2, ArcId>, path: &[Vec2]) -> Result<Vec<ArcId>, GraphError> {
    path.windows(2).map(|w| graph.edge(&w[0], &w[1]).copied()).collect()
}

/// Pair each of `outs`, in order, with the nearest still-unclaimed vertex of `ins`.
/// `None` if some out-vertex cannot reach any.
fn greedy_pairing(
    search: &DirectedGraph<Vec2, ArcId>,
    outs: &[Vec2],
    ins: &BTreeSet<Vec2>,
    arena: &[Arc],
) -> Result<Option<Vec<Vec<ArcId>>>, GraphError> {
    let mut remaining = ins.clone();
    let mut result = Vec::new();
    for &v in outs {
        if remaining.is_empty() {
            break;
        }
        let path = shortest_path(search, [v], |x| remaining.contains(x), |e| arena[*e.value].length)?;
        let Some(path) = path else {
            return Ok(None);
        };
        if let Some(last) = path.last() {
            remaining.remove(last);
        }
        result.push(path_arcs(search, &path)?);
    }
    Ok(Some(result))
}

/// Cycle extraction and graph repair state.
struct Clipper<'a> {
    arena: &'a [Arc],
    cfg: ClipCfg,
    rng: StdRng,
    consumed: BTreeSet<ArcId>,
    rings: Vec<Ring2>,
}

impl<'a> Clipper<'a> {
    fn new(arena: &'a [Arc], cfg: ClipCfg) -> Self {
        Self {
            arena,
            cfg,
            rng: StdRng::seed_from_u64(cfg.seed),
            consumed: BTreeSet::new(),
            rings: Vec::new(),
        }
    }

    fn arc(&self, id: ArcId) -> &'a Arc {
        &self.arena[id]
    }

    fn shorter(&self, x: ArcId, y: ArcId) -> ArcId {
        if self.arc(x).length < self.arc(y).length {
            x
        } else {
            y
        }
    }

    fn area(&self, cycle: &[ArcId]) -> f64 {
        cycle.iter().map(|&id| self.arc(id).signed_area).sum::<f64>().abs()
    }

    fn ring(&self, cycle: &[ArcId]) -> Ring2 {
        Ring2::new(cycle.iter().flat_map(|&id| self.arc(id).curves.iter().copied()))
    }

    fn graph(&self, arcs: &BTreeSet<ArcId>) -> DirectedGraph<Vec2, Vec<ArcId>> {
        let mut graph = DirectedGraph::new();
        for &id in arcs {
            let arc = self.arc(id);
            graph.link_with(arc.head, arc.tail, vec![id], |mut old, new| {
                old.extend(new);
                old
            });
        }
        graph
    }

    /// Arc paths whose addition (unused arcs) or removal (used arcs) closes
    /// dangling vertices of `graph`.
    fn repair(&mut self, graph: &DirectedGraph<Vec2, Vec<ArcId>>, unused: &[ArcId]) -> Result<Vec<Vec<ArcId>>, GraphError> {
        let arena = self.arena;
        let mut search: DirectedGraph<Vec2, ArcId> = DirectedGraph::new();
        for &id in unused {
            let arc = self.arc(id);
            search.link_with(arc.head, arc.tail, id, |x, y| self.shorter(x, y));
        }
        // used arcs backwards, so a path may retract them
        for e in graph.edges() {
            let shortest = e.value.iter().copied().min_by(|&x, &y| self.arc(x).length.total_cmp(&self.arc(y).length));
            if let Some(id) = shortest {
                let arc = self.arc(id);
                search.link_with(arc.tail, arc.head, id, |x, y| self.shorter(x, y));
            }
        }

        let mut ins = BTreeSet::new();
        let mut outs = BTreeSet::new();
        for v in graph.vertices() {
            if graph.in_(v)?.is_empty() {
                ins.insert(*v);
            }
            if graph.out_degree(v)? == 0 {
                outs.insert(*v);
            }
        }

        let mut open_ins = ins.clone();
        let mut open_outs = outs.clone();
        let mut result = Vec::new();
        while !open_ins.is_empty() && !open_outs.is_empty() {
            let path = shortest_path(
                &search,
                open_outs.iter().copied(),
                |v| ins.contains(v),
                |e| arena[*e.value].length,
            )?;
            // a vertex claimed earlier needs something better than greedy
            let Some(path) = path.filter(|p| p.last().is_some_and(|v| open_ins.contains(v))) else {
                break;
            };
            if let (Some(first), Some(last)) = (path.first(), path.last()) {
                open_outs.remove(first);
                open_ins.remove(last);
            }
            result.push(path_arcs(&search, &path)?);
        }
        if open_ins.is_empty() || open_outs.is_empty() {
            return Ok(result);
        }

        let outs: Vec<Vec2> = outs.into_iter().collect();
        let mut best: Option<(f64, Vec<Vec<ArcId>>)> = None;
        for order in permutations(&outs, self.cfg.max_permutations, &mut self.rng) {
            let Some(pairing) = greedy_pairing(&search, &order, &ins, arena)? else {
                continue;
            };
            let total: f64 = pairing.iter().flatten().map(|&id| arena[id].length).sum();
            if best.as_ref().map_or(true, |(b, _)| total < *b) {
                best = Some((total, pairing));
            }
        }
        Ok(best.map(|(_, p)| p).unwrap_or_default())
    }

    fn run(&mut self, mut arcs: BTreeSet<ArcId>) -> Result<(), GraphError> {
        for attempt in 0..self.cfg.max_repair_attempts {
            let mut graph = self.graph(&arcs);
            if attempt > 0 {
                let unused: Vec<ArcId> = (0..self.arena.len())
                    .filter(|id| !arcs.contains(id) && !self.consumed.contains(id))
                    .collect();
                for path in self.repair(&graph, &unused)? {
                    for id in path {
                        let arc = self.arc(id);
                        if arcs.remove(&id) {
                            graph.unlink(&arc.head, &arc.tail)?;
                        } else {
                            graph.link(arc.head, arc.tail, vec![id]);
                            arcs.insert(id);
                        }
                    }
                }
                debug!(attempt, arcs = arcs.len(), "repaired clip graph");
            }

            let mut candidates: Vec<Vec<ArcId>> = Vec::new();
            for cycle in cycles(&graph) {
                let edges = cycle
                    .windows(2)
                    .map(|w| graph.edge(&w[0], &w[1]).cloned())
                    .collect::<Result<Vec<_>, _>>()?;
                candidates.extend(combinations(&edges, self.cfg.max_permutations));
            }
            candidates.sort_by(|x, y| self.area(y).total_cmp(&self.area(x)));

            for cycle in candidates {
                if cycle.iter().any(|id| self.consumed.contains(id)) {
                    continue;
                }
                self.consumed.extend(cycle.iter().copied());
                let ring = self.ring(&cycle);
                self.rings.push(ring);
            }
            arcs.retain(|id| !self.consumed.contains(id));
            if arcs.is_empty() {
                return Ok(());
            }
        }
        warn!(
            arcs = arcs.len(),
            attempts = self.cfg.max_repair_attempts,
            "clip left arcs unconsumed"
        );
        Ok(())
    }
}

pub(crate) fn operation(a: &Region2, b: &Region2, op: Operation, cfg: ClipCfg) -> Region2 {
    let split = split(a, b);
    let pa = partition(&split.a, &split.splits);
    let mut pb = partition(&split.b, &split.splits);
    if op == Operation::Difference {
        pb = pb.iter().map(Arc::reverse).collect();
    }

    let mut arcs = BTreeSet::new();
    for (i, arc) in pa.iter().enumerate() {
        if op.keep_a(classify(&split.b, arc)) {
            arcs.insert(i);
        }
    }
    for (i, arc) in pb.iter().enumerate() {
        if op.keep_b(classify(&split.a, arc)) {
            arcs.insert(pa.len() + i);
        }
    }
    let arena: Vec<Arc> = pa.into_iter().chain(pb).collect();
    debug!(
        ?op,
        rings_a = a.rings().len(),
        rings_b = b.rings().len(),
        splits = split.splits.len(),
        arcs = arena.len(),
        kept = arcs.len(),
        "clip"
    );

    let mut clipper = Clipper::new(&arena, cfg);
    if let Err(error) = clipper.run(arcs) {
        warn!(%error, "clip graph inconsistent; returning rings found so far");
    }
    let result = Region2::new(clipper.rings);
    debug!(?op, rings = result.rings().len(), "clip done");
    result
}
