//! Graph algorithms over [`DirectedGraph`].
//!
//! SCC and cycle enumeration first map vertices to dense indices (in vertex
//! order) and run on adjacency lists; results are mapped back to `V`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque};

use super::{DirectedGraph, Edge, GraphError};

/// Dense index view of a graph.
struct Indexed<V> {
    vertices: Vec<V>,
    adj: Vec<Vec<usize>>,
}

impl<V: Ord + Clone> Indexed<V> {
    fn new<E>(graph: &DirectedGraph<V, E>) -> Self {
        let vertices: Vec<V> = graph.vertices().cloned().collect();
        let ids: BTreeMap<&V, usize> = vertices.iter().enumerate().map(|(i, v)| (v, i)).collect();
        let adj = graph
            .vertices()
            .map(|v| {
                graph
                    .out(v)
                    .map(|succ| succ.filter_map(|w| ids.get(w).copied()).collect())
                    .unwrap_or_default()
            })
            .collect();
        Self { vertices, adj }
    }
}

const UNVISITED: usize = usize::MAX;

/// Iterative Tarjan runner.
struct Tarjan<'a> {
    adj: &'a [Vec<usize>],
    index: Vec<usize>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    // (vertex, next successor position)
    frames: Vec<(usize, usize)>,
    counter: usize,
}

impl<'a> Tarjan<'a> {
    fn new(adj: &'a [Vec<usize>]) -> Self {
        let n = adj.len();
        Self {
            adj,
            index: vec![UNVISITED; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            frames: Vec::new(),
            counter: 0,
        }
    }

    fn visit(&mut self, v: usize) {
        self.index[v] = self.counter;
        self.lowlink[v] = self.counter;
        self.counter += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
        self.frames.push((v, 0));
    }

    fn run(mut self, include_singletons: bool) -> Vec<Vec<usize>> {
        let mut result = Vec::new();
        for seed in 0..self.adj.len() {
            if self.index[seed] != UNVISITED {
                continue;
            }
            self.visit(seed);
            while let Some(&(v, pos)) = self.frames.last() {
                if let Some(&w) = self.adj[v].get(pos) {
                    if let Some(frame) = self.frames.last_mut() {
                        frame.1 += 1;
                    }
                    if self.index[w] == UNVISITED {
                        self.visit(w);
                    } else if self.on_stack[w] {
                        self.lowlink[v] = self.lowlink[v].min(self.index[w]);
                    }
                    continue;
                }

                self.frames.pop();
                if let Some(&(u, _)) = self.frames.last() {
                    self.lowlink[u] = self.lowlink[u].min(self.lowlink[v]);
                }
                if self.lowlink[v] != self.index[v] {
                    continue;
                }
                if !include_singletons && self.stack.last() == Some(&v) {
                    self.stack.pop();
                    self.on_stack[v] = false;
                } else {
                    let mut group = Vec::new();
                    while let Some(x) = self.stack.pop() {
                        self.on_stack[x] = false;
                        group.push(x);
                        if x == v {
                            break;
                        }
                    }
                    result.push(group);
                }
            }
        }
        result
    }
}

/// Maximal vertex sets in which every vertex reaches every other, in the
/// order Tarjan's algorithm completes them.
///
/// Without `include_singletons`, one-vertex components are dropped (including
/// a vertex whose only cycle is a self-loop).
pub fn strongly_connected_components<V: Ord + Clone, E>(
    graph: &DirectedGraph<V, E>,
    include_singletons: bool,
) -> Vec<BTreeSet<V>> {
    let g = Indexed::new(graph);
    Tarjan::new(&g.adj)
        .run(include_singletons)
        .into_iter()
        .map(|group| group.into_iter().map(|i| g.vertices[i].clone()).collect())
        .collect()
}

/// Induced subgraph of each strongly connected component.
pub fn strongly_connected_subgraphs<V: Ord + Clone, E: Clone>(
    graph: &DirectedGraph<V, E>,
    include_singletons: bool,
) -> Vec<DirectedGraph<V, E>> {
    strongly_connected_components(graph, include_singletons)
        .iter()
        .map(|s| graph.select(s))
        .collect()
}

/// Johnson's circuit search rooted at `s`, restricted to vertices `>= s`.
struct Johnson<'a> {
    adj: &'a [Vec<usize>],
    s: usize,
    blocked: Vec<bool>,
    blocking: Vec<BTreeSet<usize>>,
    path: Vec<usize>,
    // (vertex, next successor position, closed a cycle)
    frames: Vec<(usize, usize, bool)>,
}

impl<'a> Johnson<'a> {
    fn new(adj: &'a [Vec<usize>], s: usize) -> Self {
        let n = adj.len();
        Self {
            adj,
            s,
            blocked: vec![false; n],
            blocking: vec![BTreeSet::new(); n],
            path: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn enter(&mut self, v: usize) {
        self.blocked[v] = true;
        self.path.push(v);
        self.frames.push((v, 0, false));
    }

    fn unblock(&mut self, u: usize) {
        let mut stack = vec![u];
        while let Some(u) = stack.pop() {
            if !self.blocked[u] {
                continue;
            }
            self.blocked[u] = false;
            stack.extend(std::mem::take(&mut self.blocking[u]));
        }
    }

    fn run(mut self, out: &mut Vec<Vec<usize>>) {
        let s = self.s;
        self.enter(s);
        while let Some(&(v, pos, _)) = self.frames.last() {
            if let Some(&w) = self.adj[v].get(pos) {
                if let Some(frame) = self.frames.last_mut() {
                    frame.1 += 1;
                }
                if w < s {
                    continue;
                }
                if w == s {
                    let mut cycle = self.path.clone();
                    cycle.push(s);
                    out.push(cycle);
                    if let Some(frame) = self.frames.last_mut() {
                        frame.2 = true;
                    }
                } else if !self.blocked[w] {
                    self.enter(w);
                }
                continue;
            }

            let Some((v, _, found)) = self.frames.pop() else {
                break;
            };
            self.path.pop();
            if found {
                self.unblock(v);
                if let Some(parent) = self.frames.last_mut() {
                    parent.2 = true;
                }
            } else {
                for &w in &self.adj[v] {
                    if w >= s {
                        self.blocking[w].insert(v);
                    }
                }
            }
        }
    }
}

/// Every elementary cycle, each as a closed vertex list (`[v0, …, v0]`).
///
/// Components in which every vertex has exactly one successor are walked
/// directly; others go through Johnson's algorithm. Each cycle is reported
/// once, starting from its smallest vertex.
pub fn cycles<V: Ord + Clone, E: Clone>(graph: &DirectedGraph<V, E>) -> Vec<Vec<V>> {
    let mut result = Vec::new();
    for sub in strongly_connected_subgraphs(graph, true) {
        let g = Indexed::new(&sub);
        if g.adj.iter().all(|succ| succ.len() == 1) {
            let mut ring = vec![g.vertices[0].clone()];
            let mut v = g.adj[0][0];
            while v != 0 {
                ring.push(g.vertices[v].clone());
                v = g.adj[v][0];
            }
            ring.push(g.vertices[0].clone());
            result.push(ring);
            continue;
        }

        let mut found = Vec::new();
        for s in 0..g.vertices.len() {
            Johnson::new(&g.adj, s).run(&mut found);
        }
        result.extend(
            found
                .into_iter()
                .map(|c| c.into_iter().map(|i| g.vertices[i].clone()).collect()),
        );
    }
    result
}

/// Breadth-first iterator; each vertex is yielded at most once.
pub struct Bfs<V, F> {
    queue: VecDeque<V>,
    seen: BTreeSet<V>,
    adjacent: F,
}

/// Breadth-first traversal from `starts`, expanding each vertex through `adjacent`.
pub fn bfs_vertices<V, F, I>(starts: impl IntoIterator<Item = V>, adjacent: F) -> Bfs<V, F>
where
    V: Ord + Clone,
    F: FnMut(&V) -> I,
    I: IntoIterator<Item = V>,
{
    let mut seen = BTreeSet::new();
    let queue = starts.into_iter().filter(|v| seen.insert(v.clone())).collect();
    Bfs { queue, seen, adjacent }
}

impl<V, F, I> Iterator for Bfs<V, F>
where
    V: Ord + Clone,
    F: FnMut(&V) -> I,
    I: IntoIterator<Item = V>,
{
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let v = self.queue.pop_front()?;
        for w in (self.adjacent)(&v) {
            if self.seen.insert(w.clone()) {
                self.queue.push_back(w);
            }
        }
        Some(v)
    }
}

/// Search node: one per improvement of `(origin, vertex)`.
struct Node<V> {
    origin: usize,
    vertex: V,
    prev: Option<usize>,
    distance: f64,
}

/// Min-heap entry ordered by distance, then insertion order.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    distance: f64,
    id: usize,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cheapest path from any of `starts` to a vertex satisfying `accept`.
///
/// Each start keeps its own distances, so another start (or the same start)
/// can be an accepted target. The trivial path consisting of a start alone is
/// never returned. Starts absent from the graph are ignored.
///
/// Returns `Ok(None)` if nothing acceptable is reachable and
/// `Err(GraphError::NegativeWeight)` as soon as `cost` yields a negative weight.
pub fn shortest_path<V, E>(
    graph: &DirectedGraph<V, E>,
    starts: impl IntoIterator<Item = V>,
    mut accept: impl FnMut(&V) -> bool,
    mut cost: impl FnMut(Edge<'_, V, E>) -> f64,
) -> Result<Option<Vec<V>>, GraphError>
where
    V: Ord + Clone,
{
    let mut nodes: Vec<Node<V>> = Vec::new();
    let mut best: BTreeMap<(usize, V), usize> = BTreeMap::new();
    let mut heap = BinaryHeap::new();

    for (origin, v) in starts.into_iter().enumerate() {
        if !graph.contains(&v) {
            continue;
        }
        let id = nodes.len();
        best.insert((origin, v.clone()), id);
        nodes.push(Node {
            origin,
            vertex: v,
            prev: None,
            distance: 0.0,
        });
        heap.push(Candidate { distance: 0.0, id });
    }

    while let Some(Candidate { id, .. }) = heap.pop() {
        let (origin, distance) = (nodes[id].origin, nodes[id].distance);
        let vertex = nodes[id].vertex.clone();
        if best.get(&(origin, vertex.clone())) != Some(&id) {
            continue;
        }
        if nodes[id].prev.is_some() && accept(&vertex) {
            let mut path = Vec::new();
            let mut cur = Some(id);
            while let Some(i) = cur {
                path.push(nodes[i].vertex.clone());
                cur = nodes[i].prev;
            }
            path.reverse();
            return Ok(Some(path));
        }

        let succ: Vec<V> = graph.out(&vertex)?.cloned().collect();
        for to in succ {
            let value = graph.edge(&vertex, &to)?;
            let w = cost(Edge {
                from: &vertex,
                to: &to,
                value,
            });
            if w < 0.0 {
                return Err(GraphError::NegativeWeight(w));
            }
            let d = distance + w;
            let key = (origin, to);
            if let Some(&prev) = best.get(&key) {
                if d >= nodes[prev].distance {
                    continue;
                }
            }
            let next = nodes.len();
            nodes.push(Node {
                origin,
                vertex: key.1.clone(),
                prev: Some(id),
                distance: d,
            });
            best.insert(key, next);
            heap.push(Candidate { distance: d, id: next });
        }
    }
    Ok(None)
}
