use std::collections::{BTreeMap, BTreeSet};

use super::GraphError;

/// A borrowed view of one edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge<'a, V, E> {
    pub from: &'a V,
    pub to: &'a V,
    pub value: &'a E,
}

/// Directed graph with at most one edge per ordered vertex pair.
#[derive(Clone, Debug)]
pub struct DirectedGraph<V, E> {
    out: BTreeMap<V, BTreeMap<V, E>>,
    in_: BTreeMap<V, BTreeSet<V>>,
}

impl<V: Ord + Clone, E> Default for DirectedGraph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Ord + Clone, E> DirectedGraph<V, E> {
    pub fn new() -> Self {
        Self {
            out: BTreeMap::new(),
            in_: BTreeMap::new(),
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn contains(&self, v: &V) -> bool {
        self.out.contains_key(v)
    }

    /// Vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.out.keys()
    }

    /// Position of `v` in [`Self::vertices`].
    pub fn index_of(&self, v: &V) -> Option<usize> {
        self.out.keys().position(|u| u == v)
    }

    /// All edges, grouped by source vertex.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_, V, E>> + '_ {
        self.out
            .iter()
            .flat_map(|(from, m)| m.iter().map(move |(to, value)| Edge { from, to, value }))
    }

    pub fn edge(&self, from: &V, to: &V) -> Result<&E, GraphError> {
        self.out
            .get(from)
            .and_then(|m| m.get(to))
            .ok_or(GraphError::NoSuchEdge)
    }

    /// Successors of `v`.
    pub fn out(&self, v: &V) -> Result<impl Iterator<Item = &V> + '_, GraphError> {
        self.out.get(v).map(|m| m.keys()).ok_or(GraphError::NoSuchVertex)
    }

    pub fn out_degree(&self, v: &V) -> Result<usize, GraphError> {
        self.out.get(v).map(BTreeMap::len).ok_or(GraphError::NoSuchVertex)
    }

    /// Predecessors of `v`.
    pub fn in_(&self, v: &V) -> Result<&BTreeSet<V>, GraphError> {
        self.in_.get(v).ok_or(GraphError::NoSuchVertex)
    }

    /// Insert `v` with no edges; no-op if present.
    pub fn add(&mut self, v: V) -> &mut Self {
        if !self.out.contains_key(&v) {
            self.out.insert(v.clone(), BTreeMap::new());
            self.in_.insert(v, BTreeSet::new());
        }
        self
    }

    /// Insert `from → to`, replacing any existing edge.
    pub fn link(&mut self, from: V, to: V, edge: E) -> &mut Self {
        self.link_with(from, to, edge, |_, new| new)
    }

    /// Insert `from → to`; an existing edge is combined as `merge(old, new)`.
    pub fn link_with(&mut self, from: V, to: V, edge: E, merge: impl FnOnce(E, E) -> E) -> &mut Self {
        self.add(from.clone());
        self.add(to.clone());
        if let Some(m) = self.out.get_mut(&from) {
            let value = match m.remove(&to) {
                Some(old) => merge(old, edge),
                None => edge,
            };
            m.insert(to.clone(), value);
        }
        if let Some(s) = self.in_.get_mut(&to) {
            s.insert(from);
        }
        debug_assert!(self.is_symmetric());
        self
    }

    /// Remove `from → to`, returning its value if it existed.
    pub fn unlink(&mut self, from: &V, to: &V) -> Result<Option<E>, GraphError> {
        let m = self.out.get_mut(from).ok_or(GraphError::NoSuchVertex)?;
        let removed = m.remove(to);
        if let Some(s) = self.in_.get_mut(to) {
            s.remove(from);
        }
        debug_assert!(self.is_symmetric());
        Ok(removed)
    }

    /// Induced subgraph on `selection` (vertices outside the graph are ignored).
    pub fn select(&self, selection: &BTreeSet<V>) -> Self
    where
        E: Clone,
    {
        let out = self
            .out
            .iter()
            .filter(|(v, _)| selection.contains(*v))
            .map(|(v, m)| {
                let kept = m
                    .iter()
                    .filter(|(to, _)| selection.contains(*to))
                    .map(|(to, e)| (to.clone(), e.clone()))
                    .collect();
                (v.clone(), kept)
            })
            .collect();
        let in_ = self
            .in_
            .iter()
            .filter(|(v, _)| selection.contains(*v))
            .map(|(v, s)| (v.clone(), s.intersection(selection).cloned().collect()))
            .collect();
        Self { out, in_ }
    }

    /// Same vertex sets in both indices, and every `out` edge mirrored in `in`.
    pub(crate) fn is_symmetric(&self) -> bool {
        self.out.len() == self.in_.len()
            && self.out.keys().eq(self.in_.keys())
            && self
                .out
                .iter()
                .all(|(from, m)| m.keys().all(|to| self.in_.get(to).is_some_and(|s| s.contains(from))))
            && self
                .in_
                .iter()
                .all(|(to, s)| s.iter().all(|from| self.out.get(from).is_some_and(|m| m.contains_key(to))))
    }
}

impl<V: PartialEq, E: PartialEq> PartialEq for DirectedGraph<V, E> {
    fn eq(&self, other: &Self) -> bool {
        self.out == other.out
    }
}
