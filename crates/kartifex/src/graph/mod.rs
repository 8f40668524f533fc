//! Directed graphs over comparable vertices.
//!
//! Purpose
//! - `DirectedGraph<V, E>` keeps an `out` map (vertex → successor → edge) and a
//!   parallel `in` index (vertex → predecessors). Both always hold the same
//!   vertex set.
//! - Algorithms: strongly connected components (Tarjan), elementary cycles
//!   (Johnson, with a fast path for simple rings), multi-source shortest path
//!   with an acceptance predicate, and breadth-first traversal.
//!
//! Conventions
//! - Vertices are ordered (`V: Ord`) so every iteration, and therefore every
//!   algorithm result, is deterministic.
//! - All traversals use explicit work stacks; no recursion.
//! - Queries on absent vertices or edges return `GraphError`.

mod algorithms;
mod directed;

pub use algorithms::{
    bfs_vertices, cycles, shortest_path, strongly_connected_components, strongly_connected_subgraphs, Bfs,
};
pub use directed::{DirectedGraph, Edge};

/// Misuse of a graph query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("no such vertex")]
    NoSuchVertex,
    #[error("no such edge")]
    NoSuchEdge,
    #[error("negative edge weight {0} is unsupported")]
    NegativeWeight(f64),
}

#[cfg(test)]
mod tests;
