use super::*;
use crate::vec::Vec2;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn v(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

fn square_ring() -> (DirectedGraph<Vec2, i32>, [Vec2; 4]) {
    let vs = [v(0.0, 0.0), v(1.0, 2.0), v(3.0, 4.0), v(3.0, 5.0)];
    let mut g = DirectedGraph::new();
    g.link(vs[0], vs[1], 0)
        .link(vs[1], vs[2], 1)
        .link(vs[2], vs[3], 2)
        .link(vs[3], vs[0], 3);
    (g, vs)
}

#[test]
fn added_vertex_has_empty_adjacency() {
    let mut g: DirectedGraph<Vec2, i32> = DirectedGraph::new();
    g.add(v(0.0, 0.0));
    assert_eq!(g.out(&v(0.0, 0.0)).map(Iterator::count), Ok(0));
    assert!(g.in_(&v(0.0, 0.0)).is_ok_and(BTreeSet::is_empty));
    // -0.0 is the same vertex
    assert!(g.contains(&v(-0.0, 0.0)));
}

#[test]
fn link_and_unlink() {
    let (a, b) = (v(0.0, 0.0), v(1.0, 2.0));
    let mut g = DirectedGraph::new();
    g.add(a);
    g.link(a, b, 0);
    assert_eq!(g.out(&a).map(|o| o.cloned().collect::<Vec<_>>()), Ok(vec![b]));
    assert!(g.in_(&b).is_ok_and(|s| s.contains(&a)));
    assert_eq!(g.out_degree(&b), Ok(0));
    assert_eq!(g.edge(&a, &b), Ok(&0));

    assert_eq!(g.unlink(&a, &b), Ok(Some(0)));
    assert_eq!(g.out_degree(&a), Ok(0));
    assert!(g.in_(&b).is_ok_and(BTreeSet::is_empty));
    assert_eq!(g.edge(&a, &b), Err(GraphError::NoSuchEdge));
    assert_eq!(g.len(), 2);
}

#[test]
fn missing_vertices_are_errors() {
    let g: DirectedGraph<Vec2, i32> = DirectedGraph::new();
    assert!(g.out(&v(1.0, 1.0)).is_err());
    assert_eq!(g.in_(&v(1.0, 1.0)), Err(GraphError::NoSuchVertex));
    let mut g = g;
    assert_eq!(g.unlink(&v(0.0, 0.0), &v(1.0, 1.0)), Err(GraphError::NoSuchVertex));
}

#[test]
fn link_with_merges_parallel_edges() {
    let mut g = DirectedGraph::new();
    g.link_with(1, 2, vec!['a'], |mut old, new| {
        old.extend(new);
        old
    });
    g.link_with(1, 2, vec!['b'], |mut old, new| {
        old.extend(new);
        old
    });
    assert_eq!(g.edge(&1, &2), Ok(&vec!['a', 'b']));
    g.link(1, 2, vec!['c']);
    assert_eq!(g.edge(&1, &2), Ok(&vec!['c']));
}

#[test]
fn select_induces_subgraphs() {
    let (a, b, c) = (v(0.0, 0.0), v(1.0, 2.0), v(3.0, 4.0));
    let mut g = DirectedGraph::new();
    g.link(a, b, 0).link(a, c, 1);

    let set = |vs: &[Vec2]| vs.iter().copied().collect::<BTreeSet<_>>();
    assert_eq!(g.select(&set(&[b, c])).len(), 2);
    assert_eq!(g.select(&set(&[a, b])).len(), 2);
    assert_eq!(g.select(&set(&[a, b])).edge(&a, &b), Ok(&0));
    assert_eq!(g.select(&set(&[a, b])).edge(&a, &c), Err(GraphError::NoSuchEdge));
    assert_eq!(g.select(&set(&[a])).len(), 1);
    assert!(g.select(&set(&[])).is_empty());
    assert!(g.select(&set(&[a, b])).is_symmetric());
}

#[test]
fn edges_report_source_and_target() {
    let (g, vs) = square_ring();
    let edges: Vec<(Vec2, Vec2, i32)> = g.edges().map(|e| (*e.from, *e.to, *e.value)).collect();
    assert_eq!(edges.len(), 4);
    assert!(edges.contains(&(vs[3], vs[0], 3)));
    assert_eq!(g.index_of(&vs[0]), Some(0));
    assert_eq!(g.index_of(&v(9.0, 9.0)), None);
}

#[test]
fn a_ring_is_one_cycle() {
    let (g, vs) = square_ring();
    let cs = cycles(&g);
    assert_eq!(cs.len(), 1);
    assert_eq!(cs[0].len(), 5);
    assert_eq!(cs[0], vec![vs[0], vs[1], vs[2], vs[3], vs[0]]);

    let scc = strongly_connected_components(&g, false);
    assert_eq!(scc.len(), 1);
    assert_eq!(scc[0].len(), 4);
    assert_eq!(strongly_connected_subgraphs(&g, false).len(), 1);
}

#[test]
fn singletons_are_optional() {
    let mut g = DirectedGraph::new();
    g.link(1, 2, ()).link(2, 1, ()).link(2, 3, ()).link(4, 4, ());
    let without = strongly_connected_components(&g, false);
    assert_eq!(without, vec![BTreeSet::from([1, 2])]);
    let mut with: Vec<Vec<i32>> = strongly_connected_components(&g, true)
        .into_iter()
        .map(|s| s.into_iter().collect())
        .collect();
    with.sort();
    assert_eq!(with, vec![vec![1, 2], vec![3], vec![4]]);

    // the self-loop is still a cycle
    let mut cs = cycles(&g);
    cs.sort();
    assert_eq!(cs, vec![vec![1, 2, 1], vec![4, 4]]);
}

#[test]
fn johnson_enumerates_every_elementary_cycle() {
    // complete digraph on 3 vertices: three 2-cycles and two 3-cycles
    let mut g = DirectedGraph::new();
    for a in 0..3 {
        for b in 0..3 {
            if a != b {
                g.link(a, b, ());
            }
        }
    }
    let mut cs = cycles(&g);
    cs.sort();
    assert_eq!(
        cs,
        vec![
            vec![0, 1, 0],
            vec![0, 1, 2, 0],
            vec![0, 2, 0],
            vec![0, 2, 1, 0],
            vec![1, 2, 1],
        ]
    );
}

#[test]
fn figure_eight_has_two_cycles() {
    let mut g = DirectedGraph::new();
    g.link(0, 1, ()).link(1, 2, ()).link(2, 0, ()).link(0, 3, ()).link(3, 4, ()).link(4, 0, ());
    let mut cs = cycles(&g);
    cs.sort();
    assert_eq!(cs, vec![vec![0, 1, 2, 0], vec![0, 3, 4, 0]]);
}

#[test]
fn acyclic_graphs_have_no_cycles() {
    let mut g = DirectedGraph::new();
    g.link(0, 1, ()).link(1, 2, ()).link(0, 2, ());
    assert!(cycles(&g).is_empty());
    assert!(strongly_connected_components(&g, false).is_empty());
}

#[test]
fn shortest_path_around_the_ring() {
    let (g, vs) = square_ring();
    let path = shortest_path(&g, [vs[0]], |x| *x == vs[3], |e| f64::from(*e.value));
    assert_eq!(path, Ok(Some(vec![vs[0], vs[1], vs[2], vs[3]])));
}

#[test]
fn shortest_path_prefers_cheaper_routes() {
    let mut g = DirectedGraph::new();
    g.link('a', 'b', 1.0).link('b', 'd', 1.0).link('a', 'c', 0.5).link('c', 'd', 2.0);
    let path = shortest_path(&g, ['a'], |x| *x == 'd', |e| *e.value);
    assert_eq!(path, Ok(Some(vec!['a', 'b', 'd'])));
}

#[test]
fn shortest_path_excludes_the_trivial_solution() {
    let mut g = DirectedGraph::new();
    g.link(0, 1, 1.0).link(1, 0, 1.0);
    // the start is accepted but must be reached through an edge
    let path = shortest_path(&g, [0], |x| *x == 0, |e| *e.value);
    assert_eq!(path, Ok(None));
    // a second start can reach the first
    let path = shortest_path(&g, [0, 1], |x| *x == 0, |e| *e.value);
    assert_eq!(path, Ok(Some(vec![1, 0])));
}

#[test]
fn shortest_path_rejects_negative_weights() {
    let mut g = DirectedGraph::new();
    g.link(0, 1, -1.0);
    let path = shortest_path(&g, [0], |x| *x == 1, |e| *e.value);
    assert_eq!(path, Err(GraphError::NegativeWeight(-1.0)));
}

#[test]
fn shortest_path_unreachable_or_unknown_start() {
    let mut g = DirectedGraph::new();
    g.link(0, 1, 1.0).add(2);
    assert_eq!(shortest_path(&g, [0], |x| *x == 2, |e| *e.value), Ok(None));
    assert_eq!(shortest_path(&g, [7], |x| *x == 1, |e| *e.value), Ok(None));
}

#[test]
fn bfs_visits_each_vertex_once_in_layers() {
    let mut g = DirectedGraph::new();
    g.link(0, 1, ()).link(0, 2, ()).link(1, 3, ()).link(2, 3, ()).link(3, 0, ());
    let order: Vec<i32> = bfs_vertices([0], |x| g.out(x).map(|o| o.copied().collect()).unwrap_or_else(|_| Vec::new())).collect();
    assert_eq!(order, vec![0, 1, 2, 3]);
}

proptest! {
    #[test]
    fn indices_stay_symmetric(ops in prop::collection::vec((0u8..6, 0u8..6, any::<bool>()), 0..64)) {
        let mut g: DirectedGraph<u8, u32> = DirectedGraph::new();
        for (i, (a, b, add)) in ops.into_iter().enumerate() {
            if add {
                g.link(a, b, i as u32);
            } else if g.contains(&a) {
                g.unlink(&a, &b).expect("source exists");
            }
            prop_assert!(g.is_symmetric());
        }
        for e in g.edges() {
            prop_assert!(g.in_(e.to).is_ok_and(|s| s.contains(e.from)));
        }
    }
}
