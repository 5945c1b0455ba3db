use pretty_assertions::assert_eq;

use sdsl_ir::{DeclId, DeclIdAllocator};

use super::{collect_references, CollectedSet};
use crate::graph::ReferenceGraph;

fn ids(n: usize) -> Vec<DeclId> {
    let mut alloc = DeclIdAllocator::new();
    (0..n).map(|_| alloc.fresh()).collect()
}

fn graph(edges: &[(DeclId, DeclId)]) -> ReferenceGraph {
    let mut graph = ReferenceGraph::new();
    for &(from, to) in edges {
        graph.add_edge(from, to);
    }
    graph
}

#[test]
fn cycle_terminates() {
    let d = ids(2);
    let (a, b) = (d[0], d[1]);
    let graph = graph(&[(a, b), (b, a)]);

    let collected = collect_references(&graph, &[a]);

    assert_eq!(collected.as_slice(), &[a, b]);
}

#[test]
fn self_loop_terminates() {
    let d = ids(1);
    let graph = graph(&[(d[0], d[0])]);
    assert_eq!(collect_references(&graph, &d).len(), 1);
}

#[test]
fn discovery_order_is_pre_order() {
    // a -> b -> d, a -> c -> d, c -> e
    let d = ids(6);
    let (a, b, c, dd, e, unreachable) = (d[0], d[1], d[2], d[3], d[4], d[5]);
    let graph = graph(&[(a, b), (a, c), (b, dd), (c, dd), (c, e), (unreachable, a)]);

    let collected = collect_references(&graph, &[a]);

    assert_eq!(collected.as_slice(), &[a, b, dd, c, e]);
    assert!(!collected.contains(unreachable));
}

#[test]
fn multiple_roots_and_duplicates() {
    let d = ids(4);
    let graph = graph(&[(d[0], d[1]), (d[2], d[3])]);

    let collected = collect_references(&graph, &[d[2], d[0], d[2]]);

    assert_eq!(collected.as_slice(), &[d[2], d[3], d[0], d[1]]);
}

#[test]
fn no_roots_collects_nothing() {
    let d = ids(2);
    let graph = graph(&[(d[0], d[1])]);
    assert!(collect_references(&graph, &[]).is_empty());
}

#[test]
fn collected_set_insert_is_single_visit() {
    let d = ids(2);
    let mut set = CollectedSet::new();
    assert!(set.insert(d[1]));
    assert!(set.insert(d[0]));
    assert!(!set.insert(d[1]));
    assert_eq!(set.len(), 2);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec![d[1], d[0]]);

    let from_iter: CollectedSet = [d[0], d[0], d[1]].into_iter().collect();
    assert_eq!(from_iter.as_slice(), &[d[0], d[1]]);
}
