//! Integration tests for weighted-digraph
//!
//! Tests real-world usage scenarios (road networks, load/mutate/save drivers)

use std::collections::HashMap;
use tempfile::tempdir;
use weighted_digraph::{EdgeId, Graph, GraphError, VertexId, VertexRole};

fn v(id: i64) -> VertexId {
    VertexId(id)
}

fn e(id: i64) -> EdgeId {
    EdgeId(id)
}

/// Small road network with sparse, non-contiguous ids
///
/// ```text
///   100 --(7)--> 205 --(-2)--> 310
///    ^                          |
///    +-----------(4)------------+
/// ```
fn build_road_network() -> Graph {
    let mut graph = Graph::new();
    graph.add_vertex(v(100)).unwrap();
    graph.add_vertex(v(205)).unwrap();
    graph.add_vertex(v(310)).unwrap();
    graph.add_edge(e(1), v(100), v(205), 7).unwrap();
    graph.add_edge(e(2), v(205), v(310), -2).unwrap();
    graph.add_edge(e(3), v(310), v(100), 4).unwrap();
    graph
}

#[test]
fn test_add_vertex_then_edge_scenario() {
    let mut graph = Graph::new();
    graph.add_vertex(v(0)).unwrap();
    graph.add_vertex(v(1)).unwrap();
    graph.add_edge(e(10), v(0), v(1), 5).unwrap();

    assert_eq!(graph.get_edge(v(0), v(1)).unwrap(), e(10));
    assert_eq!(graph.get_edge_cost(e(10)).unwrap(), 5);

    graph.remove_vertex(v(0)).unwrap();

    // Vertex 1 survives with no incoming edges
    assert_eq!(graph.get_in_degree(v(1)).unwrap(), 0);
    assert_eq!(graph.get_out_degree(v(1)).unwrap(), 0);
    assert!(graph.get_edge(v(0), v(1)).unwrap_err().is_invalid_vertex());
    assert!(!graph.contains_edge(e(10)));
}

#[test]
fn test_get_edge_failure_kinds() {
    let mut graph = Graph::new();
    graph.add_vertex(v(1)).unwrap();
    graph.add_vertex(v(99)).unwrap();

    // Both "no such vertex" and "no such edge" are InvalidVertex
    graph.remove_vertex(v(99)).unwrap();
    assert!(graph.get_edge(v(99), v(1)).unwrap_err().is_invalid_vertex());

    graph.add_vertex(v(99)).unwrap();
    assert!(graph.get_edge(v(99), v(1)).unwrap_err().is_invalid_vertex());
}

#[test]
fn test_duplicate_ids_rejected() {
    let mut graph = build_road_network();

    assert!(graph.add_vertex(v(205)).unwrap_err().is_invalid_vertex());
    assert!(graph
        .add_edge(e(2), v(100), v(310), 1)
        .unwrap_err()
        .is_invalid_edge());

    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_remove_vertex_leaves_no_dangling_edges() {
    let mut graph = build_road_network();
    graph.add_edge(e(4), v(205), v(205), 1).unwrap();

    graph.remove_vertex(v(205)).unwrap();

    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    for edge in graph.edge_iterator() {
        let (source, target) = graph.get_endpoints(edge).unwrap();
        assert_ne!(source, v(205));
        assert_ne!(target, v(205));
    }
    assert_eq!(graph.get_out_degree(v(100)).unwrap(), 0);
    assert_eq!(graph.get_in_degree(v(310)).unwrap(), 0);
    assert!(matches!(
        graph.get_edge(v(205), v(310)),
        Err(GraphError::InvalidVertex {
            role: VertexRole::Source,
            ..
        })
    ));
}

#[test]
fn test_neighbor_iterators() {
    let mut graph = build_road_network();
    graph.add_edge(e(9), v(100), v(310), 11).unwrap();

    let mut callees: Vec<_> = graph.outgoing_edge_iterator(v(100)).unwrap().collect();
    callees.sort_unstable();
    assert_eq!(callees, vec![v(205), v(310)]);

    let mut callers: Vec<_> = graph.ingoing_edge_iterator(v(310)).unwrap().collect();
    callers.sort_unstable();
    assert_eq!(callers, vec![v(100), v(205)]);

    let mut vertices: Vec<_> = graph.vertex_iterator().collect();
    vertices.sort_unstable();
    assert_eq!(vertices, vec![v(100), v(205), v(310)]);
}

/// Flag: a second edge between the same ordered pair leaves the first one
/// in the edge table but unreachable from the adjacency index.
#[test]
fn test_parallel_edge_is_shadowed_not_rejected() {
    let mut graph = build_road_network();
    graph.add_edge(e(50), v(100), v(205), 70).unwrap();

    assert_eq!(graph.get_edge(v(100), v(205)).unwrap(), e(50));
    assert_eq!(graph.get_out_degree(v(100)).unwrap(), 1);
    assert_eq!(graph.edge_count(), 4);
    assert!(graph.contains_edge(e(1)));
    assert!(graph.is_shadowed(e(1)));
    assert_eq!(graph.get_endpoints(e(1)).unwrap(), (v(100), v(205)));

    // Removing the winner does not hand the pair back to the displaced edge
    graph.remove_edge(e(50)).unwrap();
    assert!(graph.get_edge(v(100), v(205)).unwrap_err().is_invalid_vertex());
    assert_eq!(graph.get_out_degree(v(100)).unwrap(), 0);
    assert!(graph.is_shadowed(e(1)));

    graph.remove_edge(e(1)).unwrap();
    assert!(!graph.contains_edge(e(1)));
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_save_empty_graph() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.txt");

    Graph::new().save_graph(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "0 0\n");

    let mut loaded = Graph::new();
    loaded.load_graph(&path).unwrap();
    assert_eq!(loaded.vertex_count(), 0);
}

#[test]
fn test_save_load_roundtrip_is_isomorphic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roads.txt");

    let mut graph = build_road_network();
    graph.save_graph(&path).unwrap();
    graph.clear_graph();
    assert!(graph.is_empty());
    graph.load_graph(&path).unwrap();

    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 3);

    // The cycle 100 → 205 → 310 → 100 must survive with its costs in order
    let mut costs_by_source: HashMap<VertexId, (VertexId, i64)> = HashMap::new();
    for edge in graph.edge_iterator() {
        let (source, target) = graph.get_endpoints(edge).unwrap();
        costs_by_source.insert(source, (target, graph.get_edge_cost(edge).unwrap()));
    }
    let (start, _) = costs_by_source
        .iter()
        .find(|(_, (_, cost))| *cost == 7)
        .map(|(s, t)| (*s, *t))
        .unwrap();
    let (second, c1) = costs_by_source[&start];
    let (third, c2) = costs_by_source[&second];
    let (back, c3) = costs_by_source[&third];
    assert_eq!((c1, c2, c3), (7, -2, 4));
    assert_eq!(back, start);
}

#[test]
fn test_driver_session() {
    // load → remove_vertex → add_vertex → self-loop → save
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("output.txt");
    std::fs::write(&input, "4 4\n0 1 3\n1 2 4\n2 3 5\n3 0 6\n").unwrap();

    let mut graph = Graph::new();
    graph.load_graph(&input).unwrap();
    graph.remove_vertex(v(2)).unwrap();
    graph.add_vertex(v(2)).unwrap();
    graph.add_edge(e(4_000_000), v(2), v(2), 8).unwrap();
    graph.save_graph(&output).unwrap();

    let text = std::fs::read_to_string(&output).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("4 3"));
    assert_eq!(lines.count(), 3);

    let reloaded = Graph::read_text(&output).unwrap();
    assert_eq!(reloaded.vertex_count(), 4);
    assert_eq!(reloaded.edge_count(), 3);
    let self_loops = reloaded
        .edge_iterator()
        .filter(|&edge| {
            let (s, t) = reloaded.get_endpoints(edge).unwrap();
            s == t
        })
        .count();
    assert_eq!(self_loops, 1);
}

#[test]
fn test_load_errors() {
    let dir = tempdir().unwrap();
    let mut graph = Graph::new();

    let err = graph.load_graph(dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, GraphError::FileNotFound { .. }));

    let bad_vertex = dir.path().join("bad_vertex.txt");
    std::fs::write(&bad_vertex, "2 1\n0 7 1\n").unwrap();
    assert!(graph.load_graph(&bad_vertex).unwrap_err().is_invalid_vertex());

    let bad_line = dir.path().join("bad_line.txt");
    std::fs::write(&bad_line, "2 1\n0 1\n").unwrap();
    assert!(matches!(
        graph.load_graph(&bad_line),
        Err(GraphError::Parse { line: 2, .. })
    ));
}

#[test]
fn test_async_persistence_with_block_on() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("async.txt");
    let graph = build_road_network();

    tokio_test::block_on(async {
        graph.save_graph_async(&path).await.unwrap();

        let mut loaded = Graph::new();
        loaded.load_graph_async(&path).await.unwrap();
        assert_eq!(loaded.vertex_count(), 3);
        assert_eq!(loaded.edge_count(), 3);
    });
}

#[cfg(feature = "storage")]
#[tokio::test]
async fn test_parquet_persistence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("roads");

    let graph = build_road_network();
    graph.write_parquet(&path).await.unwrap();

    assert!(std::path::Path::new(&format!("{}_edges.parquet", path.display())).exists());
    assert!(std::path::Path::new(&format!("{}_vertices.parquet", path.display())).exists());

    let loaded = Graph::read_parquet(&path).await.unwrap();
    assert_eq!(loaded.vertex_count(), 3);
    assert_eq!(loaded.get_edge(v(205), v(310)).unwrap(), e(2));
    assert_eq!(loaded.get_edge_cost(e(3)).unwrap(), 4);
}
