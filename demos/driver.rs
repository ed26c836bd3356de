//! Load a graph, replace one vertex with a self-looped copy, save it again
//!
//! Run with: cargo run --example driver -- <input> <output> [vertex]
//!
//! Set `RUST_LOG=weighted_digraph=debug` to see load/save events.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use weighted_digraph::{EdgeId, Graph, VertexId};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "graph1m.txt".to_string());
    let output = args.next().unwrap_or_else(|| "test.txt".to_string());
    let vertex = match args.next() {
        Some(raw) => raw
            .parse::<i64>()
            .with_context(|| format!("Invalid vertex id {raw:?}"))?,
        None => 888_888,
    };

    let mut graph = Graph::new();
    graph
        .load_graph(&input)
        .with_context(|| format!("Failed to load {input}"))?;
    println!(
        "Loaded {}: {} vertices, {} edges",
        input,
        graph.vertex_count(),
        graph.edge_count()
    );

    let vertex = VertexId(vertex);
    graph.remove_vertex(vertex)?;
    graph.add_vertex(vertex)?;

    // Loaded edge ids are 0..edge_count, so pick one past the largest
    let edge = graph
        .edge_iterator()
        .map(|e| e.0)
        .max()
        .map_or(0, |max| max + 1);
    graph.add_edge(EdgeId(edge), vertex, vertex, 8)?;

    graph
        .save_graph(&output)
        .with_context(|| format!("Failed to save {output}"))?;
    println!(
        "Saved {}: {} vertices, {} edges",
        output,
        graph.vertex_count(),
        graph.edge_count()
    );

    Ok(())
}
