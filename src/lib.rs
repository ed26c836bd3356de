//! weighted-digraph: directed, edge-weighted graph container
//!
//! # Overview
//!
//! A mutable directed graph keyed by caller-chosen integer ids for both
//! vertices and edges. Forward and reverse adjacency indexes give constant-time
//! edge lookup and degree queries; an edge table carries endpoints and cost.
//! Graphs persist to a line-oriented text format.
//!
//! # Quick Start
//!
//! ```no_run
//! use weighted_digraph::{EdgeId, Graph, VertexId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = Graph::new();
//! graph.add_vertex(VertexId(0))?;
//! graph.add_vertex(VertexId(1))?;
//! graph.add_edge(EdgeId(10), VertexId(0), VertexId(1), 5)?;
//!
//! assert_eq!(graph.get_edge(VertexId(0), VertexId(1))?, EdgeId(10));
//!
//! // Vertex ids are renumbered 0..n in the file
//! graph.save_graph("graph.txt")?;
//!
//! let mut loaded = Graph::new();
//! loaded.load_graph("graph.txt")?;
//! assert_eq!(loaded.vertex_count(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Storage**: hash maps for forward/reverse adjacency plus an edge table
//! - **Persistence**: plain text (sync and `tokio` async), optional Parquet
//!   snapshot preserving ids (`storage` feature)
//! - **Errors**: typed [`GraphError`] so callers can branch on the failure kind
//! - **Logging**: `tracing` events; installing a subscriber is up to the caller

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod storage;

// Re-export core types
pub use error::{GraphError, Result, VertexRole};
pub use storage::{EdgeId, EdgeInfo, Graph, VertexId};
