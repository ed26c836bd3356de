//! Graph storage layer
//!
//! Provides the hash-indexed graph container, plain-text persistence and an
//! optional Parquet snapshot.

pub mod graph;
#[cfg(feature = "storage")]
pub mod parquet;
pub mod text;

pub use graph::{EdgeId, EdgeInfo, Graph, VertexId};
